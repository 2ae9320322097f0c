//! Manually authored override cards.

use crate::annotate::Annotator;
use crate::chapter::{self, ChapterResolver};
use crate::config::{Chapter, Settings};
use crate::errors::{self, ConflictingInputError, Result};
use crate::headword::HeadwordResolver;
use crate::input::OverrideRecord;
use crate::table::{self, ExpressionLists};
use itertools::Itertools;
use log::debug;

/// An override card, ready to be merged by headword.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OverrideCard {
    pub id: String,
    pub headword: String,
    pub table_answer: String,
    pub table_prompt: String,
    pub pronunciation: String,
    pub notes: String,
    pub audio: String,
    pub chapter: Chapter,
    pub tags: String,
}

/// How the expression lists are given in the whole override table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ExpressionSource {
    Prebuilt,
    Numbered,
}

fn ids_with(records: &[OverrideRecord], pred: impl Fn(&OverrideRecord) -> bool) -> String {
    records
        .iter()
        .filter(|r| pred(r))
        .map(|r| format!("'{}'", r.id))
        .join(", ")
}

fn expression_source(records: &[OverrideRecord]) -> Result<ExpressionSource> {
    let has_prompts = records.iter().any(|r| r.expr_prompts.is_some());
    let has_answers = records.iter().any(|r| r.expr_answers.is_some());
    match (has_prompts, has_answers) {
        (true, true) => Ok(ExpressionSource::Prebuilt),
        (false, false) => Ok(ExpressionSource::Numbered),
        (true, false) => Err(ConflictingInputError(format!(
            "`expr_prompts` without `expr_answers` in overrides {}",
            ids_with(records, |r| r.expr_prompts.is_some())
        ))
        .into()),
        (false, true) => Err(ConflictingInputError(format!(
            "`expr_answers` without `expr_prompts` in overrides {}",
            ids_with(records, |r| r.expr_answers.is_some())
        ))
        .into()),
    }
}

fn expressions(
    record: &OverrideRecord,
    source: ExpressionSource,
    settings: &Settings,
) -> ExpressionLists {
    let lists = match source {
        ExpressionSource::Prebuilt => {
            let trimmed = |list: &Option<Vec<String>>| {
                list.iter()
                    .flatten()
                    .map(|s| s.trim().to_owned())
                    .collect::<Vec<_>>()
            };
            ExpressionLists {
                prompts: trimmed(&record.expr_prompts),
                answers: trimmed(&record.expr_answers),
            }
        }
        ExpressionSource::Numbered => {
            let lists = table::combine_answer_lists(
                &record.numbered_list("expr_prompt_"),
                &record.numbered_list("expr_target_"),
                &record.numbered_list("expr_native_"),
                &settings.target_abbr,
                &settings.native_abbr,
            );
            match &settings.expression_lead {
                Some(lead) => lists.with_lead(lead),
                None => lists,
            }
        }
    };
    match &settings.braces_class {
        Some(class) => lists.map(|s| table::braces_to_class(s, class)),
        None => lists,
    }
}

fn process_one<R, C, A>(
    record: &OverrideRecord,
    source: ExpressionSource,
    settings: &Settings,
    resolver: &R,
    chapters: &C,
    annotator: &mut A,
) -> Result<OverrideCard>
where
    R: HeadwordResolver + ?Sized,
    C: ChapterResolver + ?Sized,
    A: Annotator + ?Sized,
{
    let exprs = expressions(record, source, settings);
    let ht = table::hint_target_and_answer(
        &record.target_answer,
        &record.native_answer,
        record.target_answer_list.as_deref(),
        record.native_answer_list.as_deref(),
        &settings.target_abbr,
        &settings.native_abbr,
        &settings.answer_separator,
    )
    .map_err(|e| errors::invalid_input(format!("override '{}': {e}", record.id)))?;
    let target = format!("{}: {}", ht.hint, ht.target);

    let for_headword = if record.headword.is_empty() {
        &record.primary
    } else {
        &record.headword
    };
    // May be empty; such a card never matches a flagged card.
    let headword = resolver.headword(for_headword);

    let chapter_info = chapter::init_chapter(&record.chapters, chapters, settings)?;
    let annotation = annotator.annotate(&record.primary, chapter_info.chapter);
    let tags = [chapter_info.tags.as_str(), annotation.tags.as_str()]
        .iter()
        .filter(|s| !s.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ");

    let mut prompt = format!("{} ({}) {}", annotation.markup, record.part_of_speech, target);
    if !record.hint.is_empty() {
        prompt.push_str(&format!(" [{}]", record.hint));
    }

    let front = table::prompt_and_answer_table(
        &[prompt.as_str(), ""],
        &[ht.answer.as_str(), ""],
        &exprs.prompts,
        &exprs.answers,
        true,
    );
    let back = table::prompt_and_answer_table(
        &[prompt.as_str(), record.secondary.as_str()],
        &[ht.answer.as_str(), ""],
        &exprs.prompts,
        &exprs.answers,
        true,
    );

    Ok(OverrideCard {
        id: record.id.clone(),
        headword,
        table_answer: back.answer,
        table_prompt: front.prompt,
        pronunciation: record.pronunciation.clone(),
        notes: record.notes.clone(),
        audio: annotation.audio,
        chapter: annotation.chapter,
        tags,
    })
}

/// Turns override records into cards, one per record, in input order.
pub fn process_overrides<R, C, A>(
    records: &[OverrideRecord],
    settings: &Settings,
    resolver: &R,
    chapters: &C,
    annotator: &mut A,
) -> Result<Vec<OverrideCard>>
where
    R: HeadwordResolver + ?Sized,
    C: ChapterResolver + ?Sized,
    A: Annotator + ?Sized,
{
    let source = expression_source(records)?;
    debug!(target: "flawcards", "override expressions: {:?}", source);
    records
        .iter()
        .map(|r| process_one(r, source, settings, resolver, chapters, annotator))
        .collect()
}
