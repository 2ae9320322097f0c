//! Main entry point for building the cards.

use crate::annotate::Annotator;
use crate::chapter::ChapterResolver;
use crate::config::Settings;
use crate::errors::Result;
use crate::flags::{self, FlagSet};
use crate::headword::HeadwordResolver;
use crate::information;
use crate::input::{Input, Record};
use crate::merge::{self, FlaggedRow};
use crate::output::{self, Table};
use crate::overrides;
use crate::synth::{self, FlaggedCards};
use itertools::Itertools;
use log::{debug, info};

/// Flagged cards for all records, in record order.
pub fn flagged_cards<R>(records: &[Record], flags: &FlagSet, resolver: &R) -> Result<FlaggedCards>
where
    R: HeadwordResolver + ?Sized,
{
    let mastered = flags::mastered_headwords(records.iter().map(|r| &r.primary), flags, resolver);
    info!(target: "flawcards", "mastered headwords: {}", mastered.len());
    let mut cards = FlaggedCards::new();
    for record in records {
        synth::synthesize(record, &mastered, flags, resolver, &mut cards)?;
    }
    info!(target: "flawcards", "flagged cards: {}", cards.len());
    debug!(target: "flawcards", "duplicate flagged headwords dropped: {}", cards.suppressed());
    Ok(cards)
}

/// Build the whole output table.
///
/// Any error aborts the batch; there is no partial output.
/// The annotator's trackers are updated for every flagged and override card.
pub fn run<R, C, A>(
    settings: &Settings,
    input: &Input,
    resolver: &R,
    chapters: &C,
    annotator: &mut A,
) -> Result<Table>
where
    R: HeadwordResolver + ?Sized,
    C: ChapterResolver + ?Sized,
    A: Annotator + ?Sized,
{
    let flags = FlagSet::new(&settings.flags);
    information::statistics(&input.records, &flags);

    let cards = flagged_cards(&input.records, &flags, resolver)?;
    let rows = cards
        .into_cards()
        .into_iter()
        .map(|card| {
            let annotation = annotator.annotate(&card.primary, settings.default_chapter);
            FlaggedRow { card, annotation }
        })
        .collect_vec();

    let override_cards = match &input.overrides {
        Some(records) => {
            info!(target: "flawcards", "override records: {}", records.len());
            overrides::process_overrides(records, settings, resolver, chapters, annotator)?
        }
        None => vec![],
    };

    let joined = merge::outer_join(rows, override_cards)?;
    information::merge_statistics(&joined);
    let table = output::assemble(&joined, settings, input.overrides.is_some());
    information::post_statistics(&table);
    Ok(table)
}
