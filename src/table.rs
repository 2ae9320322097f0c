//! Prompt/answer helpers for override cards.

use crate::errors::{self, Result};
use itertools::{EitherOrBoth, Itertools};

/// Prepends the hint tag of whichever answers are present.
fn hinted_answer(answer1: &str, answer2: &str, hint1: &str, hint2: &str) -> String {
    match (answer1.is_empty(), answer2.is_empty()) {
        (false, false) => format!("[{hint1}] {answer1} [{hint2}] {answer2}"),
        (false, true) => format!("[{hint1}] {answer1}"),
        (true, false) => format!("[{hint2}] {answer2}"),
        (true, true) => String::new(),
    }
}

/// Parallel prompt and answer lists built from numbered fields.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExpressionLists {
    pub prompts: Vec<String>,
    pub answers: Vec<String>,
}

impl ExpressionLists {
    /// Prepends `lead` to every element after the first, the way a
    /// `"; "`-joined field would split back.
    pub fn with_lead(self, lead: &str) -> ExpressionLists {
        let add = |list: Vec<String>| {
            list.into_iter()
                .enumerate()
                .map(|(i, s)| if i > 0 { format!("{lead}{s}") } else { s })
                .collect_vec()
        };
        ExpressionLists {
            prompts: add(self.prompts),
            answers: add(self.answers),
        }
    }

    pub fn map(self, f: impl Fn(&str) -> String) -> ExpressionLists {
        ExpressionLists {
            prompts: self.prompts.iter().map(|s| f(s.as_str())).collect(),
            answers: self.answers.iter().map(|s| f(s.as_str())).collect(),
        }
    }
}

/// Combines one prompt list and two answer lists (target and native language).
pub fn combine_answer_lists(
    prompts: &[String],
    answers1: &[String],
    answers2: &[String],
    hint1: &str,
    hint2: &str,
) -> ExpressionLists {
    let n = prompts.len().max(answers1.len()).max(answers2.len());
    let get = |list: &[String], i: usize| list.get(i).map(|s| s.trim()).unwrap_or("").to_owned();
    let mut lists = ExpressionLists::default();
    for i in 0..n {
        lists.prompts.push(get(prompts, i));
        lists
            .answers
            .push(hinted_answer(&get(answers1, i), &get(answers2, i), hint1, hint2));
    }
    lists
}

/// Replaces every `{text}` with a span of the given class.
/// Unbalanced braces are left alone.
pub fn braces_to_class(s: &str, class: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(open) = rest.find('{') {
        match rest[open..].find('}') {
            Some(close) => {
                out.push_str(&rest[..open]);
                let inner = &rest[open + 1..open + close];
                out.push_str(&format!(r#"<span class="{class}">{inner}</span>"#));
                rest = &rest[open + close + 1..];
            }
            None => break,
        }
    }
    out.push_str(rest);
    out
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HintTarget {
    /// Which languages are expected, e.g. `[T]` or `[T|N]`.
    pub hint: String,
    /// How many answers are expected.
    pub target: String,
    pub answer: String,
}

fn answer_count(answer: &str, list: Option<&[String]>, sep: &str) -> usize {
    match list {
        Some(list) if !list.is_empty() => list.len(),
        _ => answer.split(sep).filter(|s| !s.trim().is_empty()).count(),
    }
}

/// Hint, expected answer count and back-of-card answer for an override card.
pub fn hint_target_and_answer(
    answer1: &str,
    answer2: &str,
    list1: Option<&[String]>,
    list2: Option<&[String]>,
    hint1: &str,
    hint2: &str,
    sep: &str,
) -> Result<HintTarget> {
    let (answer1, answer2) = (answer1.trim(), answer2.trim());
    let n1 = answer_count(answer1, list1, sep);
    let n2 = answer_count(answer2, list2, sep);
    match (answer1.is_empty(), answer2.is_empty()) {
        (false, false) => Ok(HintTarget {
            hint: format!("[{hint1}|{hint2}]"),
            target: format!("{n1}|{n2}"),
            answer: format!("{answer1} [{hint2}: {answer2}]"),
        }),
        (false, true) => Ok(HintTarget {
            hint: format!("[{hint1}]"),
            target: n1.to_string(),
            answer: answer1.to_owned(),
        }),
        (true, false) => Ok(HintTarget {
            hint: format!("[{hint2}]"),
            target: n2.to_string(),
            answer: answer2.to_owned(),
        }),
        (true, true) => Err(errors::invalid_input_ref("neither answer is populated")),
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PromptAnswerTable {
    /// Answers left blank.
    pub prompt: String,
    pub answer: String,
}

fn render(rows: &[(&str, &str)], with_answers: bool) -> String {
    let mut out = String::from(r#"<table class="pa">"#);
    for (p, a) in rows {
        let a = if with_answers { *a } else { "" };
        out.push_str(&format!("<tr><td>{p}</td><td>{a}</td></tr>"));
    }
    out.push_str("</table>");
    out
}

/// Renders the fixed rows followed by the expression rows as an HTML table.
///
/// A row is empty if both its prompt and its answer are empty.
pub fn prompt_and_answer_table(
    prompts: &[&str],
    answers: &[&str],
    expr_prompts: &[String],
    expr_answers: &[String],
    drop_empty_rows: bool,
) -> PromptAnswerTable {
    let fixed = prompts.iter().copied().zip_longest(answers.iter().copied());
    let exprs = expr_prompts
        .iter()
        .map(String::as_str)
        .zip_longest(expr_answers.iter().map(String::as_str));
    let rows = fixed
        .chain(exprs)
        .map(|pair| match pair {
            EitherOrBoth::Both(p, a) => (p, a),
            EitherOrBoth::Left(p) => (p, ""),
            EitherOrBoth::Right(a) => ("", a),
        })
        .filter(|(p, a)| !drop_empty_rows || !(p.is_empty() && a.is_empty()))
        .collect_vec();
    PromptAnswerTable {
        prompt: render(&rows, false),
        answer: render(&rows, true),
    }
}
