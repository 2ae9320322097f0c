//! Data structures for representing the input.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One note of the primary file. Lists are already tokenized.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Record {
    /// Native-language gloss.
    pub native: String,
    #[serde(default)]
    pub part_of_speech: String,
    /// Target-language answers, possibly flagged.
    pub primary: Vec<String>,
    /// Secondary information aligned with `primary` by position.
    #[serde(default)]
    pub secondary: Vec<String>,
    #[serde(default)]
    pub notes: Vec<String>,
    #[serde(default)]
    pub pronunciation: String,
    #[serde(default)]
    pub expressions: Vec<String>,
    #[serde(default)]
    pub expression_prompts: Vec<String>,
}

/// One manually authored card that replaces the flagged card with the same headword.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct OverrideRecord {
    pub id: String,
    pub primary: String,
    /// If non-empty, used instead of `primary` to find the headword.
    pub headword: String,
    pub secondary: String,
    pub target_answer: String,
    pub target_answer_list: Option<Vec<String>>,
    pub native_answer: String,
    pub native_answer_list: Option<Vec<String>>,
    /// Passed through to the output.
    pub notes: String,
    pub pronunciation: String,
    pub hint: String,
    pub part_of_speech: String,
    pub chapters: String,
    pub expr_prompts: Option<Vec<String>>,
    pub expr_answers: Option<Vec<String>>,
    /// Numbered fields such as `expr_prompt_1`, `expr_target_1`, `expr_native_1`.
    #[serde(flatten)]
    pub numbered: BTreeMap<String, String>,
}

impl OverrideRecord {
    /// Values of the fields `{prefix}N`, ordered by N.
    pub fn numbered_list(&self, prefix: &str) -> Vec<String> {
        let mut fields: Vec<(u32, &String)> = self
            .numbered
            .iter()
            .filter_map(|(k, v)| {
                let n = k.strip_prefix(prefix)?.parse::<u32>().ok()?;
                Some((n, v))
            })
            .collect();
        fields.sort_by_key(|&(n, _)| n);
        fields.into_iter().map(|(_, v)| v.clone()).collect()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Input {
    pub records: Vec<Record>,
    #[serde(default)]
    pub overrides: Option<Vec<OverrideRecord>>,
}
