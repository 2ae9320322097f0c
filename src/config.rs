//! Batch settings.

use crate::errors::{self, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;

pub type Chapter = u32;

/// Chapter used when nothing more specific is known.
pub const DEFAULT_CHAPTER: Chapter = 999;

/// How to build the cards.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Flag characters.
    /// A token carries a flag if any of these characters occurs anywhere in it.
    pub flags: String,

    /// Abbreviation of the native language, used in answer hints such as `[N]`.
    pub native_abbr: String,

    /// Abbreviation of the target language, used in answer hints such as `[T]`.
    pub target_abbr: String,

    /// Prefix for the tags produced by the annotator.
    pub tag_prefix: String,

    /// Prefix of the note id for cards that only come from flagged tokens.
    pub id_prefix: String,

    /// If set, `{text}` in expression lists becomes a span with this class.
    pub braces_class: Option<String>,

    /// If set, prepended to every expression prompt and answer after the first one
    /// when the lists are built from numbered fields.
    pub expression_lead: Option<String>,

    /// Separator used to count answers when no answer list is supplied.
    pub answer_separator: String,

    /// Characters deleted by the default headword resolver, in addition to the flags.
    pub headword_strip: String,

    /// Chapter used for flagged cards and for empty chapter lists.
    pub default_chapter: Chapter,

    /// Chapter strings starting with one of these prefixes are numbered
    /// from the given offset, e.g. `F2` with `{"F": 10}` is chapter 12.
    pub chapter_prefixes: BTreeMap<String, Chapter>,

    /// Renames applied to the output columns just before writing.
    pub column_names: BTreeMap<String, String>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            flags: "°†".to_owned(),
            native_abbr: "N".to_owned(),
            target_abbr: "T".to_owned(),
            tag_prefix: "TL".to_owned(),
            id_prefix: "HW_".to_owned(),
            braces_class: None,
            expression_lead: None,
            answer_separator: ";".to_owned(),
            headword_strip: "?!".to_owned(),
            default_chapter: DEFAULT_CHAPTER,
            chapter_prefixes: BTreeMap::new(),
            column_names: BTreeMap::new(),
        }
    }
}

impl Settings {
    pub fn load(filename: &str) -> Result<Settings> {
        let data = fs::read_to_string(filename)?;
        let settings: Settings = serde_json::from_str(&data)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.flags.is_empty() {
            return Err(errors::invalid_argument("no flag characters given".to_owned()));
        }
        if self.answer_separator.is_empty() {
            return Err(errors::invalid_argument("empty answer separator".to_owned()));
        }
        Ok(())
    }

    pub fn native_hint(&self) -> String {
        format!("[{}]", self.native_abbr)
    }

    pub fn target_hint(&self) -> String {
        format!("[{}]", self.target_abbr)
    }

    pub fn native_or_target_hint(&self) -> String {
        format!("[{}|{}]", self.native_abbr, self.target_abbr)
    }
}
