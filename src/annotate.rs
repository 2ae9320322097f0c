//! Audio and markup for card fronts.
//!
//! The annotator records which audio files and which wordlist entries were
//! used. These trackers are owned by the annotator and mutated on every call,
//! so one annotator must not be shared between concurrent batches.

use crate::config::{Chapter, Settings};
use crate::errors::Result;
use crate::headword::HeadwordResolver;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Annotation {
    /// The token, marked up if its headword is in the wordlist.
    pub markup: String,
    /// `[sound:file]`, or empty.
    pub audio: String,
    pub chapter: Chapter,
    pub tags: String,
}

pub trait Annotator {
    fn annotate(&mut self, token: &str, chapter: Chapter) -> Annotation;
}

/// Audio files and wordlist chapters, keyed by headword.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Catalog {
    #[serde(default)]
    pub audio: HashMap<String, String>,
    #[serde(default)]
    pub wordlist: HashMap<String, Chapter>,
}

impl Catalog {
    pub fn load(filename: &str) -> Result<Catalog> {
        let data = fs::read_to_string(filename)?;
        Ok(serde_json::from_str(&data)?)
    }
}

/// How many times each audio file was referenced.
#[derive(Debug, Default)]
pub struct AudioUsage {
    pub counts: BTreeMap<String, u32>,
}

impl AudioUsage {
    fn record(&mut self, file: &str) {
        *self.counts.entry(file.to_owned()).or_default() += 1;
    }

    pub fn files(&self) -> usize {
        self.counts.len()
    }
}

/// Wordlist headwords that were seen.
#[derive(Debug, Default)]
pub struct Coverage {
    pub seen: HashSet<String>,
}

impl Coverage {
    pub fn missing<'a>(&self, catalog: &'a Catalog) -> Vec<&'a str> {
        let mut missing: Vec<&str> = catalog
            .wordlist
            .keys()
            .filter(|k| !self.seen.contains(*k))
            .map(String::as_str)
            .collect();
        missing.sort_unstable();
        missing
    }
}

pub struct CatalogAnnotator<'a, R: ?Sized> {
    catalog: &'a Catalog,
    resolver: &'a R,
    tag_prefix: String,
    pub usage: AudioUsage,
    pub coverage: Coverage,
}

impl<'a, R: HeadwordResolver + ?Sized> CatalogAnnotator<'a, R> {
    pub fn new(catalog: &'a Catalog, resolver: &'a R, settings: &Settings) -> Self {
        CatalogAnnotator {
            catalog,
            resolver,
            tag_prefix: settings.tag_prefix.clone(),
            usage: AudioUsage::default(),
            coverage: Coverage::default(),
        }
    }
}

impl<R: HeadwordResolver + ?Sized> Annotator for CatalogAnnotator<'_, R> {
    fn annotate(&mut self, token: &str, chapter: Chapter) -> Annotation {
        let headword = self.resolver.headword(token);
        let prefix = &self.tag_prefix;
        let mut tags = vec![];
        let (markup, chapter) = match self.catalog.wordlist.get(&headword) {
            Some(&wl_chapter) => {
                self.coverage.seen.insert(headword.clone());
                tags.push(format!("{prefix}_wordlist"));
                (
                    format!(r#"<span class="{prefix}-wl">{token}</span>"#),
                    chapter.min(wl_chapter),
                )
            }
            None => (token.to_owned(), chapter),
        };
        let audio = match self.catalog.audio.get(&headword) {
            Some(file) => {
                self.usage.record(file);
                format!("[sound:{file}]")
            }
            None => {
                tags.push(format!("{prefix}_no_audio"));
                String::new()
            }
        };
        tags.insert(0, format!("{prefix}_ch{chapter:02}"));
        Annotation {
            markup,
            audio,
            chapter,
            tags: tags.join(" "),
        }
    }
}
