use crate::config::{Chapter, Settings};
use crate::errors::{self, Result};
use itertools::Itertools;
use std::collections::BTreeMap;

/// Maps one entry of a chapter list to a chapter number.
pub trait ChapterResolver {
    fn chapter(&self, s: &str) -> Result<Chapter>;
}

/// Plain numbers (fractions are rounded down), or a prefix letter followed
/// by a digit, numbered from the prefix's offset.
pub struct NumericChapters {
    prefixes: BTreeMap<String, Chapter>,
    default: Chapter,
}

impl NumericChapters {
    pub fn new(settings: &Settings) -> NumericChapters {
        NumericChapters {
            prefixes: settings.chapter_prefixes.clone(),
            default: settings.default_chapter,
        }
    }
}

impl ChapterResolver for NumericChapters {
    fn chapter(&self, s: &str) -> Result<Chapter> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(self.default);
        }
        for (prefix, offset) in &self.prefixes {
            if let Some(rest) = s.strip_prefix(prefix.as_str()) {
                let n = rest
                    .chars()
                    .next()
                    .and_then(|c| c.to_digit(10))
                    .ok_or_else(|| errors::invalid_input(format!("bad chapter '{s}'")))?;
                return Ok(offset + n);
            }
        }
        match s.parse::<f64>() {
            Ok(x) if x >= 0.0 => Ok(x.floor() as Chapter),
            _ => Err(errors::invalid_input(format!("bad chapter '{s}'"))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChapterInfo {
    /// Smallest chapter in the list.
    pub chapter: Chapter,
    /// One tag per list entry.
    pub tags: String,
}

/// Parses a comma-separated chapter list.
pub fn init_chapter<C>(chapters: &str, resolver: &C, settings: &Settings) -> Result<ChapterInfo>
where
    C: ChapterResolver + ?Sized,
{
    let entries = chapters
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect_vec();
    let mut chapter = settings.default_chapter;
    for e in &entries {
        chapter = chapter.min(resolver.chapter(e)?);
    }
    let tags = entries
        .iter()
        .map(|e| format!("{}_src_{}", settings.tag_prefix, e.replace(' ', "_")))
        .join(" ");
    Ok(ChapterInfo { chapter, tags })
}

#[cfg(test)]
mod test {
    use super::*;

    fn settings() -> Settings {
        Settings {
            chapter_prefixes: BTreeMap::from([("F".to_owned(), 10)]),
            ..Settings::default()
        }
    }

    #[test]
    fn numeric() {
        let r = NumericChapters::new(&settings());
        assert_eq!(r.chapter("3").unwrap(), 3);
        assert_eq!(r.chapter(" 4.5 ").unwrap(), 4);
        assert_eq!(r.chapter("F2").unwrap(), 12);
        assert_eq!(r.chapter("").unwrap(), 999);
        assert!(r.chapter("G2").is_err());
        assert!(r.chapter("F").is_err());
        assert!(r.chapter("-1").is_err());
    }

    #[test]
    fn minimum_and_tags() {
        let s = settings();
        let r = NumericChapters::new(&s);
        let info = init_chapter("7, F1,2.5", &r, &s).unwrap();
        assert_eq!(info.chapter, 2);
        assert_eq!(info.tags, "TL_src_7 TL_src_F1 TL_src_2.5");
    }

    #[test]
    fn empty_list() {
        let s = settings();
        let r = NumericChapters::new(&s);
        let info = init_chapter(" ", &r, &s).unwrap();
        assert_eq!(info.chapter, 999);
        assert_eq!(info.tags, "");
    }
}
