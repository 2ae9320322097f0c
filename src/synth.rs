//! Cards for flagged tokens of the primary lists.

use crate::config::Settings;
use crate::errors::{self, EmptyHeadwordError, MisformattedReferenceError, Result};
use crate::flags::FlagSet;
use crate::headword::HeadwordResolver;
use crate::input::Record;
use crate::references::{self, References};
use itertools::Itertools;
use log::debug;
use std::collections::{HashMap, HashSet};

/// Where the definition on the back of the card comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnswerSource {
    /// Another token of the same primary list.
    Target,
    /// Free text in the notes.
    NativeOrTarget,
    /// Nothing; the native gloss is the answer.
    Native,
}

impl AnswerSource {
    pub fn hint(&self, settings: &Settings) -> String {
        match self {
            AnswerSource::Target => settings.target_hint(),
            AnswerSource::NativeOrTarget => settings.native_or_target_hint(),
            AnswerSource::Native => settings.native_hint(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlaggedCard {
    pub headword: String,
    pub native: String,
    pub part_of_speech: String,
    pub definition: String,
    pub source: AnswerSource,
    /// The token with all flag characters deleted.
    pub primary: String,
    pub secondary: String,
    pub pronunciation: String,
}

/// Flagged cards keyed by headword, in insertion order.
///
/// The first card for a headword wins; later ones are counted and dropped.
#[derive(Debug, Default)]
pub struct FlaggedCards {
    cards: Vec<FlaggedCard>,
    index: HashMap<String, usize>,
    suppressed: usize,
}

impl FlaggedCards {
    pub fn new() -> FlaggedCards {
        FlaggedCards::default()
    }

    /// Returns `false` if a card with the same headword was already there.
    pub fn insert(&mut self, card: FlaggedCard) -> bool {
        if self.index.contains_key(&card.headword) {
            debug!(target: "flawcards", "duplicate headword '{}' dropped", card.headword);
            self.suppressed += 1;
            return false;
        }
        self.index.insert(card.headword.clone(), self.cards.len());
        self.cards.push(card);
        true
    }

    pub fn get(&self, headword: &str) -> Option<&FlaggedCard> {
        self.index.get(headword).map(|&i| &self.cards[i])
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn suppressed(&self) -> usize {
        self.suppressed
    }

    pub fn into_cards(self) -> Vec<FlaggedCard> {
        self.cards
    }
}

fn resolve_definition(
    record: &Record,
    refs: &References,
    index: usize,
    token: &str,
) -> Result<(String, AnswerSource)> {
    let position = index + 1;
    match refs.get(&(position as u32)) {
        // A target of 0 counts as no target.
        Some(r) => match r.target {
            Some(target) if target > 0 => {
                let answer = record.primary.get(target as usize - 1).ok_or_else(|| {
                    errors::invalid_input(format!(
                        "reference {}={} points past the end of {:?}",
                        position, target, record.primary
                    ))
                })?;
                Ok((format!("{} {}", answer.trim(), r.text), AnswerSource::Target))
            }
            _ => Ok((r.text.clone(), AnswerSource::NativeOrTarget)),
        },
        None => {
            let notes = record.notes.iter().join(";");
            if notes.contains(&format!("{position}:")) || notes.contains(&format!("{position}=")) {
                return Err(MisformattedReferenceError {
                    token: token.to_owned(),
                    position,
                    notes,
                }
                .into());
            }
            Ok((String::new(), AnswerSource::Native))
        }
    }
}

/// Adds a card for every flagged, not mastered token of one record.
pub fn synthesize<R>(
    record: &Record,
    mastered: &HashSet<String>,
    flags: &FlagSet,
    resolver: &R,
    cards: &mut FlaggedCards,
) -> Result<()>
where
    R: HeadwordResolver + ?Sized,
{
    let refs = references::parse_references(&record.notes)?;
    for (i, token) in record.primary.iter().enumerate() {
        let token = token.trim();
        if !flags.is_flagged(token) {
            continue;
        }
        let headword = resolver.headword(token);
        if mastered.contains(&headword) {
            continue;
        }
        if headword.is_empty() {
            return Err(EmptyHeadwordError {
                token: token.to_owned(),
            }
            .into());
        }
        let secondary = record
            .secondary
            .get(i)
            .map(|s| s.trim().to_owned())
            .unwrap_or_default();
        let (definition, source) = resolve_definition(record, &refs, i, token)?;
        cards.insert(FlaggedCard {
            headword,
            native: record.native.clone(),
            part_of_speech: record.part_of_speech.clone(),
            definition,
            source,
            primary: flags.strip(token),
            secondary,
            pronunciation: record.pronunciation.clone(),
        });
    }
    Ok(())
}
