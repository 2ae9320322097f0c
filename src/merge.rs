//! Outer join of flagged cards and override cards by headword.

use crate::annotate::Annotation;
use crate::errors::{self, Result};
use crate::overrides::OverrideCard;
use crate::synth::FlaggedCard;
use std::collections::btree_map::Entry::{Occupied, Vacant};
use std::collections::{BTreeMap, HashSet};

/// A flagged card together with its audio and markup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlaggedRow {
    pub card: FlaggedCard,
    pub annotation: Annotation,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Joined {
    FlaggedOnly(FlaggedRow),
    OverrideOnly(OverrideCard),
    Both(FlaggedRow, OverrideCard),
}

impl Joined {
    pub fn headword(&self) -> &str {
        match self {
            Joined::FlaggedOnly(f) | Joined::Both(f, _) => &f.card.headword,
            Joined::OverrideOnly(o) => &o.headword,
        }
    }
}

type Slot = (Option<FlaggedRow>, Option<OverrideCard>);

/// Exactly one result per headword, ordered by headword.
///
/// Headwords and ids must be unique within each side. Overrides without a
/// headword cannot match anything; each becomes its own row, placed first
/// in input order.
pub fn outer_join(flagged: Vec<FlaggedRow>, overrides: Vec<OverrideCard>) -> Result<Vec<Joined>> {
    let mut slots: BTreeMap<String, Slot> = BTreeMap::new();
    for row in flagged {
        match slots.entry(row.card.headword.clone()) {
            Occupied(e) => {
                return Err(errors::invalid_input(format!(
                    "flagged headword '{}' appears twice",
                    e.key()
                )));
            }
            Vacant(e) => {
                e.insert((Some(row), None));
            }
        }
    }
    let mut ids = HashSet::new();
    let mut unkeyed = vec![];
    for card in overrides {
        if !ids.insert(card.id.clone()) {
            return Err(errors::invalid_input(format!(
                "override id '{}' appears twice",
                card.id
            )));
        }
        if card.headword.is_empty() {
            unkeyed.push(Joined::OverrideOnly(card));
            continue;
        }
        let slot = slots.entry(card.headword.clone()).or_default();
        if let Some(other) = &slot.1 {
            return Err(errors::invalid_input(format!(
                "overrides '{}' and '{}' share the headword '{}'",
                other.id, card.id, card.headword
            )));
        }
        slot.1 = Some(card);
    }
    let keyed = slots.into_values().filter_map(|slot| match slot {
        (Some(f), None) => Some(Joined::FlaggedOnly(f)),
        (None, Some(o)) => Some(Joined::OverrideOnly(o)),
        (Some(f), Some(o)) => Some(Joined::Both(f, o)),
        (None, None) => None,
    });
    unkeyed.extend(keyed);
    Ok(unkeyed)
}
