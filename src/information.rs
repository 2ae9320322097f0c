use crate::flags::FlagSet;
use crate::input::Record;
use crate::merge::Joined;
use crate::output::Table;
use itertools::Itertools;
use log::{debug, info};
use std::collections::{BTreeMap, HashSet};

pub fn statistics(records: &[Record], flags: &FlagSet) {
    let mut tokens = 0;
    let mut flagged = 0;
    let mut distinct = HashSet::new();
    for r in records {
        for t in &r.primary {
            tokens += 1;
            if flags.is_flagged(t) {
                flagged += 1;
            }
            distinct.insert(t.trim());
        }
    }
    info!(target: "flawcards", "records: {}", records.len());
    info!(target: "flawcards", "primary tokens: {} ({} distinct)", tokens, distinct.len());
    info!(target: "flawcards", "flagged tokens: {}", flagged);
}

pub fn merge_statistics(joined: &[Joined]) {
    let (mut flagged_only, mut override_only, mut both) = (0, 0, 0);
    for j in joined {
        match j {
            Joined::FlaggedOnly(_) => flagged_only += 1,
            Joined::OverrideOnly(_) => override_only += 1,
            Joined::Both(_, _) => both += 1,
        }
    }
    info!(
        target: "flawcards",
        "merged: {} flagged only, {} override only, {} both",
        flagged_only,
        override_only,
        both
    );
}

/// Cumulative number of cards by chapter.
fn chapter_table(table: &Table) -> String {
    let mut counts: BTreeMap<u32, usize> = BTreeMap::new();
    for row in &table.rows {
        *counts.entry(row.chapter).or_default() += 1;
    }
    let mut total = 0;
    counts
        .iter()
        .map(|(chapter, n)| {
            total += n;
            format!("{chapter}: {n} ({total})")
        })
        .join(", ")
}

pub fn post_statistics(table: &Table) {
    info!(target: "flawcards", "output rows: {}", table.rows.len());
    debug!(target: "flawcards", "cards by chapter: {}", chapter_table(table));
}
