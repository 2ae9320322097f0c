//! Flag classification.
//!
//! A flag marks a token as a low-priority synonym. Headwords that appear at
//! least once without a flag are "mastered" and never get a flagged card.

use crate::headword::HeadwordResolver;
use std::collections::HashSet;
use std::fmt;

/// Marks cells that refer back to the prompt, which flagged cells cannot do.
const BACK_REFERENCE: char = '~';

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlagSet {
    chars: Vec<char>,
}

impl FlagSet {
    pub fn new(flags: &str) -> FlagSet {
        let mut chars: Vec<char> = flags.chars().collect();
        chars.sort_unstable();
        chars.dedup();
        FlagSet { chars }
    }

    pub fn is_flagged(&self, token: &str) -> bool {
        token.chars().any(|c| self.chars.contains(&c))
    }

    /// Deletes every flag character.
    pub fn strip(&self, token: &str) -> String {
        token.chars().filter(|c| !self.chars.contains(c)).collect()
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }
}

/// Headwords of all unflagged tokens in all primary lists.
pub fn mastered_headwords<I, L, R>(lists: I, flags: &FlagSet, resolver: &R) -> HashSet<String>
where
    I: IntoIterator<Item = L>,
    L: IntoIterator,
    L::Item: AsRef<str>,
    R: HeadwordResolver + ?Sized,
{
    let mut mastered = HashSet::new();
    for list in lists {
        for token in list {
            let token = token.as_ref().trim();
            if flags.is_flagged(token) {
                continue;
            }
            let headword = resolver.headword(token);
            if !headword.is_empty() {
                mastered.insert(headword);
            }
        }
    }
    mastered
}

/// Problems found by [check_flag_usage]. None of them stops a batch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FlagWarning {
    /// The flag is in one cell but not in the parallel one.
    Unpaired {
        flag: char,
        index: usize,
        left: String,
        right: String,
    },
    /// A flagged cell uses `~`, but there is nothing for it to refer to.
    BackReference { index: usize, cell: String },
}

impl fmt::Display for FlagWarning {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FlagWarning::Unpaired {
                flag,
                index,
                left,
                right,
            } => write!(
                f,
                "{} not in both columns at position {}: {} | {}",
                flag,
                index + 1,
                left,
                right
            ),
            FlagWarning::BackReference { index, cell } => write!(
                f,
                "{} in flagged cell at position {}: {}",
                BACK_REFERENCE,
                index + 1,
                cell
            ),
        }
    }
}

/// Checks two parallel lists (e.g. expressions and their prompts).
///
/// Lists of different length are not compared.
pub fn check_flag_usage<S: AsRef<str>>(
    left: &[S],
    right: &[S],
    flags: &FlagSet,
) -> Vec<FlagWarning> {
    let mut warnings = vec![];
    if left.len() != right.len() {
        return warnings;
    }
    for (index, (l, r)) in left.iter().zip(right).enumerate() {
        let (l, r) = (l.as_ref(), r.as_ref());
        let mut flagged = false;
        for &flag in flags.chars() {
            let in_l = l.contains(flag);
            let in_r = r.contains(flag);
            flagged |= in_l;
            if in_l != in_r {
                warnings.push(FlagWarning::Unpaired {
                    flag,
                    index,
                    left: l.to_owned(),
                    right: r.to_owned(),
                });
            }
        }
        if flagged {
            for cell in [l, r] {
                if cell.contains(BACK_REFERENCE) {
                    warnings.push(FlagWarning::BackReference {
                        index,
                        cell: cell.to_owned(),
                    });
                }
            }
        }
    }
    warnings
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::headword::BracketHeadword;

    fn flags() -> FlagSet {
        FlagSet::new("°†")
    }

    #[test]
    fn flagged_anywhere() {
        let f = flags();
        assert!(f.is_flagged("Haus°"));
        assert!(f.is_flagged("†Haus"));
        assert!(f.is_flagged("Ha°us"));
        assert!(!f.is_flagged("Haus"));
        assert!(!f.is_flagged(""));
    }

    #[test]
    fn strip_is_idempotent() {
        let f = flags();
        for t in ["Haus°", "°H†a°us†", "Haus", ""] {
            let once = f.strip(t);
            assert!(!f.is_flagged(&once));
            assert_eq!(f.strip(&once), once);
        }
        assert_eq!(f.strip("°H†a°us†"), "Haus");
    }

    #[test]
    fn mastered_only_unflagged() {
        let r = BracketHeadword::new("°†", "");
        let lists = vec![
            vec!["Haus°", " Gebäude "],
            vec!["Heim†", "Haus (n.)", "(leer)"],
        ];
        let mastered = mastered_headwords(&lists, &flags(), &r);
        let mut m = mastered.into_iter().collect::<Vec<_>>();
        m.sort();
        assert_eq!(m, ["Gebäude", "Haus"]);
    }

    #[test]
    fn usage_clean() {
        let w = check_flag_usage(&["a°", "b"], &["x°", "y"], &flags());
        assert!(w.is_empty());
    }

    #[test]
    fn usage_unpaired() {
        let w = check_flag_usage(&["a°", "b"], &["x", "y†"], &flags());
        assert_eq!(w.len(), 2);
        assert!(matches!(w[0], FlagWarning::Unpaired { flag: '°', index: 0, .. }));
        assert!(matches!(w[1], FlagWarning::Unpaired { flag: '†', index: 1, .. }));
        assert_eq!(w[0].to_string(), "° not in both columns at position 1: a° | x");
    }

    #[test]
    fn usage_back_reference() {
        let w = check_flag_usage(&["~ machen°"], &["do°"], &flags());
        assert_eq!(
            w,
            [FlagWarning::BackReference {
                index: 0,
                cell: "~ machen°".to_owned()
            }]
        );
    }

    #[test]
    fn usage_length_mismatch_ignored() {
        let w = check_flag_usage(&["a°"], &["x", "y"], &flags());
        assert!(w.is_empty());
    }
}
