//! Positional references in notes.
//!
//! A notes token can say something about the token at position N (1-based)
//! of the primary list:
//!
//! - `N: text` - free text for position N
//! - `N=M` or `N=M text` - position N is answered by position M
//! - `N≈M` or `N≈M text` - same as `=`
//!
//! Positions are single digits, so only lists of up to nine tokens can be
//! referenced. Other tokens are ignored.

use crate::errors::{DuplicateReferenceError, Result};
use std::collections::BTreeMap;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reference {
    /// 1-based position of the token that answers this one.
    pub target: Option<u32>,
    pub text: String,
}

pub type References = BTreeMap<u32, Reference>;

fn parse_one(token: &str) -> Option<(u32, Reference)> {
    let chars: Vec<char> = token.trim().chars().collect();
    if chars.len() < 3 {
        return None;
    }
    let key = chars[0].to_digit(10)?;
    if chars[1] == '=' || chars[1] == '≈' {
        let target = chars[2].to_digit(10)?;
        let text = if chars.len() <= 4 {
            String::new()
        } else {
            chars[4..].iter().collect()
        };
        Some((
            key,
            Reference {
                target: Some(target),
                text,
            },
        ))
    } else if chars[1] == ':' {
        Some((
            key,
            Reference {
                target: None,
                text: chars[3..].iter().collect(),
            },
        ))
    } else {
        None
    }
}

/// Collects all positional references of one notes field.
pub fn parse_references<S: AsRef<str>>(notes: &[S]) -> Result<References> {
    let mut refs = References::new();
    for token in notes {
        if let Some((key, reference)) = parse_one(token.as_ref()) {
            if refs.insert(key, reference).is_some() {
                return Err(DuplicateReferenceError {
                    position: key,
                    notes: notes.iter().map(|s| s.as_ref().to_owned()).collect(),
                }
                .into());
            }
        }
    }
    Ok(refs)
}
