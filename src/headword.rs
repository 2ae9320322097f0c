//! Headwords: canonical lookup keys for tokens.

/// Maps a token to its headword.
///
/// Implementations must be idempotent and must give the same headword for a
/// token with and without flag characters. An empty headword means "no key".
pub trait HeadwordResolver {
    fn headword(&self, token: &str) -> String;
}

impl<F> HeadwordResolver for F
where
    F: Fn(&str) -> String,
{
    fn headword(&self, token: &str) -> String {
        self(token)
    }
}

/// Default resolver: deletes the given characters, then keeps the part
/// before the first `[` or `(`, trimmed.
///
/// `gegen [acc.]` and `Haus° (n.)` both become plain words this way.
pub struct BracketHeadword {
    strip: Vec<char>,
}

impl BracketHeadword {
    pub fn new(flags: &str, strip: &str) -> BracketHeadword {
        let mut chars: Vec<char> = flags.chars().chain(strip.chars()).collect();
        chars.sort_unstable();
        chars.dedup();
        BracketHeadword { strip: chars }
    }
}

impl HeadwordResolver for BracketHeadword {
    fn headword(&self, token: &str) -> String {
        let cleaned: String = token
            .trim()
            .chars()
            .filter(|c| !self.strip.contains(c))
            .collect();
        let end = cleaned.find(['[', '(']).unwrap_or(cleaned.len());
        cleaned[..end].trim().to_owned()
    }
}
