//! Character-set parsing.
//!
//! The user pastes either a list of words, one per line, or a single unbroken
//! run of characters. Both forms are turned into a set of accepted tokens
//! that always includes the full-width punctuation below.

use ahash::AHashSet;

use crate::utils::normalize;

/// Full-width punctuation accepted in every sentence.
pub const CHINESE_PUNCTUATION: [&str; 17] = [
    "，", "。", "？", "！", "；", "：", "、", "（", "）", "《", "》", "\u{201C}", "\u{201D}",
    "\u{2018}", "\u{2019}", "【", "】",
];

/// Deduplicated set of accepted glyphs (or words).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharacterSet {
    tokens: AHashSet<String>,
}

impl CharacterSet {
    /// Parse raw user input, adding `punctuation` to the result.
    ///
    /// Multi-line input yields one token per non-empty trimmed line. Input that
    /// collapses to a single line is exploded into its code points.
    pub fn parse<S: AsRef<str>>(raw: &str, punctuation: &[S]) -> Self {
        let normalized = normalize(raw);
        let lines: Vec<&str> = normalized.split('\n').map(str::trim).collect();

        let mut tokens: AHashSet<String> = if lines.len() == 1 {
            lines[0].chars().map(|c| c.to_string()).collect()
        } else {
            lines
                .into_iter()
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect()
        };
        tokens.extend(punctuation.iter().map(|p| p.as_ref().to_string()));

        Self { tokens }
    }

    /// Parse with the default punctuation list.
    pub fn parse_default(raw: &str) -> Self {
        Self::parse(raw, &CHINESE_PUNCTUATION)
    }

    /// Check whether a glyph (or word) is accepted.
    pub fn contains(&self, glyph: &str) -> bool {
        self.tokens.contains(glyph)
    }

    /// Check whether a single code point is accepted.
    pub fn contains_char(&self, ch: char) -> bool {
        let mut buf = [0u8; 4];
        self.tokens.contains(&*ch.encode_utf8(&mut buf))
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }

    /// Tokens sorted by code point, for stable output.
    pub fn sorted(&self) -> Vec<&str> {
        let mut out: Vec<&str> = self.iter().collect();
        out.sort_unstable();
        out
    }
}
