//! Result-page addresses and the current page counter.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Error, Result};

static WORD_PARAM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[?&]word(=([^&#]*)|&|#|$)").expect("static pattern"));
static PAGE_PARAM: Lazy<Regex> = Lazy::new(|| Regex::new(r"page=(\d+)").expect("static pattern"));

/// Decoded `word` query parameter of a results URL.
///
/// Returns `None` when the parameter is absent and an empty string when it
/// has no value. `+` decodes to a space.
pub fn search_word(url: &str) -> Option<String> {
    let caps = WORD_PARAM.captures(url)?;
    let raw = match caps.get(2) {
        Some(value) => value.as_str(),
        None => return Some(String::new()),
    };
    let spaced = raw.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(decoded) => Some(decoded.into_owned()),
        Err(e) => {
            tracing::warn!("word parameter is not valid UTF-8 after decoding ({e}); using it as-is");
            Some(spaced)
        }
    }
}

/// Numeric `page` parameter of a results URL.
pub fn page_number(url: &str) -> Option<u32> {
    PAGE_PARAM
        .captures(url)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Builds the address of any result page for one search term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageAddress {
    base: String,
    term: String,
}

impl PageAddress {
    pub fn new<B: Into<String>, T: Into<String>>(base: B, term: T) -> Self {
        let base = base.into();
        Self {
            base: base.trim_end_matches('/').to_string(),
            term: term.into(),
        }
    }

    /// Address for a results URL, taking the term from its `word` parameter.
    pub fn from_url<B: Into<String>>(base: B, url: &str) -> Self {
        Self::new(base, search_word(url).unwrap_or_default())
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    /// `{base}/sample_sentences/?word={term}&page={n}`, term inserted verbatim.
    pub fn for_page(&self, page: u32) -> String {
        format!("{}/sample_sentences/?word={}&page={}", self.base, self.term, page)
    }
}

/// Current page number. Only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageState {
    current: u32,
}

impl PageState {
    /// Start at `initial`, or page 1 when unknown.
    pub fn new(initial: Option<u32>) -> Self {
        Self {
            current: initial.unwrap_or(1),
        }
    }

    /// Start at the page named by a results URL.
    pub fn from_url(url: &str) -> Self {
        Self::new(page_number(url))
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    /// Advance one page and return the new number.
    pub fn increment(&mut self) -> Result<u32> {
        self.current = self.current.checked_add(1).ok_or_else(|| {
            Error::Validation(format!("page {} is the last addressable page", self.current))
        })?;
        Ok(self.current)
    }
}

impl Default for PageState {
    fn default() -> Self {
        Self::new(None)
    }
}
