//! Structural model of a sample-sentences results page.
//!
//! Markup adapters fill these types from real HTML; everything else in the
//! crate (parsing, highlighting, paging) only sees named fields. This keeps
//! the matching logic testable against synthetic pages.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

static CLICK_REFERENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(\d+\)").expect("static pattern"));

/// One character-bearing sub-element of a sentence.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CharacterElement {
    pub text: String,
    /// Inline background colour, when highlighted
    pub background: Option<String>,
}

impl CharacterElement {
    pub fn new<T: Into<String>>(text: T) -> Self {
        Self {
            text: text.into(),
            background: None,
        }
    }

    /// Text with surrounding whitespace removed.
    pub fn glyph(&self) -> &str {
        self.text.trim()
    }
}

/// A sentence as it appears on the page.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SentenceFragment {
    /// Value of the fragment's id attribute (e.g. `sen12`)
    pub id: String,
    /// Character elements in document order
    pub characters: Vec<CharacterElement>,
    /// Phonetic annotations per character block, in document order
    pub blocks: Vec<Vec<String>>,
    /// Inline background colour, when the whole sentence is highlighted
    pub background: Option<String>,
}

impl SentenceFragment {
    /// Build a fragment with one character element per code point and no
    /// phonetic blocks.
    pub fn from_text<I: Into<String>>(id: I, text: &str) -> Self {
        Self {
            id: id.into(),
            characters: text.chars().map(|c| CharacterElement::new(c.to_string())).collect(),
            blocks: Vec::new(),
            background: None,
        }
    }

    /// Attach phonetic blocks.
    pub fn with_blocks(mut self, blocks: Vec<Vec<String>>) -> Self {
        self.blocks = blocks;
        self
    }
}

/// One row of the results table.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResultRow {
    /// Id attributes of elements that are not sentence fragments
    /// (translation, pinyin line, audio buttons ...)
    pub element_ids: Vec<String>,
    /// Inline click handler sources, e.g. `playsen(12)`
    pub click_handlers: Vec<String>,
    /// Text of the displayed row-number cell, if the row has one
    pub row_number: Option<String>,
    /// Sentence fragments in document order
    pub sentences: Vec<SentenceFragment>,
}

impl ResultRow {
    /// Numeric value of the row-number cell.
    pub fn row_number_value(&self) -> Option<u64> {
        self.row_number.as_deref().and_then(|n| n.trim().parse().ok())
    }

    fn ids(&self) -> impl Iterator<Item = &str> {
        self.sentences
            .iter()
            .map(|s| s.id.as_str())
            .chain(self.element_ids.iter().map(String::as_str))
    }

    /// Rewrite every known id, the first click reference of every handler
    /// and the row-number cell to `new_id`.
    pub fn renumber(&mut self, new_id: u64, rules: &IdRules) {
        for fragment in &mut self.sentences {
            if let Some(id) = rules.rewrite(&fragment.id, new_id) {
                fragment.id = id;
            }
        }
        for id in &mut self.element_ids {
            if let Some(rewritten) = rules.rewrite(id, new_id) {
                *id = rewritten;
            }
        }
        let replacement = format!("({new_id})");
        for handler in &mut self.click_handlers {
            *handler = CLICK_REFERENCE
                .replace(handler, replacement.as_str())
                .into_owned();
        }
        if self.row_number.is_some() {
            self.row_number = Some(new_id.to_string());
        }
    }
}

/// A `(prefix, length)` id rule: ids starting with `prefix` followed by
/// digits keep their first `length` bytes and get a new numeric suffix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdRule {
    pub prefix: String,
    pub length: usize,
}

impl IdRule {
    pub fn new<P: Into<String>>(prefix: P, length: usize) -> Self {
        Self {
            prefix: prefix.into(),
            length,
        }
    }

    /// Numeric suffix of `id` if it matches this rule.
    pub fn suffix(&self, id: &str) -> Option<u64> {
        let rest = id.strip_prefix(self.prefix.as_str())?;
        if rest.is_empty() || !rest.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        rest.parse().ok()
    }
}

/// Validated table of id rules. The first rule is the primary one used to
/// find the current maximum id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdRules {
    rules: Vec<IdRule>,
}

impl Default for IdRules {
    fn default() -> Self {
        Self {
            rules: vec![
                IdRule::new("sen", 3),
                IdRule::new("ensen", 5),
                IdRule::new("ppysen", 6),
            ],
        }
    }
}

impl IdRules {
    pub fn new(rules: Vec<IdRule>) -> Result<Self> {
        if rules.is_empty() {
            return Err(Error::Validation("at least one id rule is required".into()));
        }
        for rule in &rules {
            if rule.prefix.is_empty() {
                return Err(Error::Validation("id rule prefix must not be empty".into()));
            }
            if rule.length > rule.prefix.len() || !rule.prefix.is_char_boundary(rule.length) {
                return Err(Error::Validation(format!(
                    "id rule '{}' keeps {} bytes but the prefix is only {} long",
                    rule.prefix,
                    rule.length,
                    rule.prefix.len()
                )));
            }
        }
        Ok(Self { rules })
    }

    pub fn primary(&self) -> &IdRule {
        &self.rules[0]
    }

    pub fn rules(&self) -> &[IdRule] {
        &self.rules
    }

    pub fn into_rules(self) -> Vec<IdRule> {
        self.rules
    }

    /// Longest rule matching `id`.
    fn matching(&self, id: &str) -> Option<&IdRule> {
        self.rules
            .iter()
            .filter(|rule| rule.suffix(id).is_some())
            .max_by_key(|rule| rule.prefix.len())
    }

    /// New id for `id`, or `None` when no rule applies.
    pub fn rewrite(&self, id: &str, new_id: u64) -> Option<String> {
        self.matching(id)
            .map(|rule| format!("{}{}", &id[..rule.length], new_id))
    }
}

/// The live results page: rows plus the footer range text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResultsDocument {
    pub rows: Vec<ResultRow>,
    pub footer: Option<String>,
}

impl ResultsDocument {
    pub fn new(rows: Vec<ResultRow>) -> Self {
        Self { rows, footer: None }
    }

    /// All sentence fragments in document order.
    pub fn fragments(&self) -> impl Iterator<Item = &SentenceFragment> {
        self.rows.iter().flat_map(|r| r.sentences.iter())
    }

    pub fn fragments_mut(&mut self) -> impl Iterator<Item = &mut SentenceFragment> {
        self.rows.iter_mut().flat_map(|r| r.sentences.iter_mut())
    }

    /// Largest numeric id matching the primary rule, 0 when there is none.
    pub fn largest_id(&self, rules: &IdRules) -> u64 {
        let primary = rules.primary();
        self.rows
            .iter()
            .flat_map(|r| r.ids())
            .filter_map(|id| primary.suffix(id))
            .max()
            .unwrap_or(0)
    }

    /// Append rows, renumbering them to continue after the current maximum id.
    /// Returns the ids assigned, in order. Nothing is appended when the new
    /// ids would not fit in a `u64`.
    pub fn append_rows(&mut self, rows: Vec<ResultRow>, rules: &IdRules) -> Result<Vec<u64>> {
        let largest = self.largest_id(rules);
        largest.checked_add(rows.len() as u64).ok_or_else(|| {
            Error::Markup(format!(
                "row id {largest} leaves no room for {} more row(s)",
                rows.len()
            ))
        })?;
        let mut assigned = Vec::with_capacity(rows.len());
        for (index, mut row) in rows.into_iter().enumerate() {
            let new_id = largest + index as u64 + 1;
            row.renumber(new_id, rules);
            assigned.push(new_id);
            self.rows.push(row);
        }
        Ok(assigned)
    }

    /// Smallest and largest numeric row-number cell.
    pub fn row_number_range(&self) -> Option<(u64, u64)> {
        let mut numbers = self.rows.iter().filter_map(ResultRow::row_number_value);
        let first = numbers.next()?;
        Some(numbers.fold((first, first), |(lo, hi), n| (lo.min(n), hi.max(n))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(n: u64) -> ResultRow {
        ResultRow {
            element_ids: vec![format!("ensen{n}"), format!("ppysen{n}"), "audio".into()],
            click_handlers: vec![format!("playsen({n}); return false;")],
            row_number: Some(n.to_string()),
            sentences: vec![SentenceFragment::from_text(format!("sen{n}"), "你好")],
        }
    }

    #[test]
    fn rule_suffix_requires_digits() {
        let rule = IdRule::new("sen", 3);
        assert_eq!(rule.suffix("sen42"), Some(42));
        assert_eq!(rule.suffix("sen"), None);
        assert_eq!(rule.suffix("sentence"), None);
        assert_eq!(rule.suffix("ensen4"), None);
    }

    #[test]
    fn unknown_ids_are_untouched() {
        let rules = IdRules::default();
        assert_eq!(rules.rewrite("audio", 9), None);
        assert_eq!(rules.rewrite("ensen3", 9).as_deref(), Some("ensen9"));
        assert_eq!(rules.rewrite("ppysen3", 9).as_deref(), Some("ppysen9"));
    }

    #[test]
    fn longest_prefix_wins() {
        let rules = IdRules::new(vec![IdRule::new("s", 1), IdRule::new("sen", 3)]).unwrap();
        assert_eq!(rules.rewrite("sen5", 8).as_deref(), Some("sen8"));
        assert_eq!(rules.rewrite("s5", 8).as_deref(), Some("s8"));
    }

    #[test]
    fn rules_are_validated() {
        assert!(IdRules::new(vec![]).is_err());
        assert!(IdRules::new(vec![IdRule::new("", 0)]).is_err());
        assert!(IdRules::new(vec![IdRule::new("sen", 4)]).is_err());
    }

    #[test]
    fn largest_id_defaults_to_zero() {
        let doc = ResultsDocument::default();
        assert_eq!(doc.largest_id(&IdRules::default()), 0);
    }

    #[test]
    fn append_continues_after_largest_id() {
        let rules = IdRules::default();
        let mut doc = ResultsDocument::new(vec![row(1), row(2), row(7)]);
        let assigned = doc.append_rows(vec![row(1), row(300)], &rules).unwrap();
        assert_eq!(assigned, vec![8, 9]);

        let last = &doc.rows[4];
        assert_eq!(last.sentences[0].id, "sen9");
        assert_eq!(last.element_ids, vec!["ensen9", "ppysen9", "audio"]);
        assert_eq!(last.click_handlers, vec!["playsen(9); return false;"]);
        assert_eq!(last.row_number.as_deref(), Some("9"));
    }

    #[test]
    fn append_past_largest_id_is_rejected() {
        let rules = IdRules::default();
        let mut last = row(1);
        last.sentences[0].id = format!("sen{}", u64::MAX);
        let mut doc = ResultsDocument::new(vec![last]);

        let err = doc.append_rows(vec![row(1)], &rules).unwrap_err();
        assert!(matches!(err, Error::Markup(_)));
        assert_eq!(doc.rows.len(), 1);

        // exactly fits
        let mut near = row(1);
        near.sentences[0].id = format!("sen{}", u64::MAX - 1);
        let mut doc = ResultsDocument::new(vec![near]);
        assert_eq!(doc.append_rows(vec![row(1)], &rules).unwrap(), vec![u64::MAX]);
    }

    #[test]
    fn only_first_click_reference_is_rewritten() {
        let mut r = row(3);
        r.click_handlers = vec!["swap(3, 1); mark(3)".into(), "go(4)".into()];
        r.renumber(11, &IdRules::default());
        assert_eq!(r.click_handlers, vec!["swap(3, 1); mark(11)", "go(11)"]);
    }

    #[test]
    fn row_number_range_ignores_non_numeric_cells() {
        let mut odd = row(5);
        odd.row_number = Some("n/a".into());
        let doc = ResultsDocument::new(vec![row(4), odd, row(9)]);
        assert_eq!(doc.row_number_range(), Some((4, 9)));
        assert_eq!(ResultsDocument::default().row_number_range(), None);
    }
}
