//! Sentences and the constructibility predicate.

use serde::{Deserialize, Serialize};

use crate::charset::CharacterSet;
use crate::document::SentenceFragment;

/// A parsed example sentence.
///
/// Equality and hashing compare every field, so two fragments with the same
/// id, text and phonetics are the same sentence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sentence {
    pub id: String,
    pub characters: String,
    /// Phonetic tokens in block order. The count may differ from the number
    /// of characters when a block carries zero or several annotations.
    pub phonetics: Vec<String>,
}

impl Sentence {
    pub fn new<I: Into<String>, C: Into<String>>(id: I, characters: C) -> Self {
        Self {
            id: id.into(),
            characters: characters.into(),
            phonetics: Vec::new(),
        }
    }

    /// Parse a sentence from its page fragment.
    pub fn parse(fragment: &SentenceFragment) -> Self {
        let characters = fragment
            .characters
            .iter()
            .map(|c| c.glyph())
            .collect::<String>();
        let phonetics = fragment
            .blocks
            .iter()
            .flat_map(|block| block.iter())
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();

        Self {
            id: fragment.id.clone(),
            characters,
            phonetics,
        }
    }

    /// True iff every code point of the sentence is in `set`.
    pub fn is_constructible_from(&self, set: &CharacterSet) -> bool {
        self.characters.chars().all(|c| set.contains_char(c))
    }

    /// Phonetic tokens joined by spaces.
    pub fn phonetic_line(&self) -> String {
        self.phonetics.join(" ")
    }
}
