//! Sentence and character highlighting.

use serde::{Deserialize, Serialize};

use crate::charset::CharacterSet;
use crate::document::SentenceFragment;

/// Background colours for the two highlight states.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Colors {
    /// Whole sentence is constructible
    pub matching_sentence: String,
    /// Single character is in the set
    pub matching_character: String,
}

impl Default for Colors {
    fn default() -> Self {
        Self {
            matching_sentence: "#BCB".to_string(),
            matching_character: "#F9ff88".to_string(),
        }
    }
}

/// Marks fragments of the live document. Both operations are idempotent.
#[derive(Debug, Clone, Default)]
pub struct Highlighter {
    colors: Colors,
}

impl Highlighter {
    pub fn new(colors: Colors) -> Self {
        Self { colors }
    }

    pub fn colors(&self) -> &Colors {
        &self.colors
    }

    /// Mark the whole fragment as a full match.
    pub fn highlight_sentence(&self, fragment: &mut SentenceFragment) {
        fragment.background = Some(self.colors.matching_sentence.clone());
    }

    /// Mark every character element whose glyph is in `set`.
    /// Returns the number of marked elements.
    pub fn highlight_characters(&self, fragment: &mut SentenceFragment, set: &CharacterSet) -> usize {
        let mut marked = 0;
        for element in &mut fragment.characters {
            if set.contains(element.glyph()) {
                element.background = Some(self.colors.matching_character.clone());
                marked += 1;
            }
        }
        marked
    }
}
