//! Control panel listing the buildable sentences.

use crate::sentence::Sentence;

const EMPTY_LIST: &str = "No buildable sentences found";

/// State of the floating panel: a status line, the list of buildable
/// sentences, and whether the list is collapsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayPanel {
    info: String,
    sentences: Vec<String>,
    collapsed: bool,
}

impl Default for DisplayPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayPanel {
    pub fn new() -> Self {
        Self {
            info: "Loading...".to_string(),
            sentences: Vec::new(),
            collapsed: false,
        }
    }

    pub fn info(&self) -> &str {
        &self.info
    }

    pub fn sentences(&self) -> &[String] {
        &self.sentences
    }

    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    /// Flip between collapsed and expanded; returns the new state.
    pub fn toggle(&mut self) -> bool {
        self.collapsed = !self.collapsed;
        self.collapsed
    }

    pub fn update_sentence_count(&mut self, count: usize) {
        self.info = format!("Found ({count}) sentences");
    }

    pub fn update_buildable_sentences(&mut self, sentences: &[Sentence]) {
        self.sentences = sentences.iter().map(|s| s.characters.clone()).collect();
    }

    /// Lines shown in the list area.
    pub fn list_lines(&self) -> Vec<&str> {
        if self.sentences.is_empty() {
            vec![EMPTY_LIST]
        } else {
            self.sentences.iter().map(String::as_str).collect()
        }
    }

    /// Plain-text rendering: status line, then the list unless collapsed.
    pub fn render_text(&self) -> String {
        let mut out = self.info.clone();
        out.push('\n');
        if self.collapsed {
            return out;
        }
        for line in self.list_lines() {
            out.push_str("  ");
            out.push_str(line);
            out.push('\n');
        }
        out
    }
}
