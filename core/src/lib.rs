//! sentence-highlighter-core
//!
//! Site-neutral logic for finding example sentences a learner can already
//! read: character-set parsing, sentence parsing, the constructibility
//! predicate, highlighting, result-page paging with id renumbering, a
//! persisted key-value store for the user's characters, and the orchestrator
//! that ties them together.
//!
//! Public API:
//! - `CharacterSet` - accepted glyphs parsed from raw user input
//! - `Sentence` - characters and phonetic tokens parsed from a fragment
//! - `ResultsDocument` - structural model of a results page
//! - `Highlighter` - marks matching sentences and characters
//! - `Pager` - sequential, throttled loading of further result pages
//! - `CharacterStore` - get/set persistence for the raw character data
//! - `App` - orchestrator (prompt, process, paginate, refresh)
//! - `Config` - configuration and defaults
use serde::{Deserialize, Serialize};

pub mod error;
pub use error::{Error, Result};

pub mod charset;
pub use charset::{CharacterSet, CHINESE_PUNCTUATION};

pub mod document;
pub use document::{CharacterElement, IdRule, IdRules, ResultRow, ResultsDocument, SentenceFragment};

pub mod sentence;
pub use sentence::Sentence;

pub mod highlight;
pub use highlight::{Colors, Highlighter};

pub mod address;
pub use address::{PageAddress, PageState};

pub mod pager;
pub use pager::{Delay, MarkupAdapter, PageFetcher, Pager, PagerPhase, ThreadDelay};

pub mod store;
pub use store::{CharacterStore, MemoryStore, RedbStore, RAW_DATA_KEY};

pub mod panel;
pub use panel::DisplayPanel;

pub mod app;
pub use app::{App, EditOutcome, Prompt, RunOutcome};

/// Runtime configuration shared by every front end.
///
/// Every field has a default, so a TOML file only needs to name the values
/// it overrides.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Number of extra result pages fetched after the first one
    pub load_pages_count: usize,

    /// Pause between two page loads, in milliseconds
    pub request_delay_ms: u64,

    /// HTTP client timeout for one page load, in milliseconds
    pub fetch_timeout_ms: u64,

    /// Scheme and host of the sample-sentences site, without trailing slash
    pub base_url: String,

    /// Highlight colours
    pub colors: Colors,

    /// Punctuation always accepted in addition to the user's characters
    pub punctuation: Vec<String>,

    /// Id renumbering rules; the first rule also locates the current maximum id
    pub id_rules: Vec<IdRule>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            load_pages_count: 4,
            request_delay_ms: 303,
            fetch_timeout_ms: 30_000,
            base_url: "https://www.purpleculture.net".to_string(),
            colors: Colors::default(),
            punctuation: CHINESE_PUNCTUATION.iter().map(|p| p.to_string()).collect(),
            id_rules: IdRules::default().into_rules(),
        }
    }
}

impl Config {
    /// Load and validate configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to TOML string.
    pub fn to_toml_string(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Check the invariants serde cannot express.
    pub fn validate(&self) -> Result<()> {
        IdRules::new(self.id_rules.clone())?;
        if self.base_url.trim().is_empty() {
            return Err(Error::Validation("base_url must not be empty".into()));
        }
        Ok(())
    }

    /// The id rules as a validated table.
    pub fn id_rules(&self) -> Result<IdRules> {
        IdRules::new(self.id_rules.clone())
    }

    /// Delay between page loads as a `Duration`.
    pub fn request_delay(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.request_delay_ms)
    }
}

/// Utility helpers.
pub mod utils {
    /// Normalize input strings (NFC) and trim whitespace.
    pub fn normalize(s: &str) -> String {
        use unicode_normalization::UnicodeNormalization;
        s.nfc().collect::<String>().trim().to_string()
    }
}
