//! Site configuration that extends the base `Config` from core.
//!
//! This configuration includes:
//! - All generic options from `sentence_highlighter_core::Config` (flattened via serde)
//! - The CSS selectors the markup adapter reads the results page with
//!
//! # Example
//!
//! ```rust
//! use purpleculture::SiteConfig;
//!
//! let config = SiteConfig::default();
//! assert_eq!(config.selectors.sentence, ".sc.samplesen");
//! let base = config.into_base();
//! assert_eq!(base.load_pages_count, 4);
//! ```

use serde::{Deserialize, Serialize};

use sentence_highlighter_core::{Config, Error, Result};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Base configuration fields (paging, colours, punctuation, id rules)
    #[serde(flatten)]
    pub base: Config,

    pub selectors: SelectorConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base: Config::default(),
            selectors: SelectorConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load a site configuration from a TOML file.
    pub fn load_toml<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("read {}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate a site configuration.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        config.base.validate()?;
        Ok(config)
    }

    /// Convert into the base config.
    pub fn into_base(self) -> Config {
        self.base
    }

    pub fn base(&self) -> &Config {
        &self.base
    }

    pub fn base_mut(&mut self) -> &mut Config {
        &mut self.base
    }
}

/// CSS selectors for the parts of the results page the tool reads.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Body of the results table
    pub results_table: String,
    /// Rows inside the results table
    pub row: String,
    /// Sentence fragment
    pub sentence: String,
    /// Character-bearing element inside a sentence
    pub character: String,
    /// Per-character block inside a sentence
    pub block: String,
    /// Phonetic annotation inside a block
    pub phonetic: String,
    /// Displayed row-number cell
    pub row_number: String,
    /// Footer showing the displayed range
    pub footer: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            results_table: ".card-body .table tbody".to_string(),
            row: "tr".to_string(),
            sentence: ".sc.samplesen".to_string(),
            character: ".cnchar".to_string(),
            block: ".cnblock".to_string(),
            phonetic: ".pinyin".to_string(),
            row_number: "td.px-0.d-print-none".to_string(),
            footer: ".card-footer .pt-2".to_string(),
        }
    }
}
