//! purpleculture crate root
//!
//! This crate binds `sentence-highlighter-core` to purpleculture.net: the
//! markup adapter for its results pages, an HTTP page fetcher, the site
//! configuration with its CSS selectors, a terminal prompt, and an HTML
//! report writer.
//!
//! Public API exported here:
//! - `PurpleCultureMarkup` from `markup`
//! - `HttpFetcher`, `FileFetcher` from `fetch`
//! - `SiteConfig`, `SelectorConfig` from `config`
//! - `LinePrompt` from `prompt`
//! - `render_html` from `report`
//! - `Session`, `PageReport`, `EditReport` from `session`

pub mod config;
pub mod fetch;
pub mod markup;
pub mod prompt;
pub mod report;
pub mod session;

// Re-export the core types callers need alongside the site adapter.
pub use sentence_highlighter_core::{
    App, CharacterSet, CharacterStore, Config, EditOutcome, Error, MemoryStore, PageAddress,
    PageState, Pager, RedbStore, ResultsDocument, RunOutcome, Sentence,
};

pub use config::{SelectorConfig, SiteConfig};
pub use fetch::{FileFetcher, HttpFetcher};
pub use markup::PurpleCultureMarkup;
pub use prompt::LinePrompt;
pub use report::render_html;
pub use session::{EditReport, PageReport, Session};
