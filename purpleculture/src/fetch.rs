//! HTTP page fetching.
//!
//! Uses the `reqwest` blocking client; page loads are strictly sequential so
//! no async runtime is involved.

use std::time::Duration;

use sentence_highlighter_core::{Error, PageFetcher, Result};

const USER_AGENT: &str = concat!("purpleculture-highlighter/", env!("CARGO_PKG_VERSION"));

/// Fetches pages over HTTP(S).
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    /// Create a fetcher whose requests give up after `timeout_ms`.
    pub fn new(timeout_ms: u64) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::Config(format!("http client: {e}")))?;
        Ok(Self { client })
    }
}

impl PageFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String> {
        let fail = |e: reqwest::Error| Error::Fetch {
            url: url.to_string(),
            reason: e.to_string(),
        };

        tracing::debug!("GET {}", url);
        let response = self.client.get(url).send().map_err(fail)?;
        let response = response.error_for_status().map_err(fail)?;
        response.text().map_err(fail)
    }
}

/// Serves a page saved on disk, whatever URL is asked for.
pub struct FileFetcher {
    path: std::path::PathBuf,
}

impl FileFetcher {
    pub fn new<P: Into<std::path::PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }
}

impl PageFetcher for FileFetcher {
    fn fetch(&self, url: &str) -> Result<String> {
        std::fs::read_to_string(&self.path).map_err(|e| Error::Fetch {
            url: url.to_string(),
            reason: format!("{}: {}", self.path.display(), e),
        })
    }
}
