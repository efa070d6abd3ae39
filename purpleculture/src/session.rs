//! One highlighting session: character data check, first page, paging.
//!
//! The binary and the integration tests drive the same code. Page sources,
//! the store and the prompt are passed in, so a session runs the same over
//! HTTP, over saved pages, or over fixtures.

use tracing::info;

use sentence_highlighter_core::{
    App, CharacterStore, Config, Delay, DisplayPanel, EditOutcome, Error, MarkupAdapter,
    PageAddress, PageFetcher, PageState, Pager, Prompt, Result, ResultsDocument, RunOutcome,
    Sentence, ThreadDelay,
};

use crate::markup::PurpleCultureMarkup;

/// Everything a completed run leaves behind.
#[derive(Debug)]
pub struct PageReport {
    pub document: ResultsDocument,
    pub panel: DisplayPanel,
    pub buildable: Vec<Sentence>,
    pub pages_appended: usize,
    /// Paging failure, if paging stopped early. Earlier pages are kept.
    pub failure: Option<Error>,
}

/// Result of `Session::edit`.
#[derive(Debug)]
pub struct EditReport {
    pub outcome: EditOutcome,
    /// The rerun after a save, when a URL was given. `None` inside means the
    /// rerun itself was declined.
    pub reload: Option<Option<PageReport>>,
}

/// Binds the config and markup adapter to the page sources.
///
/// `first_page` serves the URL the user asked for; `fetcher` serves every
/// appended page.
pub struct Session<G, F, D = ThreadDelay> {
    config: Config,
    adapter: PurpleCultureMarkup,
    first_page: G,
    fetcher: F,
    delay: D,
}

impl<G: PageFetcher, F: PageFetcher> Session<G, F, ThreadDelay> {
    pub fn new(config: Config, adapter: PurpleCultureMarkup, first_page: G, fetcher: F) -> Self {
        Self {
            config,
            adapter,
            first_page,
            fetcher,
            delay: ThreadDelay,
        }
    }
}

impl<G: PageFetcher, F: PageFetcher, D: Delay> Session<G, F, D> {
    /// Replace the pause between page loads.
    pub fn with_delay<D2: Delay>(self, delay: D2) -> Session<G, F, D2> {
        Session {
            config: self.config,
            adapter: self.adapter,
            first_page: self.first_page,
            fetcher: self.fetcher,
            delay,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Highlight `url` and append further pages.
    ///
    /// Character data is checked first; when the user declines, `Ok(None)`
    /// comes back and no page is requested.
    pub fn run<S, P>(&self, url: &str, store: S, prompt: P) -> Result<Option<PageReport>>
    where
        S: CharacterStore,
        P: Prompt,
    {
        let mut app = App::new(self.config.clone(), store, prompt)?;
        if !app.ensure_user_data()? {
            info!("No data provided. Exiting script.");
            return Ok(None);
        }

        let markup = self.first_page.fetch(url)?;
        let mut document = self.adapter.parse_document(&markup)?;
        info!("first page has {} row(s)", document.rows.len());

        let mut pager = Pager::new(
            &self.fetcher,
            &self.adapter,
            PageAddress::from_url(self.config.base_url.clone(), url),
            PageState::from_url(url),
            &self.config,
        )?
        .with_delay(&self.delay);

        let (pages_appended, failure) = match app.run(&mut document, &mut pager)? {
            RunOutcome::Declined => return Ok(None),
            RunOutcome::Completed {
                pages_appended,
                failure,
            } => (pages_appended, failure),
        };

        Ok(Some(PageReport {
            panel: app.panel().cloned().unwrap_or_default(),
            buildable: app.buildable().to_vec(),
            document,
            pages_appended,
            failure,
        }))
    }

    /// Edit the stored characters, then rerun `url` from scratch after a save.
    ///
    /// The same prompt serves both steps.
    pub fn edit<S, P>(&self, url: Option<&str>, store: &S, mut prompt: P) -> Result<EditReport>
    where
        S: CharacterStore,
        P: Prompt,
    {
        let outcome = App::new(self.config.clone(), store, &mut prompt)?.edit_characters()?;
        let reload = match (outcome, url) {
            (EditOutcome::Reload, Some(url)) => Some(self.run(url, store, &mut prompt)?),
            _ => None,
        };
        Ok(EditReport { outcome, reload })
    }
}
