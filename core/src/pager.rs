//! Sequential loading of further result pages.
//!
//! Each cycle advances the page counter, fetches the next page, parses its
//! rows and appends them to the live document with fresh ids, then waits the
//! configured delay before the next request. Cycles never overlap.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::address::{PageAddress, PageState};
use crate::document::{IdRules, ResultsDocument};
use crate::error::{Error, Result};
use crate::Config;

/// Retrieves the markup of a page.
pub trait PageFetcher {
    fn fetch(&self, url: &str) -> Result<String>;
}

impl<T: PageFetcher + ?Sized> PageFetcher for &T {
    fn fetch(&self, url: &str) -> Result<String> {
        (**self).fetch(url)
    }
}

impl<T: PageFetcher + ?Sized> PageFetcher for Box<T> {
    fn fetch(&self, url: &str) -> Result<String> {
        (**self).fetch(url)
    }
}

/// Turns page markup into the structural model.
pub trait MarkupAdapter {
    fn parse_document(&self, markup: &str) -> Result<ResultsDocument>;
}

impl<T: MarkupAdapter + ?Sized> MarkupAdapter for &T {
    fn parse_document(&self, markup: &str) -> Result<ResultsDocument> {
        (**self).parse_document(markup)
    }
}

/// Pause between two page loads.
pub trait Delay {
    fn wait(&self, duration: Duration);
}

/// Blocks the current thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadDelay;

impl Delay for ThreadDelay {
    fn wait(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

impl<T: Delay + ?Sized> Delay for &T {
    fn wait(&self, duration: Duration) {
        (**self).wait(duration)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagerPhase {
    Idle,
    Fetching,
    Appended,
    Waiting,
    Done,
}

pub struct Pager<F, A, D = ThreadDelay> {
    fetcher: F,
    adapter: A,
    delay: D,
    address: PageAddress,
    state: PageState,
    pages: usize,
    interval: Duration,
    rules: IdRules,
    phase: PagerPhase,
    appended: usize,
}

impl<F: PageFetcher, A: MarkupAdapter> Pager<F, A, ThreadDelay> {
    /// Create a pager using the page count, delay and id rules from `config`.
    pub fn new(
        fetcher: F,
        adapter: A,
        address: PageAddress,
        state: PageState,
        config: &Config,
    ) -> Result<Self> {
        Ok(Self {
            fetcher,
            adapter,
            delay: ThreadDelay,
            address,
            state,
            pages: config.load_pages_count,
            interval: config.request_delay(),
            rules: config.id_rules()?,
            phase: PagerPhase::Idle,
            appended: 0,
        })
    }
}

impl<F: PageFetcher, A: MarkupAdapter, D: Delay> Pager<F, A, D> {
    /// Replace the delay implementation.
    pub fn with_delay<D2: Delay>(self, delay: D2) -> Pager<F, A, D2> {
        Pager {
            fetcher: self.fetcher,
            adapter: self.adapter,
            delay,
            address: self.address,
            state: self.state,
            pages: self.pages,
            interval: self.interval,
            rules: self.rules,
            phase: self.phase,
            appended: self.appended,
        }
    }

    pub fn phase(&self) -> PagerPhase {
        self.phase
    }

    pub fn state(&self) -> PageState {
        self.state
    }

    /// Pages appended so far, across calls.
    pub fn pages_appended(&self) -> usize {
        self.appended
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn delay(&self) -> &D {
        &self.delay
    }

    pub fn rules(&self) -> &IdRules {
        &self.rules
    }

    /// Run every cycle, calling `on_page_loaded` after each append.
    ///
    /// Returns the number of pages appended. The first failure stops the
    /// sequence and comes back as [`Error::PageLoad`]; pages already appended
    /// stay in the document.
    pub fn load_pages<C>(&mut self, document: &mut ResultsDocument, mut on_page_loaded: C) -> Result<usize>
    where
        C: FnMut(&mut ResultsDocument),
    {
        let mut appended = 0;
        for _ in 0..self.pages {
            if let Err(e) = self.load_next(document) {
                warn!("page loading stopped after {} page(s): {}", appended, e);
                self.phase = PagerPhase::Done;
                return Err(Error::page_load(e));
            }
            appended += 1;
            self.appended += 1;
            on_page_loaded(document);

            self.set_phase(PagerPhase::Waiting);
            self.delay.wait(self.interval);
            self.set_phase(PagerPhase::Idle);
        }
        self.set_phase(PagerPhase::Done);
        Ok(appended)
    }

    fn load_next(&mut self, document: &mut ResultsDocument) -> Result<Vec<u64>> {
        let page = self.state.increment()?;
        let url = self.address.for_page(page);

        self.set_phase(PagerPhase::Fetching);
        let markup = self.fetcher.fetch(&url)?;
        let fetched = self.adapter.parse_document(&markup)?;

        let assigned = document.append_rows(fetched.rows, &self.rules)?;
        self.set_phase(PagerPhase::Appended);
        info!("appended {} row(s) from page {}", assigned.len(), page);
        Ok(assigned)
    }

    fn set_phase(&mut self, phase: PagerPhase) {
        debug!("pager {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
    }
}
