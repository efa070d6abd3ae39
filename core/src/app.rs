//! Orchestrator: character data, sentence processing and paging.
//!
//! Flow of one run:
//! 1. load the raw characters from the store, prompting when absent
//! 2. build the panel and process the sentences already on the page
//! 3. load further pages, re-processing after each append
//!
//! Editing the characters persists the new value and asks the caller to
//! start over with a fresh `App`.

use ahash::AHashSet;
use tracing::{error, info};

use crate::charset::CharacterSet;
use crate::document::ResultsDocument;
use crate::error::{Error, Result};
use crate::highlight::Highlighter;
use crate::pager::{Delay, MarkupAdapter, PageFetcher, Pager};
use crate::panel::DisplayPanel;
use crate::sentence::Sentence;
use crate::store::{CharacterStore, RAW_DATA_KEY};
use crate::Config;

/// Asks the user for text.
pub trait Prompt {
    /// Show `message` with `default` prefilled. `None` means cancelled.
    fn ask(&mut self, message: &str, default: Option<&str>) -> Option<String>;
}

impl<T: Prompt + ?Sized> Prompt for &mut T {
    fn ask(&mut self, message: &str, default: Option<&str>) -> Option<String> {
        (**self).ask(message, default)
    }
}

#[derive(Debug)]
pub enum RunOutcome {
    /// No character data and the prompt was declined; nothing was built.
    Declined,
    /// The panel was built and paging ran. `failure` holds the error that
    /// stopped paging early, if any.
    Completed {
        pages_appended: usize,
        failure: Option<Error>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// New characters were saved; highlighting must restart from scratch.
    Reload,
    Unchanged,
}

pub struct App<S, P> {
    config: Config,
    store: S,
    prompt: P,
    highlighter: Highlighter,
    user_characters: Option<String>,
    character_set: Option<CharacterSet>,
    sentences: Vec<Sentence>,
    buildable: Vec<Sentence>,
    panel: Option<DisplayPanel>,
}

impl<S: CharacterStore, P: Prompt> App<S, P> {
    /// Create the app, reading any stored character data.
    pub fn new(config: Config, store: S, prompt: P) -> Result<Self> {
        let user_characters = store.get(RAW_DATA_KEY)?.filter(|raw| !raw.is_empty());
        Ok(Self {
            highlighter: Highlighter::new(config.colors.clone()),
            config,
            store,
            prompt,
            user_characters,
            character_set: None,
            sentences: Vec::new(),
            buildable: Vec::new(),
            panel: None,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn prompt_mut(&mut self) -> &mut P {
        &mut self.prompt
    }

    pub fn user_characters(&self) -> Option<&str> {
        self.user_characters.as_deref()
    }

    /// The panel, once `run` has built it.
    pub fn panel(&self) -> Option<&DisplayPanel> {
        self.panel.as_ref()
    }

    pub fn panel_mut(&mut self) -> Option<&mut DisplayPanel> {
        self.panel.as_mut()
    }

    /// Every sentence found by the latest processing pass.
    pub fn sentences(&self) -> &[Sentence] {
        &self.sentences
    }

    /// Constructible sentences from the latest pass, deduplicated.
    pub fn buildable(&self) -> &[Sentence] {
        &self.buildable
    }

    /// Make sure character data exists, prompting and persisting if needed.
    /// Returns false when the user declined.
    pub fn ensure_user_data(&mut self) -> Result<bool> {
        if self.user_characters.is_some() {
            return Ok(true);
        }

        let input = match self.prompt.ask("Paste known characters:", None) {
            Some(input) if !input.is_empty() => input,
            _ => return Ok(false),
        };

        self.store.set(RAW_DATA_KEY, &input)?;
        self.user_characters = Some(input);
        self.character_set = None;
        Ok(true)
    }

    /// The parsed character set, computed once per run.
    pub fn character_set(&mut self) -> &CharacterSet {
        let raw = self.user_characters.as_deref().unwrap_or("");
        let punctuation = &self.config.punctuation;
        self.character_set
            .get_or_insert_with(|| CharacterSet::parse(raw, punctuation))
    }

    /// Full run against the live document.
    pub fn run<F, A, D>(&mut self, document: &mut ResultsDocument, pager: &mut Pager<F, A, D>) -> Result<RunOutcome>
    where
        F: PageFetcher,
        A: MarkupAdapter,
        D: Delay,
    {
        if !self.ensure_user_data()? {
            info!("No data provided. Exiting script.");
            return Ok(RunOutcome::Declined);
        }

        self.panel = Some(DisplayPanel::new());
        self.handle_page_loaded(document);

        let result = pager.load_pages(document, |doc| self.handle_page_loaded(doc));
        match result {
            Ok(pages_appended) => Ok(RunOutcome::Completed {
                pages_appended,
                failure: None,
            }),
            Err(e) => {
                error!("Application failed to load pages: {}", e);
                Ok(RunOutcome::Completed {
                    pages_appended: pager.pages_appended(),
                    failure: Some(e),
                })
            }
        }
    }

    fn handle_page_loaded(&mut self, document: &mut ResultsDocument) {
        self.process_sentences(document);
        self.update_display(document);
    }

    /// Highlight every fragment and refresh the buildable list.
    pub fn process_sentences(&mut self, document: &mut ResultsDocument) {
        let set = self.character_set().clone();

        let mut sentences = Vec::new();
        for fragment in document.fragments_mut() {
            self.highlighter.highlight_characters(fragment, &set);
            let sentence = Sentence::parse(fragment);
            if sentence.is_constructible_from(&set) {
                self.highlighter.highlight_sentence(fragment);
            }
            sentences.push(sentence);
        }

        let mut seen = AHashSet::new();
        let buildable: Vec<Sentence> = sentences
            .iter()
            .filter(|s| s.is_constructible_from(&set))
            .filter(|s| seen.insert((*s).clone()))
            .cloned()
            .collect();

        if let Some(panel) = self.panel.as_mut() {
            panel.update_sentence_count(buildable.len());
            panel.update_buildable_sentences(&buildable);
        }
        self.sentences = sentences;
        self.buildable = buildable;
    }

    /// Rewrite the footer range from the row-number cells.
    pub fn update_display(&self, document: &mut ResultsDocument) {
        if let Some((min, max)) = document.row_number_range() {
            if document.footer.is_some() {
                document.footer = Some(format!("Displaying {min} to {max}"));
            }
        }
    }

    /// Re-prompt with the current value. Any non-cancelled answer is saved.
    pub fn edit_characters(&mut self) -> Result<EditOutcome> {
        let current = self.user_characters.clone();
        match self.prompt.ask("Enter your characters:", current.as_deref()) {
            Some(input) => {
                self.store.set(RAW_DATA_KEY, &input)?;
                info!("character data updated ({} chars)", input.chars().count());
                Ok(EditOutcome::Reload)
            }
            None => Ok(EditOutcome::Unchanged),
        }
    }
}
