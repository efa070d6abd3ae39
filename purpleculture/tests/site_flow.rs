// purpleculture/tests/site_flow.rs
//
// End-to-end tests against saved results pages. No network access.
//
// Tests cover:
// - Parsing a saved page and highlighting it with stored characters
// - Appended pages are renumbered after the existing rows
// - Page URLs carry the decoded search term and the next page number
// - A page without a results table stops paging, earlier pages kept
// - Terminal prompt answers are persisted to the store
// - The HTML report carries the highlights
// - A session checks for character data before requesting the first page
// - Editing with a URL saves, then reruns the page with the new characters

use std::cell::RefCell;
use std::time::Duration;

use sentence_highlighter_core::{Delay, MarkupAdapter, PageFetcher, Result, RAW_DATA_KEY};

use purpleculture::{
    render_html, App, CharacterStore, Config, EditOutcome, Error, FileFetcher, LinePrompt,
    MemoryStore, PageAddress, PageState, Pager, PurpleCultureMarkup, RunOutcome, SelectorConfig,
    Session,
};

const PAGE_1: &str = include_str!("fixtures/page1.html");
const PAGE_2: &str = include_str!("fixtures/page2.html");
const NO_TABLE: &str = include_str!("fixtures/no_table.html");

const PAGE_1_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/page1.html");

const URL: &str = "https://www.purpleculture.net/sample_sentences/?word=%E6%88%91";

/// Serves fixture pages by `page=` number and records every request.
struct FixtureFetcher {
    requested: RefCell<Vec<String>>,
}

impl FixtureFetcher {
    fn new() -> Self {
        Self {
            requested: RefCell::new(Vec::new()),
        }
    }
}

impl PageFetcher for FixtureFetcher {
    fn fetch(&self, url: &str) -> Result<String> {
        self.requested.borrow_mut().push(url.to_string());
        let page = if url.ends_with("page=2") { PAGE_2 } else { NO_TABLE };
        Ok(page.to_string())
    }
}

struct NoDelay;

impl Delay for NoDelay {
    fn wait(&self, _interval: Duration) {}
}

fn config(pages: usize) -> Config {
    Config {
        load_pages_count: pages,
        ..Config::default()
    }
}

fn adapter() -> PurpleCultureMarkup {
    PurpleCultureMarkup::new(&SelectorConfig::default()).unwrap()
}

fn silent_prompt() -> LinePrompt<&'static [u8], Vec<u8>> {
    LinePrompt::new(&b""[..], Vec::new())
}

#[test]
fn saved_page_is_highlighted_and_extended() {
    let adapter = adapter();
    let fetcher = FixtureFetcher::new();
    let store = MemoryStore::with_entry(RAW_DATA_KEY, "我你他");
    let config = config(1);

    let mut document = adapter.parse_document(PAGE_1).unwrap();
    let mut pager = Pager::new(
        &fetcher,
        &adapter,
        PageAddress::from_url(config.base_url.clone(), URL),
        PageState::from_url(URL),
        &config,
    )
    .unwrap()
    .with_delay(NoDelay);
    let mut app = App::new(config, &store, silent_prompt()).unwrap();

    let outcome = app.run(&mut document, &mut pager).unwrap();
    assert!(matches!(
        outcome,
        RunOutcome::Completed {
            pages_appended: 1,
            failure: None
        }
    ));

    assert_eq!(
        *fetcher.requested.borrow(),
        vec!["https://www.purpleculture.net/sample_sentences/?word=我&page=2"]
    );

    let ids: Vec<&str> = document.fragments().map(|f| f.id.as_str()).collect();
    assert_eq!(ids, vec!["sen1", "sen2", "sen3", "sen4"]);
    assert_eq!(document.rows[2].element_ids, vec!["ensen3", "ppysen3"]);
    assert_eq!(document.rows[3].click_handlers, vec!["playsen(4);return false;"]);
    assert_eq!(document.footer.as_deref(), Some("Displaying 1 to 4"));

    let buildable: Vec<&str> = app.buildable().iter().map(|s| s.characters.as_str()).collect();
    assert_eq!(buildable, vec!["你我他。", "他我！"]);

    let panel = app.panel().unwrap();
    assert_eq!(panel.info(), "Found (2) sentences");
    assert_eq!(panel.render_text(), "Found (2) sentences\n  你我他。\n  他我！\n");

    // 我爱你: only 爱 is unknown
    let first = document.fragments().next().unwrap();
    assert_eq!(first.background, None);
    let marked: Vec<bool> = first.characters.iter().map(|c| c.background.is_some()).collect();
    assert_eq!(marked, vec![true, false, true]);

    let second = document.fragments().nth(1).unwrap();
    assert_eq!(second.background.as_deref(), Some("#BCB"));
    assert_eq!(app.sentences()[1].phonetic_line(), "nǐ wǒ tā");
}

#[test]
fn page_without_results_stops_paging() {
    let adapter = adapter();
    let fetcher = FixtureFetcher::new();
    let store = MemoryStore::with_entry(RAW_DATA_KEY, "我你他");
    let config = config(3);

    let mut document = adapter.parse_document(PAGE_1).unwrap();
    let mut pager = Pager::new(
        &fetcher,
        &adapter,
        PageAddress::from_url(config.base_url.clone(), URL),
        PageState::from_url(URL),
        &config,
    )
    .unwrap()
    .with_delay(NoDelay);
    let mut app = App::new(config, &store, silent_prompt()).unwrap();

    match app.run(&mut document, &mut pager).unwrap() {
        RunOutcome::Completed {
            pages_appended,
            failure: Some(Error::PageLoad(cause)),
        } => {
            assert_eq!(pages_appended, 1);
            assert!(matches!(*cause, Error::Markup(_)));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }

    // page 3 failed, page 4 was never asked for
    assert_eq!(fetcher.requested.borrow().len(), 2);
    assert_eq!(document.rows.len(), 4);
    assert_eq!(app.buildable().len(), 2);
}

#[test]
fn prompt_answer_is_stored() {
    let adapter = adapter();
    let fetcher = FixtureFetcher::new();
    let store = MemoryStore::new();
    let config = config(0);

    let mut document = adapter.parse_document(PAGE_1).unwrap();
    let mut pager = Pager::new(
        &fetcher,
        &adapter,
        PageAddress::from_url(config.base_url.clone(), URL),
        PageState::from_url(URL),
        &config,
    )
    .unwrap()
    .with_delay(NoDelay);
    let prompt = LinePrompt::new("我\n爱\n你\n\n".as_bytes(), Vec::new());
    let mut app = App::new(config, &store, prompt).unwrap();

    let outcome = app.run(&mut document, &mut pager).unwrap();
    assert!(matches!(outcome, RunOutcome::Completed { pages_appended: 0, .. }));
    assert_eq!(store.get(RAW_DATA_KEY).unwrap().as_deref(), Some("我\n爱\n你"));

    // multi-line input keeps whole lines: 我, 爱, 你 each accepted
    let buildable: Vec<&str> = app.buildable().iter().map(|s| s.characters.as_str()).collect();
    assert_eq!(buildable, vec!["我爱你"]);
    assert!(fetcher.requested.borrow().is_empty());
}

#[test]
fn cancelled_prompt_leaves_page_untouched() {
    let adapter = adapter();
    let fetcher = FixtureFetcher::new();
    let store = MemoryStore::new();
    let config = config(2);

    let mut document = adapter.parse_document(PAGE_1).unwrap();
    let before = document.clone();
    let mut pager = Pager::new(
        &fetcher,
        &adapter,
        PageAddress::from_url(config.base_url.clone(), URL),
        PageState::from_url(URL),
        &config,
    )
    .unwrap()
    .with_delay(NoDelay);
    let mut app = App::new(config, &store, silent_prompt()).unwrap();

    assert!(matches!(app.run(&mut document, &mut pager).unwrap(), RunOutcome::Declined));
    assert_eq!(document, before);
    assert!(app.panel().is_none());
    assert!(fetcher.requested.borrow().is_empty());
}

#[test]
fn report_shows_highlights() {
    let adapter = adapter();
    let fetcher = FixtureFetcher::new();
    let store = MemoryStore::with_entry(RAW_DATA_KEY, "我你他");
    let config = config(0);

    let mut document = adapter.parse_document(PAGE_1).unwrap();
    let mut pager = Pager::new(
        &fetcher,
        &adapter,
        PageAddress::from_url(config.base_url.clone(), URL),
        PageState::from_url(URL),
        &config,
    )
    .unwrap()
    .with_delay(NoDelay);
    let mut app = App::new(config, &store, silent_prompt()).unwrap();
    app.run(&mut document, &mut pager).unwrap();

    let html = render_html(&document, app.panel().unwrap(), "我");
    assert!(html.contains("id=\"sen2\" style=\"background-color:#BCB\""));
    assert!(html.contains("<span class=\"cnchar\">爱</span>"));
    assert!(html.contains("<summary>Found (1) sentences</summary>"));
    assert!(html.contains("Displaying 1 to 2"));
}

fn session<'a>(
    first_page: &'a FixtureFetcher,
    fetcher: &'a FixtureFetcher,
    pages: usize,
) -> Session<&'a FixtureFetcher, &'a FixtureFetcher, NoDelay> {
    Session::new(config(pages), adapter(), first_page, fetcher).with_delay(NoDelay)
}

#[test]
fn session_declines_before_any_request() {
    let first_page = FixtureFetcher::new();
    let fetcher = FixtureFetcher::new();
    let store = MemoryStore::new();

    let report = session(&first_page, &fetcher, 2)
        .run(URL, &store, silent_prompt())
        .unwrap();

    assert!(report.is_none());
    assert!(first_page.requested.borrow().is_empty());
    assert!(fetcher.requested.borrow().is_empty());
    assert_eq!(store.get(RAW_DATA_KEY).unwrap(), None);
}

#[test]
fn session_reads_saved_first_page() {
    let fetcher = FixtureFetcher::new();
    let store = MemoryStore::with_entry(RAW_DATA_KEY, "我你他");

    let report = Session::new(config(1), adapter(), FileFetcher::new(PAGE_1_PATH), &fetcher)
        .with_delay(NoDelay)
        .run(URL, &store, silent_prompt())
        .unwrap()
        .unwrap();

    assert_eq!(report.pages_appended, 1);
    assert!(report.failure.is_none());
    assert_eq!(report.document.rows.len(), 4);
    assert_eq!(report.panel.info(), "Found (2) sentences");
    assert_eq!(fetcher.requested.borrow().len(), 1);
}

#[test]
fn edit_then_rerun_uses_new_characters() {
    let first_page = FixtureFetcher::new();
    let fetcher = FixtureFetcher::new();
    let store = MemoryStore::with_entry(RAW_DATA_KEY, "我");
    let mut out = Vec::new();
    let prompt = LinePrompt::new("我你他\n\n".as_bytes(), &mut out);

    // first page served from page=2 of the fixtures
    let url = "https://www.purpleculture.net/sample_sentences/?word=我&page=2";
    let report = session(&first_page, &fetcher, 0)
        .edit(Some(url), &store, prompt)
        .unwrap();

    assert_eq!(report.outcome, EditOutcome::Reload);
    assert_eq!(store.get(RAW_DATA_KEY).unwrap().as_deref(), Some("我你他"));

    let page = report.reload.unwrap().unwrap();
    let buildable: Vec<&str> = page.buildable.iter().map(|s| s.characters.as_str()).collect();
    assert_eq!(buildable, vec!["他我！"]);
    assert_eq!(*first_page.requested.borrow(), vec![url]);
    assert!(fetcher.requested.borrow().is_empty());

    // asked once, with the old value shown
    let shown = String::from_utf8(out).unwrap();
    assert_eq!(shown.matches("Enter your characters:").count(), 1);
    assert!(!shown.contains("Paste known characters:"));
}

#[test]
fn edit_without_url_only_saves() {
    let first_page = FixtureFetcher::new();
    let fetcher = FixtureFetcher::new();
    let store = MemoryStore::new();
    let prompt = LinePrompt::new("好\n\n".as_bytes(), Vec::new());

    let report = session(&first_page, &fetcher, 1).edit(None, &store, prompt).unwrap();

    assert_eq!(report.outcome, EditOutcome::Reload);
    assert!(report.reload.is_none());
    assert_eq!(store.get(RAW_DATA_KEY).unwrap().as_deref(), Some("好"));
    assert!(first_page.requested.borrow().is_empty());
}
