//! Reads purpleculture.net results pages into the structural model.
//!
//! Conventions:
//! - only the configured selectors are used; no full-document regexes
//! - text is trimmed; missing optional parts (footer, row number) are `None`
//! - a page without a results table is an error, an empty table is not

use scraper::{ElementRef, Html, Selector};

use sentence_highlighter_core::{
    CharacterElement, Error, MarkupAdapter, ResultRow, ResultsDocument, Result, SentenceFragment,
};

use crate::config::SelectorConfig;

fn compile(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| Error::Config(format!("invalid selector '{css}': {e:?}")))
}

fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>()
}

/// `MarkupAdapter` for the sample-sentences results page.
#[derive(Debug, Clone)]
pub struct PurpleCultureMarkup {
    results_table: Selector,
    row: Selector,
    sentence: Selector,
    character: Selector,
    block: Selector,
    phonetic: Selector,
    row_number: Selector,
    footer: Selector,
    with_id: Selector,
    with_click: Selector,
}

impl PurpleCultureMarkup {
    pub fn new(selectors: &SelectorConfig) -> Result<Self> {
        Ok(Self {
            results_table: compile(&selectors.results_table)?,
            row: compile(&selectors.row)?,
            sentence: compile(&selectors.sentence)?,
            character: compile(&selectors.character)?,
            block: compile(&selectors.block)?,
            phonetic: compile(&selectors.phonetic)?,
            row_number: compile(&selectors.row_number)?,
            footer: compile(&selectors.footer)?,
            with_id: compile("[id]")?,
            with_click: compile("[onclick]")?,
        })
    }

    fn parse_fragment(&self, element: ElementRef<'_>) -> SentenceFragment {
        let characters = element
            .select(&self.character)
            .map(|c| CharacterElement::new(text_of(c).trim()))
            .collect();
        let blocks = element
            .select(&self.block)
            .map(|block| {
                block
                    .select(&self.phonetic)
                    .map(|p| text_of(p).trim().to_string())
                    .collect()
            })
            .collect();

        SentenceFragment {
            id: element.value().attr("id").unwrap_or_default().to_string(),
            characters,
            blocks,
            background: None,
        }
    }

    fn parse_row(&self, row: ElementRef<'_>) -> ResultRow {
        let fragments: Vec<ElementRef<'_>> = row.select(&self.sentence).collect();
        let element_ids = row
            .select(&self.with_id)
            .filter(|el| !fragments.iter().any(|f| f.id() == el.id()))
            .filter_map(|el| el.value().attr("id"))
            .map(str::to_string)
            .collect();
        let click_handlers = row
            .select(&self.with_click)
            .filter_map(|el| el.value().attr("onclick"))
            .map(str::to_string)
            .collect();
        let row_number = row
            .select(&self.row_number)
            .next()
            .map(|cell| text_of(cell).trim().to_string());

        ResultRow {
            element_ids,
            click_handlers,
            row_number,
            sentences: fragments.into_iter().map(|f| self.parse_fragment(f)).collect(),
        }
    }
}

impl MarkupAdapter for PurpleCultureMarkup {
    fn parse_document(&self, markup: &str) -> Result<ResultsDocument> {
        let html = Html::parse_document(markup);
        let table = html
            .select(&self.results_table)
            .next()
            .ok_or_else(|| Error::Markup("results table not found".into()))?;

        let rows = table.select(&self.row).map(|row| self.parse_row(row)).collect();
        let footer = html
            .select(&self.footer)
            .next()
            .map(|el| text_of(el).trim().to_string());

        Ok(ResultsDocument { rows, footer })
    }
}
