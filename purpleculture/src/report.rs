//! Standalone HTML view of a highlighted results document.
//!
//! Highlights are written as inline `background-color` styles. The panel is
//! a fixed-position `<details>` element so it can be collapsed.

use std::fmt::Write as _;

use sentence_highlighter_core::{DisplayPanel, ResultsDocument, SentenceFragment};

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn style(background: Option<&str>) -> String {
    match background {
        Some(color) => format!(" style=\"background-color:{}\"", escape(color)),
        None => String::new(),
    }
}

fn render_fragment(out: &mut String, fragment: &SentenceFragment) {
    let _ = write!(
        out,
        "<div class=\"sentence\" id=\"{}\"{}>",
        escape(&fragment.id),
        style(fragment.background.as_deref())
    );
    for character in &fragment.characters {
        let _ = write!(
            out,
            "<span class=\"cnchar\"{}>{}</span>",
            style(character.background.as_deref()),
            escape(character.glyph())
        );
    }
    let phonetics: Vec<&str> = fragment.blocks.iter().flatten().map(String::as_str).collect();
    if !phonetics.is_empty() {
        let _ = write!(out, "<div class=\"pinyin\">{}</div>", escape(&phonetics.join(" ")));
    }
    out.push_str("</div>");
}

fn render_panel(out: &mut String, panel: &DisplayPanel) {
    out.push_str(
        "<details id=\"panel\" style=\"position:fixed;top:10px;right:10px;z-index:9999;\
         padding:1rem;background:#fff;border:1px solid #ccc;max-height:70vh;\
         overflow-y:auto;width:300px;box-shadow:0 2px 4px rgba(0,0,0,0.1)\"",
    );
    if !panel.is_collapsed() {
        out.push_str(" open");
    }
    let _ = write!(out, "><summary>{}</summary>", escape(panel.info()));
    out.push_str("<ul style=\"list-style:none;padding:0\">");
    for line in panel.list_lines() {
        let _ = write!(
            out,
            "<li style=\"margin-bottom:8px;padding:4px;border-bottom:1px solid #eee\">{}</li>",
            escape(line)
        );
    }
    out.push_str("</ul></details>");
}

/// Render the document and panel as a complete HTML page.
pub fn render_html(document: &ResultsDocument, panel: &DisplayPanel, title: &str) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>{}</title></head><body>",
        escape(title)
    );
    render_panel(&mut out, panel);

    out.push_str("<table class=\"table\"><tbody>");
    for row in &document.rows {
        out.push_str("<tr>");
        let _ = write!(
            out,
            "<td class=\"row-number\">{}</td><td>",
            escape(row.row_number.as_deref().unwrap_or(""))
        );
        for fragment in &row.sentences {
            render_fragment(&mut out, fragment);
        }
        out.push_str("</td></tr>");
    }
    out.push_str("</tbody></table>");

    if let Some(footer) = &document.footer {
        let _ = write!(out, "<div class=\"footer\">{}</div>", escape(footer));
    }
    out.push_str("</body></html>\n");
    out
}
