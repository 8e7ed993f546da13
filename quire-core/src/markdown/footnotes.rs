//! Footnote extraction and sidenote linking for `[^key]` syntax.
//!
//! Definitions (`[^key]: text`) are pulled out of the markdown source before
//! rendering. The references that remain pass through the parser as plain
//! text and are swapped for numbered sidenote toggles afterwards.

use super::{render_inline, MarkdownRenderer};
use crate::slug::slugify;
use once_cell::sync::Lazy;
use pulldown_cmark::{CowStr, Event, Tag, TagEnd};
use regex::Regex;
use std::collections::HashMap;

static DEFINITION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\[\^([^\]]+)\]:\s*(.*)$").unwrap());
static REFERENCE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[\^([^\]]+)\]").unwrap());

/// Footnote key to markdown body
pub type FootnoteTable = HashMap<String, String>;

/// Result of pulling footnote definitions out of a document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedFootnotes {
    /// Markdown with every definition removed
    pub content: String,
    pub footnotes: FootnoteTable,
}

/// Remove footnote definitions from `markdown`, collecting their bodies.
///
/// A definition continues over blank lines and lines indented by two or more
/// spaces or a tab; the first other line ends it. Later definitions of the
/// same key replace earlier ones.
pub fn extract_footnotes(markdown: &str) -> ExtractedFootnotes {
    let lines: Vec<&str> = markdown.split('\n').collect();
    let mut kept: Vec<&str> = Vec::with_capacity(lines.len());
    let mut footnotes = FootnoteTable::new();

    let mut index = 0;
    while index < lines.len() {
        let line = lines[index];
        index += 1;

        let Some(caps) = DEFINITION_RE.captures(line) else {
            kept.push(line);
            continue;
        };

        let key = caps[1].trim().to_string();
        let mut note_lines = vec![caps[2].to_string()];

        while let Some(next) = lines.get(index) {
            if next.trim().is_empty() {
                note_lines.push(String::new());
            } else if let Some(rest) = strip_continuation_indent(next) {
                note_lines.push(rest.to_string());
            } else {
                break;
            }
            index += 1;
        }

        footnotes.insert(key, note_lines.join("\n").trim().to_string());
    }

    ExtractedFootnotes {
        content: kept.join("\n"),
        footnotes,
    }
}

fn strip_continuation_indent(line: &str) -> Option<&str> {
    let spaces = line.len() - line.trim_start_matches(' ').len();
    if spaces >= 2 {
        Some(&line[spaces..])
    } else {
        line.strip_prefix('\t')
    }
}

/// Transformer replacing `[^key]` references with sidenote toggles
pub struct FootnoteLinker<'r> {
    footnotes: &'r FootnoteTable,
    renderer: &'r dyn MarkdownRenderer,
    toggle_prefix: String,
    numbers: HashMap<String, usize>,
    dangling: Vec<String>,
}

impl<'r> FootnoteLinker<'r> {
    /// `post_id` scopes the toggle ids so several posts can share a page
    pub fn new(footnotes: &'r FootnoteTable, renderer: &'r dyn MarkdownRenderer, post_id: &str) -> Self {
        Self {
            footnotes,
            renderer,
            toggle_prefix: format!("sn-{}", slugify(post_id)),
            numbers: HashMap::new(),
            dangling: Vec::new(),
        }
    }

    /// Transform events, converting known references to sidenote HTML
    pub fn transform<'a>(&mut self, events: Vec<Event<'a>>) -> Vec<Event<'a>> {
        let mut result = Vec::with_capacity(events.len());
        let mut in_code_block = false;

        for event in events {
            match event {
                Event::Start(Tag::CodeBlock(_)) => {
                    in_code_block = true;
                    result.push(event);
                }
                Event::End(TagEnd::CodeBlock) => {
                    in_code_block = false;
                    result.push(event);
                }
                Event::Text(text) if !in_code_block && text.contains("[^") => {
                    self.process_text(text, &mut result);
                }
                other => result.push(other),
            }
        }

        result
    }

    /// Keys referenced in the text that have no footnote body
    pub fn dangling_keys(&self) -> &[String] {
        &self.dangling
    }

    fn process_text<'a>(&mut self, text: CowStr<'a>, out: &mut Vec<Event<'a>>) {
        let footnotes = self.footnotes;
        let mut pieces: Vec<Event<'a>> = Vec::new();
        let mut last = 0;

        for caps in REFERENCE_RE.captures_iter(&text) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            let key = caps[1].trim();

            let Some(note) = footnotes.get(key).filter(|body| !body.is_empty()) else {
                if !self.dangling.iter().any(|k| k == key) {
                    self.dangling.push(key.to_string());
                }
                continue;
            };

            if whole.start() > last {
                pieces.push(Event::Text(text[last..whole.start()].to_string().into()));
            }

            let next = self.numbers.len() + 1;
            let number = *self.numbers.entry(key.to_string()).or_insert(next);
            let note_html = render_inline(self.renderer, note);
            pieces.push(Event::InlineHtml(
                self.sidenote_html(number, &note_html).into(),
            ));

            last = whole.end();
        }

        if pieces.is_empty() {
            out.push(Event::Text(text));
            return;
        }

        if last < text.len() {
            pieces.push(Event::Text(text[last..].to_string().into()));
        }
        out.extend(pieces);
    }

    fn sidenote_html(&self, number: usize, note_html: &str) -> String {
        let toggle_id = format!("{}-{}", self.toggle_prefix, number);
        format!(
            r#"<label for="{id}" class="sidenote-number">{n}</label><input type="checkbox" id="{id}" class="sidenote-toggle"><span class="sidenote"><span class="sidenote-prefix">{n}. </span>{html}</span>"#,
            id = toggle_id,
            n = number,
            html = note_html
        )
    }
}
