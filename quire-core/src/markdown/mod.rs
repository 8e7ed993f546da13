//! Markdown processing pipeline with footnote and heading post-processing.

pub mod footnotes;
pub mod headings;

use crate::models::Heading;
use pulldown_cmark::{html, Event, Options, Parser, Tag, TagEnd, TextMergeStream};

pub use footnotes::{extract_footnotes, ExtractedFootnotes, FootnoteLinker, FootnoteTable};
pub use headings::HeadingIndexer;

/// Anything that can turn markdown into HTML
pub trait MarkdownRenderer {
    /// Render a full document
    fn parse(&self, markdown: &str) -> String;

    /// Render a span without block wrappers, if supported
    fn parse_inline(&self, _markdown: &str) -> Option<String> {
        None
    }
}

/// Render `markdown` as inline HTML.
///
/// Falls back to block rendering with the outer paragraph removed when the
/// renderer has no inline mode.
pub fn render_inline(renderer: &dyn MarkdownRenderer, markdown: &str) -> String {
    if let Some(html) = renderer.parse_inline(markdown) {
        return html;
    }

    let rendered = renderer.parse(markdown);
    let trimmed = rendered.trim();
    let trimmed = trimmed.strip_prefix("<p>").unwrap_or(trimmed);
    trimmed.strip_suffix("</p>").unwrap_or(trimmed).to_string()
}

/// Output of [`MarkdownProcessor::convert`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedBody {
    pub html: String,
    pub headings: Vec<Heading>,
    /// Footnote keys referenced in the text without a definition
    pub dangling_footnotes: Vec<String>,
}

/// Markdown processor backed by pulldown-cmark
pub struct MarkdownProcessor {
    options: Options,
}

impl MarkdownProcessor {
    pub fn new() -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);
        options.insert(Options::ENABLE_HEADING_ATTRIBUTES);
        // Footnotes stay disabled: `[^key]` must reach the linker as text.

        Self { options }
    }

    fn events<'a>(&self, markdown: &'a str) -> Vec<Event<'a>> {
        TextMergeStream::new(Parser::new_ext(markdown, self.options)).collect()
    }

    /// Convert a footnote-free markdown body to HTML
    ///
    /// References to keys in `footnotes` become sidenotes scoped by
    /// `post_id`; `h2`/`h3` headings receive unique ids.
    pub fn convert(&self, markdown: &str, footnotes: &FootnoteTable, post_id: &str) -> RenderedBody {
        let events = self.events(markdown);

        let mut linker = FootnoteLinker::new(footnotes, self, post_id);
        let events = linker.transform(events);
        let dangling_footnotes = linker.dangling_keys().to_vec();

        let mut indexer = HeadingIndexer::new();
        let events = indexer.transform(events);

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());

        RenderedBody {
            html: html_output,
            headings: indexer.into_headings(),
            dangling_footnotes,
        }
    }
}

impl MarkdownRenderer for MarkdownProcessor {
    fn parse(&self, markdown: &str) -> String {
        let mut html_output = String::new();
        html::push_html(&mut html_output, self.events(markdown).into_iter());
        html_output
    }

    fn parse_inline(&self, markdown: &str) -> Option<String> {
        let events = self.events(markdown).into_iter().filter_map(|event| match event {
            Event::Start(Tag::Paragraph) => None,
            Event::End(TagEnd::Paragraph) => Some(Event::SoftBreak),
            other => Some(other),
        });

        let mut html_output = String::new();
        html::push_html(&mut html_output, events);
        Some(html_output.trim().to_string())
    }
}

impl Default for MarkdownProcessor {
    fn default() -> Self {
        Self::new()
    }
}
