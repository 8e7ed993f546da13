//! Heading id assignment and table-of-contents collection.

use crate::models::Heading;
use crate::slug::{slugify, ENTITY_RE};
use once_cell::sync::Lazy;
use pulldown_cmark::{CowStr, Event, HeadingLevel, Tag, TagEnd};
use regex::{Captures, Regex};
use std::collections::{HashMap, HashSet};

static RAW_HEADING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<h2([^>]*)>(.*?)</h2>|<h3([^>]*)>(.*?)</h3>").unwrap());
static ID_ATTR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"\sid="([^"]*)""#).unwrap());
static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());

/// Assigns unique ids to `h2`/`h3` headings and records them in order
///
/// Both markdown headings and headings written as raw HTML blocks are
/// indexed, sharing one id namespace.
#[derive(Debug, Default)]
pub struct HeadingIndexer {
    headings: Vec<Heading>,
    base_counts: HashMap<String, usize>,
    used: HashSet<String>,
}

struct PendingHeading<'a> {
    level: HeadingLevel,
    id: Option<CowStr<'a>>,
    classes: Vec<CowStr<'a>>,
    attrs: Vec<(CowStr<'a>, Option<CowStr<'a>>)>,
    inner: Vec<Event<'a>>,
    text: String,
}

impl HeadingIndexer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rewrite heading start tags with their final ids
    pub fn transform<'a>(&mut self, events: Vec<Event<'a>>) -> Vec<Event<'a>> {
        let mut result = Vec::with_capacity(events.len());
        let mut pending: Option<PendingHeading<'a>> = None;
        let mut html_block: Option<String> = None;

        for event in events {
            if let Some(block) = html_block.as_mut() {
                match event {
                    Event::End(TagEnd::HtmlBlock) => {
                        if let Some(raw) = html_block.take() {
                            result.push(Event::Html(CowStr::from(self.index_raw(&raw))));
                        }
                        result.push(Event::End(TagEnd::HtmlBlock));
                    }
                    Event::Html(t) | Event::Text(t) => block.push_str(&t),
                    other => result.push(other),
                }
                continue;
            }

            let Some(heading) = pending.as_mut() else {
                match event {
                    Event::Start(Tag::Heading {
                        level,
                        id,
                        classes,
                        attrs,
                    }) if is_indexed(level) => {
                        pending = Some(PendingHeading {
                            level,
                            id,
                            classes,
                            attrs,
                            inner: Vec::new(),
                            text: String::new(),
                        });
                    }
                    Event::Start(Tag::HtmlBlock) => {
                        html_block = Some(String::new());
                        result.push(Event::Start(Tag::HtmlBlock));
                    }
                    other => result.push(other),
                }
                continue;
            };

            match event {
                Event::End(TagEnd::Heading(level)) => {
                    if let Some(done) = pending.take() {
                        self.finish(done, &mut result);
                    }
                    result.push(Event::End(TagEnd::Heading(level)));
                }
                other => {
                    match &other {
                        Event::Text(t) | Event::Code(t) => heading.text.push_str(t),
                        Event::SoftBreak | Event::HardBreak => heading.text.push(' '),
                        _ => {}
                    }
                    heading.inner.push(other);
                }
            }
        }

        result
    }

    pub fn into_headings(self) -> Vec<Heading> {
        self.headings
    }

    fn finish<'a>(&mut self, heading: PendingHeading<'a>, out: &mut Vec<Event<'a>>) {
        let PendingHeading {
            level,
            id,
            classes,
            attrs,
            inner,
            text,
        } = heading;

        // Work from the text as it appears in the written HTML, so escaped
        // characters separate words in the slug.
        let text = display_text(&html_escape(&text));
        let id = if text.is_empty() {
            id
        } else {
            let explicit = id.filter(|existing| !existing.is_empty()).map(|s| s.to_string());
            Some(CowStr::from(self.assign(level as u8, text, explicit)))
        };

        out.push(Event::Start(Tag::Heading {
            level,
            id,
            classes,
            attrs,
        }));
        out.extend(inner);
    }

    /// Index `<h2>`/`<h3>` elements in a raw HTML block, setting their ids
    fn index_raw(&mut self, html: &str) -> String {
        RAW_HEADING_RE
            .replace_all(html, |caps: &Captures| {
                let (level, attrs, inner) = match (caps.get(1), caps.get(2)) {
                    (Some(attrs), Some(inner)) => (2, attrs.as_str(), inner.as_str()),
                    _ => (
                        3,
                        caps.get(3).map_or("", |m| m.as_str()),
                        caps.get(4).map_or("", |m| m.as_str()),
                    ),
                };

                let text = display_text(&TAG_RE.replace_all(inner, ""));
                if text.is_empty() {
                    return caps[0].to_string();
                }

                let explicit = ID_ATTR_RE
                    .captures(attrs)
                    .map(|c| c[1].to_string())
                    .filter(|existing| !existing.is_empty());
                let id = self.assign(level, text, explicit);
                let attrs = ID_ATTR_RE.replace(attrs, "");
                format!(r#"<h{level}{attrs} id="{id}">{inner}</h{level}>"#)
            })
            .into_owned()
    }

    /// Pick the heading's id and add it to the outline
    fn assign(&mut self, level: u8, text: String, explicit: Option<String>) -> String {
        let mut base = explicit.unwrap_or_else(|| slugify(&text));
        if base.is_empty() {
            base = format!("section-{}", self.headings.len() + 1);
        }
        let unique = self.claim(&base);
        self.headings.push(Heading {
            level,
            text,
            id: unique.clone(),
        });
        unique
    }

    /// Reserve an id derived from `base`, suffixing `-2`, `-3`, ... on collision
    fn claim(&mut self, base: &str) -> String {
        let count = self.base_counts.entry(base.to_string()).or_insert(0);
        *count += 1;

        let mut candidate = if *count == 1 {
            base.to_string()
        } else {
            format!("{}-{}", base, count)
        };
        while self.used.contains(&candidate) {
            *count += 1;
            candidate = format!("{}-{}", base, count);
        }

        self.used.insert(candidate.clone());
        candidate
    }
}

fn is_indexed(level: HeadingLevel) -> bool {
    matches!(level, HeadingLevel::H2 | HeadingLevel::H3)
}

/// Entities become spaces, whitespace runs collapse
fn display_text(html: &str) -> String {
    ENTITY_RE
        .replace_all(html, " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulldown_cmark::{html, Options, Parser};

    fn index(markdown: &str) -> (String, Vec<Heading>) {
        let events: Vec<Event> =
            Parser::new_ext(markdown, Options::ENABLE_HEADING_ATTRIBUTES).collect();
        let mut indexer = HeadingIndexer::new();
        let events = indexer.transform(events);
        let mut out = String::new();
        html::push_html(&mut out, events.into_iter());
        (out, indexer.into_headings())
    }

    fn ids(headings: &[Heading]) -> Vec<&str> {
        headings.iter().map(|h| h.id.as_str()).collect()
    }

    #[test]
    fn test_duplicate_headings_get_suffixes() {
        let (html, headings) = index("## Setup\n\ntext\n\n## Setup\n\n### Setup\n");
        assert_eq!(ids(&headings), vec!["setup", "setup-2", "setup-3"]);
        assert!(html.contains(r#"<h2 id="setup">Setup</h2>"#));
        assert!(html.contains(r#"<h2 id="setup-2">Setup</h2>"#));
    }

    #[test]
    fn test_suffix_skips_taken_ids() {
        let (_, headings) = index("## Setup 2\n\n## Setup\n\n## Setup\n");
        assert_eq!(ids(&headings), vec!["setup-2", "setup", "setup-3"]);
    }

    #[test]
    fn test_only_levels_two_and_three() {
        let (html, headings) = index("# Title\n\n## Part\n\n#### Deep\n");
        assert_eq!(headings.len(), 1);
        assert_eq!(headings[0].level, 2);
        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains("<h4>Deep</h4>"));
    }

    #[test]
    fn test_display_text_strips_markup() {
        let (_, headings) = index("## Using `serde` with *care*\n\n### Q&amp;A\n");
        assert_eq!(headings[0].text, "Using serde with care");
        assert_eq!(headings[0].id, "using-serde-with-care");
        assert_eq!(headings[1].text, "Q A");
        assert_eq!(headings[1].id, "q-a");
        assert_eq!(headings[1].level, 3);
    }

    #[test]
    fn test_escaped_characters_split_slug_words() {
        let (html, headings) = index("## What's New\n\n## Q&A\n\n## Say \"hi\"\n");
        assert_eq!(ids(&headings), vec!["what-s-new", "q-a", "say-hi"]);
        assert_eq!(headings[0].text, "What s New");
        assert!(html.contains(r#"<h2 id="what-s-new">What's New</h2>"#));
        assert!(html.contains(r#"<h2 id="q-a">Q&amp;A</h2>"#));
    }

    #[test]
    fn test_explicit_id_wins() {
        let (html, headings) = index("## Getting Started {#start}\n\n## Start\n");
        assert_eq!(ids(&headings), vec!["start", "start-2"]);
        assert!(html.contains(r#"<h2 id="start">Getting Started</h2>"#));
    }

    #[test]
    fn test_fallback_section_id() {
        let (_, headings) = index("## Intro\n\n## ???\n");
        assert_eq!(ids(&headings), vec!["intro", "section-2"]);
        assert_eq!(headings[1].text, "???");
    }

    #[test]
    fn test_headings_without_text_are_untouched() {
        let (html, headings) = index("## <span></span>\n\n## Real\n");
        assert_eq!(ids(&headings), vec!["real"]);
        assert!(html.contains("<h2><span></span></h2>"));
    }

    #[test]
    fn test_raw_html_heading_reserves_its_id() {
        let (html, headings) = index("<h2 id=\"custom\">Raw</h2>\n\n## Custom\n");
        assert_eq!(ids(&headings), vec!["custom", "custom-2"]);
        assert_eq!(headings[0].text, "Raw");
        assert!(html.contains(r#"<h2 id="custom">Raw</h2>"#));
        assert!(html.contains(r#"<h2 id="custom-2">Custom</h2>"#));
    }

    #[test]
    fn test_raw_html_heading_gets_slug_id() {
        let (html, headings) =
            index("## Intro\n\n<h3 class=\"note\">No <em>Id</em></h3>\n\n<h2></h2>\n\n<h4>Skip</h4>\n");
        assert_eq!(ids(&headings), vec!["intro", "no-id"]);
        assert_eq!(headings[1].level, 3);
        assert_eq!(headings[1].text, "No Id");
        assert!(html.contains(r#"<h3 class="note" id="no-id">No <em>Id</em></h3>"#));
        assert!(html.contains("<h2></h2>"));
        assert!(html.contains("<h4>Skip</h4>"));
    }
}
