//! Frontmatter parsing from markdown files.
//!
//! The header is a `---` delimited block of `key: value` lines. This is not
//! YAML: each line is split at its first colon, values are trimmed and lose
//! one layer of surrounding quotes, and the keys in [`LIST_KEYS`] are parsed
//! as comma separated lists (optionally wrapped in brackets).

use crate::models::{MetaValue, Metadata, LIST_KEYS};
use once_cell::sync::Lazy;
use regex::Regex;

static FRONTMATTER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^---\s*\n(.*?)\n---\s*\n(.*)$").unwrap());

/// A document split at its frontmatter delimiters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawDocument<'a> {
    pub frontmatter: &'a str,
    pub body: &'a str,
}

/// Split a document into its frontmatter block and body.
///
/// Returns `None` when the document does not open with a delimited block.
pub fn split_document(content: &str) -> Option<RawDocument<'_>> {
    let captures = FRONTMATTER_RE.captures(content)?;
    Some(RawDocument {
        frontmatter: captures.get(1)?.as_str(),
        body: captures.get(2)?.as_str(),
    })
}

/// Parse frontmatter from markdown content
///
/// Returns a tuple of (metadata, markdown_body). A document without a
/// frontmatter block yields empty metadata and the full content as body.
///
/// # Example
///
/// ```
/// use quire_core::frontmatter::parse_frontmatter;
///
/// let content = "---\ntitle: My Post\ntags: [rust, \"web dev\"]\n---\n# Hello World\n";
///
/// let (meta, body) = parse_frontmatter(content);
/// assert_eq!(meta.get_str("title"), Some("My Post"));
/// assert_eq!(meta.get_list("tags"), vec!["rust", "web dev"]);
/// assert_eq!(body, "# Hello World\n");
/// ```
pub fn parse_frontmatter(content: &str) -> (Metadata, String) {
    let Some(doc) = split_document(content) else {
        return (Metadata::new(), content.to_string());
    };

    let mut metadata = Metadata::new();
    for line in doc.frontmatter.split('\n') {
        let Some((key, raw_value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        metadata.insert(key, parse_value(key, raw_value));
    }

    (metadata, doc.body.to_string())
}

fn parse_value(key: &str, raw_value: &str) -> MetaValue {
    let stripped = strip_quotes(raw_value.trim());

    if !LIST_KEYS.contains(&key) {
        return MetaValue::Scalar(stripped.to_string());
    }

    let list = stripped
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .unwrap_or(stripped);

    MetaValue::List(
        list.split(',')
            .map(|item| strip_quotes(item.trim()))
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect(),
    )
}

/// Remove one layer of matching single or double quotes
fn strip_quotes(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_frontmatter() {
        let content = r#"---
title: Test Post
date: 2025-01-01
excerpt: "A test post"
category: research
---

# Hello World

This is the content."#;

        let (meta, body) = parse_frontmatter(content);
        assert_eq!(meta.get_str("title"), Some("Test Post"));
        assert_eq!(meta.get_str("date"), Some("2025-01-01"));
        assert_eq!(meta.get_str("excerpt"), Some("A test post"));
        assert_eq!(meta.get_str("category"), Some("research"));
        assert!(body.starts_with("# Hello World"));
        assert!(body.contains("This is the content."));
    }

    #[test]
    fn test_parse_no_frontmatter() {
        let content = "# Just Content\n\nNo frontmatter here.";
        let (meta, body) = parse_frontmatter(content);
        assert!(meta.is_empty());
        assert_eq!(body, content);
    }

    #[test]
    fn test_unclosed_block_is_not_frontmatter() {
        let content = "---\ntitle: Dangling\n\nBody without a closing fence.";
        let (meta, body) = parse_frontmatter(content);
        assert!(meta.is_empty());
        assert_eq!(body, content);
    }

    #[test]
    fn test_list_values() {
        let content = "---\ntags: [a, \"b c\", 'd', ]\nrelated: first-post, second-post\n---\nBody";
        let (meta, _) = parse_frontmatter(content);
        assert_eq!(meta.get_list("tags"), vec!["a", "b c", "d"]);
        assert_eq!(meta.get_list("related"), vec!["first-post", "second-post"]);
    }

    #[test]
    fn test_quoted_list_value() {
        let content = "---\ntags: \"[x, y]\"\n---\nBody";
        let (meta, _) = parse_frontmatter(content);
        assert_eq!(meta.get_list("tags"), vec!["x", "y"]);
    }

    #[test]
    fn test_values_keep_later_colons() {
        let content = "---\ntitle: Notes: part two\nsource: https://example.com/a:b\ndate: 2025-01-01 10:30\n---\nBody";
        let (meta, _) = parse_frontmatter(content);
        assert_eq!(meta.get_str("title"), Some("Notes: part two"));
        assert_eq!(meta.get_str("source"), Some("https://example.com/a:b"));
        assert_eq!(meta.get_str("date"), Some("2025-01-01 10:30"));
    }

    #[test]
    fn test_lines_without_colon_and_blank_keys_are_skipped() {
        let content = "---\ntitle: Kept\njust some words\n: orphan value\n---\nBody";
        let (meta, _) = parse_frontmatter(content);
        assert_eq!(meta.len(), 1);
        assert_eq!(meta.get_str("title"), Some("Kept"));
    }

    #[test]
    fn test_unknown_keys_pass_through_as_scalars() {
        let content = "---\nmood: 'cheerful'\nlayout: wide\n---\nBody";
        let (meta, _) = parse_frontmatter(content);
        assert_eq!(meta.get("mood"), Some(&MetaValue::Scalar("cheerful".into())));
        assert_eq!(meta.get_str("layout"), Some("wide"));
    }

    #[test]
    fn test_single_quote_character_is_kept() {
        let content = "---\ntitle: \"\n---\nBody";
        let (meta, _) = parse_frontmatter(content);
        assert_eq!(meta.get_str("title"), Some("\""));
    }

    #[test]
    fn test_split_document() {
        let doc = split_document("---\na: 1\n---\nrest").unwrap();
        assert_eq!(doc.frontmatter, "a: 1");
        assert_eq!(doc.body, "rest");
        assert!(split_document("no header").is_none());
    }
}
