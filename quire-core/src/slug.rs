//! Slug generation for heading anchors and sidenote ids.

use once_cell::sync::Lazy;
use regex::Regex;

pub(crate) static ENTITY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)&(?:[a-z]+|#\d+);").unwrap());
static DISALLOWED_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9\s-]").unwrap());
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static HYPHENS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"-+").unwrap());

/// Convert a string to a URL-safe slug
///
/// Rules:
/// - Lowercase
/// - HTML entities become spaces
/// - Drop everything outside `[a-z0-9]`, whitespace and hyphens
/// - Trim, then turn whitespace runs into a single hyphen
/// - Collapse multiple hyphens
///
/// # Examples
///
/// ```
/// use quire_core::slugify;
///
/// assert_eq!(slugify("Hello World"), "hello-world");
/// assert_eq!(slugify("Rust & Safety"), "rust-safety");
/// assert_eq!(slugify("Q&amp;A"), "q-a");
/// ```
pub fn slugify(input: &str) -> String {
    let lowercased = input.to_lowercase();
    let without_entities = ENTITY_RE.replace_all(&lowercased, " ");
    let cleaned = DISALLOWED_RE.replace_all(&without_entities, "");
    let hyphenated = WHITESPACE_RE.replace_all(cleaned.trim(), "-");
    HYPHENS_RE.replace_all(&hyphenated, "-").into_owned()
}
