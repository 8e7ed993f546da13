//! Plain-text extraction, word counts and reading-time estimates.

use once_cell::sync::Lazy;
use regex::Regex;

/// Default reading speed used for time estimates
pub const DEFAULT_WORDS_PER_MINUTE: u32 = 220;

static FENCED_CODE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)```.*?```").unwrap());
static INLINE_CODE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"`([^`]+)`").unwrap());
static IMAGE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"!\[[^\]]*\]\([^)]*\)").unwrap());
static LINK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[([^\]]+)\]\([^)]*\)").unwrap());
static HEADING_MARKER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^#{1,6}\s+").unwrap());
static MARKUP_CHARS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[>*_~]").unwrap());
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Strip markdown syntax down to a single line of plain text.
///
/// ```
/// use quire_core::metrics::strip_markdown;
///
/// let md = "# Title\n\nSome *emphasis* and a [link](https://example.com).";
/// assert_eq!(strip_markdown(md), "Title Some emphasis and a link.");
/// ```
pub fn strip_markdown(markdown: &str) -> String {
    let text = FENCED_CODE_RE.replace_all(markdown, " ");
    let text = INLINE_CODE_RE.replace_all(&text, "$1");
    let text = IMAGE_RE.replace_all(&text, " ");
    let text = LINK_RE.replace_all(&text, "$1");
    let text = HEADING_MARKER_RE.replace_all(&text, "");
    let text = MARKUP_CHARS_RE.replace_all(&text, "");
    WHITESPACE_RE.replace_all(&text, " ").trim().to_string()
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Estimated minutes to read `plain_text`, never less than one
pub fn reading_time_minutes(plain_text: &str, words_per_minute: u32) -> u32 {
    let wpm = words_per_minute.max(1) as usize;
    let words = word_count(plain_text);
    words.div_ceil(wpm).max(1) as u32
}

/// Truncate to `max_len` characters, appending `...` when text was cut
pub fn truncate_text(text: &str, max_len: usize) -> String {
    match text.char_indices().nth(max_len) {
        None => text.to_string(),
        Some((cut, _)) => format!("{}...", text[..cut].trim_end()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reading_time_boundaries() {
        let words = vec!["word"; 440].join(" ");
        assert_eq!(reading_time_minutes(&words, DEFAULT_WORDS_PER_MINUTE), 2);

        let words = vec!["word"; 441].join(" ");
        assert_eq!(reading_time_minutes(&words, DEFAULT_WORDS_PER_MINUTE), 3);

        assert_eq!(reading_time_minutes("word", DEFAULT_WORDS_PER_MINUTE), 1);
        assert_eq!(reading_time_minutes("", DEFAULT_WORDS_PER_MINUTE), 1);
        assert_eq!(reading_time_minutes("  \n\t ", DEFAULT_WORDS_PER_MINUTE), 1);
    }

    #[test]
    fn test_reading_time_custom_speed() {
        let words = vec!["word"; 300].join(" ");
        assert_eq!(reading_time_minutes(&words, 100), 3);
        assert_eq!(reading_time_minutes(&words, 0), 300);
    }

    #[test]
    fn test_strip_code() {
        let md = "Before\n\n```rust\nfn main() {}\n```\n\nAfter `inline` code";
        assert_eq!(strip_markdown(md), "Before After inline code");
    }

    #[test]
    fn test_strip_images_and_links() {
        let md = "See ![diagram](img/a.png) and [the docs](https://docs.rs) now";
        assert_eq!(strip_markdown(md), "See and the docs now");
    }

    #[test]
    fn test_strip_headings_and_markup() {
        let md = "## Section\n> quoted _text_ with ~~strike~~\n#hashtag stays";
        assert_eq!(strip_markdown(md), "Section quoted text with strike #hashtag stays");
    }

    #[test]
    fn test_word_count() {
        assert_eq!(word_count("one two  three\nfour"), 4);
        assert_eq!(word_count(""), 0);
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("exactly ten", 11), "exactly ten");
        assert_eq!(truncate_text("hello world again", 6), "hello...");
        assert_eq!(truncate_text("héllo wörld", 4), "héll...");
    }
}
