//! Content model structs for posts, metadata, and headings.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::metrics::truncate_text;

/// Frontmatter keys whose values are parsed as lists
pub const LIST_KEYS: &[&str] = &["tags", "related"];

/// A single frontmatter value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetaValue {
    Scalar(String),
    List(Vec<String>),
}

impl MetaValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetaValue::Scalar(s) => Some(s),
            MetaValue::List(_) => None,
        }
    }

    /// View the value as a list; scalars are split on commas
    pub fn to_list(&self) -> Vec<String> {
        match self {
            MetaValue::Scalar(s) => s.split(',').map(|item| item.to_string()).collect(),
            MetaValue::List(items) => items.clone(),
        }
    }
}

/// Frontmatter metadata, in the order keys first appeared
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    entries: Vec<(String, MetaValue)>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value; a repeated key overwrites the earlier value in place
    pub fn insert(&mut self, key: impl Into<String>, value: MetaValue) {
        let key = key.into();
        if let Some(slot) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.entries.push((key, value));
        }
    }

    pub fn get(&self, key: &str) -> Option<&MetaValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Scalar value for `key`, treating blank strings as absent
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key)
            .and_then(MetaValue::as_str)
            .filter(|s| !s.trim().is_empty())
    }

    pub fn get_list(&self, key: &str) -> Vec<String> {
        self.get(key).map(MetaValue::to_list).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetaValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Post category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Research,
    Technical,
    Personal,
    Uncategorized,
}

impl Category {
    /// Display order for grouped listings
    pub const ORDER: [Category; 4] = [
        Category::Research,
        Category::Technical,
        Category::Personal,
        Category::Uncategorized,
    ];

    /// Normalize a raw frontmatter value; anything unrecognized is `Uncategorized`
    pub fn normalize(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_lowercase()).as_deref() {
            Some("research") => Category::Research,
            Some("technical") => Category::Technical,
            Some("personal") => Category::Personal,
            _ => Category::Uncategorized,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Research => "research",
            Category::Technical => "technical",
            Category::Personal => "personal",
            Category::Uncategorized => "uncategorized",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Uncategorized => "other",
            other => other.as_str(),
        }
    }
}

/// A heading collected for the table of contents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    pub level: u8,
    pub text: String,
    pub id: String,
}

/// A processed post
#[derive(Debug, Clone)]
pub struct Post {
    /// File name without the `.md` extension
    pub id: String,

    /// Parsed frontmatter
    pub metadata: Metadata,

    /// Markdown body with footnote definitions removed
    pub content: String,

    /// Plain text derived from `content`
    pub plain: String,

    /// Rendered body HTML
    pub html: String,

    pub headings: Vec<Heading>,
    pub category: Category,

    /// Lowercased, deduplicated tags
    pub tags: Vec<String>,

    pub status: Option<String>,

    /// Ids from the `related` key, deduplicated
    pub related_ids: Vec<String>,

    pub reading_time_minutes: u32,

    /// Parsed `date` value
    pub date: Option<NaiveDateTime>,

    /// Indices into the sorted corpus, filled by the corpus-wide pass
    pub related: Vec<usize>,
}

impl Post {
    /// Display title, falling back to the id
    pub fn title(&self) -> &str {
        self.metadata.get_str("title").unwrap_or(self.id.as_str())
    }

    /// Raw `date` value as written in frontmatter
    pub fn raw_date(&self) -> &str {
        self.metadata.get_str("date").unwrap_or("")
    }

    /// Frontmatter excerpt or the plain text, truncated to `max_len` characters
    pub fn summary(&self, max_len: usize) -> String {
        let source = self.metadata.get_str("excerpt").unwrap_or(self.plain.as_str());
        truncate_text(source, max_len)
    }
}

/// The processed corpus, sorted newest first
#[derive(Debug, Clone, Default)]
pub struct Site {
    pub posts: Vec<Post>,
}

impl Site {
    /// Non-empty category groups in display order, each in corpus order
    pub fn by_category(&self) -> Vec<(Category, Vec<&Post>)> {
        Category::ORDER
            .iter()
            .map(|&category| {
                let posts: Vec<&Post> = self
                    .posts
                    .iter()
                    .filter(|post| post.category == category)
                    .collect();
                (category, posts)
            })
            .filter(|(_, posts)| !posts.is_empty())
            .collect()
    }

    /// Posts grouped by year label, keeping corpus order
    pub fn by_year(&self) -> Vec<(String, Vec<&Post>)> {
        let mut groups: Vec<(String, Vec<&Post>)> = Vec::new();
        for post in &self.posts {
            let year = crate::date::format_year(post.raw_date());
            match groups.iter_mut().find(|(label, _)| *label == year) {
                Some((_, posts)) => posts.push(post),
                None => groups.push((year, vec![post])),
            }
        }
        groups
    }

    /// Posts that `post` links to in its "see also" section
    pub fn related_to<'a>(&'a self, post: &'a Post) -> impl Iterator<Item = &'a Post> + 'a {
        post.related.iter().filter_map(|&idx| self.posts.get(idx))
    }
}

/// Lowercase, trim and deduplicate tags, keeping first occurrences
pub fn normalize_tags(raw: &[String]) -> Vec<String> {
    dedupe(raw.iter().map(|tag| tag.trim().to_lowercase()))
}

/// Trim and deduplicate related ids, keeping first occurrences
pub fn normalize_related(raw: &[String]) -> Vec<String> {
    dedupe(raw.iter().map(|id| id.trim().to_string()))
}

/// Lowercase a status value; blank means no status
pub fn normalize_status(raw: Option<&str>) -> Option<String> {
    raw.map(|s| s.trim().to_lowercase()).filter(|s| !s.is_empty())
}

fn dedupe(values: impl Iterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for value in values {
        if !value.is_empty() && !out.contains(&value) {
            out.push(value);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_normalization() {
        assert_eq!(Category::normalize(Some("research")), Category::Research);
        assert_eq!(Category::normalize(Some(" Technical ")), Category::Technical);
        assert_eq!(Category::normalize(Some("recipes")), Category::Uncategorized);
        assert_eq!(Category::normalize(None), Category::Uncategorized);
        assert_eq!(Category::Uncategorized.label(), "other");
        assert_eq!(Category::Personal.label(), "personal");
    }

    #[test]
    fn test_metadata_overwrites_in_place() {
        let mut meta = Metadata::new();
        meta.insert("title", MetaValue::Scalar("First".into()));
        meta.insert("date", MetaValue::Scalar("2025-01-01".into()));
        meta.insert("title", MetaValue::Scalar("Second".into()));

        assert_eq!(meta.len(), 2);
        assert_eq!(meta.get_str("title"), Some("Second"));
        let keys: Vec<_> = meta.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["title", "date"]);
    }

    #[test]
    fn test_scalar_list_fallback() {
        let value = MetaValue::Scalar("a, b".into());
        assert_eq!(value.to_list(), vec!["a", " b"]);
        assert_eq!(normalize_tags(&value.to_list()), vec!["a", "b"]);
    }

    #[test]
    fn test_normalize_tags() {
        let raw = vec![
            "Rust".to_string(),
            "rust".to_string(),
            " ML ".to_string(),
            "".to_string(),
        ];
        assert_eq!(normalize_tags(&raw), vec!["rust", "ml"]);
    }

    #[test]
    fn test_normalize_related_keeps_case() {
        let raw = vec!["Intro-Post".to_string(), "intro-post".to_string(), "Intro-Post".to_string()];
        assert_eq!(normalize_related(&raw), vec!["Intro-Post", "intro-post"]);
    }

    #[test]
    fn test_normalize_status() {
        assert_eq!(normalize_status(Some(" Draft ")), Some("draft".to_string()));
        assert_eq!(normalize_status(Some("  ")), None);
        assert_eq!(normalize_status(None), None);
    }
}
