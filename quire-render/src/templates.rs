//! Askama template definitions.

use askama::Template;

/// Site-wide values shared by every page
#[derive(Debug, Clone)]
pub struct SiteMeta {
    pub title: String,
    pub author: String,
    pub description: String,
    pub tagline: String,
    pub has_tagline: bool,
    pub github: String,
    pub has_github: bool,
    pub year: i32,
}

/// A heading in the table of contents
#[derive(Debug, Clone)]
pub struct TocEntry {
    pub level: u8,
    pub id: String,
    pub text: String,
}

/// An entry in the "see also" list
#[derive(Debug, Clone)]
pub struct RelatedEntry {
    pub url: String,
    pub title: String,
    pub excerpt: String,
}

/// A post as it appears in listings
#[derive(Debug, Clone)]
pub struct PostEntry {
    pub url: String,
    pub title: String,
    pub date: String,
    pub month_day: String,
    pub category_label: String,
    pub reading_time: u32,
    pub excerpt: String,
}

/// Posts sharing a category
#[derive(Debug, Clone)]
pub struct CategoryGroup {
    /// Anchor id, e.g. `research`
    pub key: String,
    pub label: String,
    /// Size of the whole group, which may exceed `posts.len()` on the homepage
    pub total: usize,
    pub posts: Vec<PostEntry>,
}

/// Posts published in one year
#[derive(Debug, Clone)]
pub struct YearGroup {
    pub year: String,
    pub posts: Vec<PostEntry>,
}

/// Post page template
#[derive(Template)]
#[template(path = "post.html")]
pub struct PostTemplate {
    pub site: SiteMeta,

    // Page metadata
    pub title: String,
    pub description: String,
    pub canonical_url: String,
    /// Serialized `BlogPosting` structured data, safe to embed in `<script>`
    pub json_ld: String,

    // Meta line
    pub date: String,
    pub category_label: String,
    pub reading_time: u32,
    pub status: String,
    pub has_status: bool,
    pub tags: Vec<String>,

    // Content
    pub toc: Vec<TocEntry>,
    pub content: String,
    pub related: Vec<RelatedEntry>,
}

/// Archive page template, with topic and date views
#[derive(Template)]
#[template(path = "archive.html")]
pub struct ArchiveTemplate {
    pub site: SiteMeta,
    pub canonical_url: String,
    pub topics: Vec<CategoryGroup>,
    pub years: Vec<YearGroup>,
}

/// Homepage template
#[derive(Template)]
#[template(path = "index.html")]
pub struct HomeTemplate {
    pub site: SiteMeta,
    pub canonical_url: String,
    pub groups: Vec<CategoryGroup>,
}

#[derive(Template)]
#[template(path = "sitemap.xml")]
pub struct SitemapTemplate {
    pub urls: Vec<String>,
}
