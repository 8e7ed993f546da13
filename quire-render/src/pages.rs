//! Page assembly: maps the built site onto template contexts and renders them.

use crate::templates::*;
use askama::Template;
use quire_core::date::{format_long, format_month_day, to_iso};
use quire_core::{Config, Post, Site};
use serde_json::json;
use thiserror::Error;

/// Excerpt length in the "see also" section
const RELATED_EXCERPT_LEN: usize = 160;
/// Excerpt length for descriptions and listings
const EXCERPT_LEN: usize = 180;
/// Posts per category on the homepage
const HOME_POSTS_PER_GROUP: usize = 3;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    #[error("Failed to serialize structured data: {0}")]
    Json(#[from] serde_json::Error),
}

/// Site-relative URL of a post page
pub fn post_path(id: &str) -> String {
    format!("/posts/{}/", urlencoding::encode(id))
}

/// Renders every page kind for one site configuration
pub struct PageRenderer {
    meta: SiteMeta,
    origin: String,
    toc_min_headings: usize,
}

impl PageRenderer {
    /// `year` is stamped into page footers
    pub fn new(config: &Config, year: i32) -> Self {
        let site = &config.site;
        Self {
            meta: SiteMeta {
                title: site.title.clone(),
                author: site.author.clone(),
                description: site.description.clone(),
                tagline: site.tagline.clone().unwrap_or_default(),
                has_tagline: site.tagline.as_deref().is_some_and(|t| !t.trim().is_empty()),
                github: site.github.clone().unwrap_or_default(),
                has_github: site.github.as_deref().is_some_and(|g| !g.trim().is_empty()),
                year,
            },
            origin: config.site_origin().to_string(),
            toc_min_headings: config.toc_min_headings,
        }
    }

    fn absolute(&self, path: &str) -> String {
        format!("{}{}", self.origin, path)
    }

    pub fn post(&self, site: &Site, post: &Post) -> Result<String, RenderError> {
        let title = post.title().to_string();
        let description = post.summary(EXCERPT_LEN);
        let canonical_url = self.absolute(&post_path(&post.id));

        let toc = if post.headings.len() >= self.toc_min_headings {
            post.headings
                .iter()
                .map(|h| TocEntry {
                    level: h.level,
                    id: h.id.clone(),
                    text: h.text.clone(),
                })
                .collect()
        } else {
            Vec::new()
        };

        let related = site
            .related_to(post)
            .map(|other| RelatedEntry {
                url: post_path(&other.id),
                title: other.title().to_string(),
                excerpt: other.summary(RELATED_EXCERPT_LEN),
            })
            .collect();

        let template = PostTemplate {
            json_ld: self.blog_posting(post, &title, &description, &canonical_url)?,
            site: self.meta.clone(),
            title,
            description,
            canonical_url,
            date: format_long(post.raw_date()),
            category_label: post.category.label().to_string(),
            reading_time: post.reading_time_minutes,
            status: post.status.clone().unwrap_or_default(),
            has_status: post.status.is_some(),
            tags: post.tags.clone(),
            toc,
            content: post.html.clone(),
            related,
        };
        Ok(template.render()?)
    }

    /// JSON-LD `BlogPosting` for a post, escaped for inline `<script>` use
    fn blog_posting(
        &self,
        post: &Post,
        title: &str,
        description: &str,
        canonical_url: &str,
    ) -> Result<String, RenderError> {
        let author = json!({ "@type": "Person", "name": self.meta.author });
        let mut schema = json!({
            "@context": "https://schema.org",
            "@type": "BlogPosting",
            "headline": title,
            "description": description,
            "author": author,
            "publisher": author,
            "url": canonical_url,
            "mainEntityOfPage": { "@type": "WebPage", "@id": canonical_url },
        });

        if let Some(iso) = to_iso(post.raw_date()) {
            schema["datePublished"] = json!(iso);
            schema["dateModified"] = json!(iso);
        }
        if !post.tags.is_empty() {
            schema["keywords"] = json!(post.tags.join(", "));
        }

        Ok(serde_json::to_string(&schema)?.replace("</", "<\\/"))
    }

    pub fn archive(&self, site: &Site) -> Result<String, RenderError> {
        let template = ArchiveTemplate {
            site: self.meta.clone(),
            canonical_url: self.absolute("/archive/"),
            topics: category_groups(site, usize::MAX),
            years: site
                .by_year()
                .into_iter()
                .map(|(year, posts)| YearGroup {
                    year,
                    posts: posts.into_iter().map(post_entry).collect(),
                })
                .collect(),
        };
        Ok(template.render()?)
    }

    pub fn home(&self, site: &Site) -> Result<String, RenderError> {
        let template = HomeTemplate {
            site: self.meta.clone(),
            canonical_url: self.absolute("/"),
            groups: category_groups(site, HOME_POSTS_PER_GROUP),
        };
        Ok(template.render()?)
    }

    pub fn sitemap(&self, site: &Site) -> Result<String, RenderError> {
        let mut urls = vec![
            self.absolute("/"),
            self.absolute("/index.html"),
            self.absolute("/archive/"),
        ];
        urls.extend(site.posts.iter().map(|post| self.absolute(&post_path(&post.id))));

        Ok(SitemapTemplate { urls }.render()?)
    }
}

fn category_groups(site: &Site, limit: usize) -> Vec<CategoryGroup> {
    site.by_category()
        .into_iter()
        .map(|(category, posts)| CategoryGroup {
            key: category.as_str().to_string(),
            label: category.label().to_string(),
            total: posts.len(),
            posts: posts.into_iter().take(limit).map(post_entry).collect(),
        })
        .collect()
}

fn post_entry(post: &Post) -> PostEntry {
    PostEntry {
        url: post_path(&post.id),
        title: post.title().to_string(),
        date: format_long(post.raw_date()),
        month_day: format_month_day(post.raw_date()),
        category_label: post.category.label().to_string(),
        reading_time: post.reading_time_minutes,
        excerpt: post.summary(EXCERPT_LEN),
    }
}
