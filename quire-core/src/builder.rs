//! Site building logic - reads the post index and runs every post through the pipeline.

use crate::{
    config::Config,
    date::parse_date,
    frontmatter::parse_frontmatter,
    markdown::{extract_footnotes, MarkdownProcessor},
    metrics::{reading_time_minutes, strip_markdown},
    models::*,
    related::{resolve_related, sort_posts},
};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid post index {path:?}: {source}")]
    Index {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Config error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

/// Main site builder
pub struct SiteBuilder {
    config: Config,
    processor: MarkdownProcessor,
}

impl SiteBuilder {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            processor: MarkdownProcessor::new(),
        }
    }

    /// Build the sorted corpus with related posts resolved
    pub fn build(&self) -> Result<Site, BuildError> {
        let files = self.read_index()?;
        tracing::info!("Found {} posts in index", files.len());

        let posts_dir = self.config.posts_dir();
        let mut posts = Vec::with_capacity(files.len());
        for file_name in &files {
            let path = posts_dir.join(file_name);
            let raw = read_file(&path)?;
            posts.push(self.process_post(post_id(file_name), &raw));
        }

        sort_posts(&mut posts);
        resolve_related(&mut posts, self.config.related_posts);

        tracing::info!("Built site index with {} posts", posts.len());
        Ok(Site { posts })
    }

    /// File names listed in the JSON index, relative to the posts directory
    fn read_index(&self) -> Result<Vec<String>, BuildError> {
        let path = self.config.index_path();
        let raw = read_file(&path)?;
        serde_json::from_str(&raw).map_err(|source| BuildError::Index { path, source })
    }

    /// Run one document through frontmatter, footnotes, rendering and metrics
    pub fn process_post(&self, id: String, raw: &str) -> Post {
        let (metadata, body) = parse_frontmatter(raw);
        let extracted = extract_footnotes(&body);
        let rendered = self
            .processor
            .convert(&extracted.content, &extracted.footnotes, &id);

        for key in &rendered.dangling_footnotes {
            tracing::warn!("{}: footnote [^{}] has no definition", id, key);
        }

        let plain = strip_markdown(&extracted.content);
        let reading_time = reading_time_minutes(&plain, self.config.words_per_minute);

        let raw_category = metadata.get_str("category");
        let category = Category::normalize(raw_category);
        if let Some(raw) = raw_category {
            if category == Category::Uncategorized && !raw.trim().eq_ignore_ascii_case("uncategorized") {
                tracing::warn!("{}: unknown category '{}'", id, raw.trim());
            }
        }

        let date = metadata.get_str("date").and_then(parse_date);
        if date.is_none() {
            tracing::debug!("{}: missing or unparseable date", id);
        }

        tracing::debug!(
            "Processed {} ({} headings, {} min read)",
            id,
            rendered.headings.len(),
            reading_time
        );

        Post {
            tags: normalize_tags(&metadata.get_list("tags")),
            related_ids: normalize_related(&metadata.get_list("related")),
            status: normalize_status(metadata.get_str("status")),
            category,
            date,
            reading_time_minutes: reading_time,
            html: rendered.html,
            headings: rendered.headings,
            content: extracted.content,
            plain,
            metadata,
            related: Vec::new(),
            id,
        }
    }
}

/// Post id for an index entry: the file name without its `.md` extension
pub fn post_id(file_name: &str) -> String {
    file_name.strip_suffix(".md").unwrap_or(file_name).to_string()
}

fn read_file(path: &Path) -> Result<String, BuildError> {
    fs::read_to_string(path).map_err(|source| BuildError::Io {
        path: path.to_path_buf(),
        source,
    })
}
