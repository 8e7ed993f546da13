//! # quire-core
//!
//! Core library for the quire static blog generator.
//!
//! This crate turns a directory of markdown posts into a sorted corpus:
//! frontmatter parsing, footnote sidenotes, heading ids, reading metrics and
//! related-post selection. Page rendering lives in `quire-render`.

pub mod builder;
pub mod config;
pub mod date;
pub mod frontmatter;
pub mod markdown;
pub mod metrics;
pub mod models;
pub mod related;
pub mod slug;

pub use builder::{BuildError, SiteBuilder};
pub use config::{Config, ConfigError};
pub use markdown::{MarkdownProcessor, MarkdownRenderer};
pub use models::{Category, Heading, MetaValue, Metadata, Post, Site};
pub use slug::slugify;
