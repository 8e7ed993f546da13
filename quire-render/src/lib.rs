//! # quire-render
//!
//! Page rendering for quire.
//!
//! This crate turns a built [`quire_core::Site`] into HTML pages and a
//! sitemap using Askama templates.

pub mod pages;
pub mod templates;

pub use pages::{post_path, PageRenderer, RenderError};
pub use templates::{
    ArchiveTemplate, CategoryGroup, HomeTemplate, PostEntry, PostTemplate, RelatedEntry,
    SiteMeta, SitemapTemplate, TocEntry, YearGroup,
};
