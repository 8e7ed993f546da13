//! Build command implementation.

use anyhow::{Context, Result};
use chrono::Datelike;
use include_dir::{include_dir, Dir};
use quire_core::{Config, SiteBuilder};
use quire_render::PageRenderer;
use std::fs;
use std::path::Path;

// Embed client scripts at compile time so they're available after cargo install
static ASSETS: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/assets");

/// Build the static site from the config at `config_path`
pub fn build_site(config_path: &Path) -> Result<()> {
    tracing::info!("Loading config from {:?}", config_path);
    let config = Config::from_file(config_path).context("Failed to load configuration")?;
    build_site_with_config(&config)
}

/// Build and write every page
pub fn build_site_with_config(config: &Config) -> Result<()> {
    tracing::info!("Building site: {}", config.site.title);

    let site = SiteBuilder::new(config.clone())
        .build()
        .context("Failed to build site")?;

    let output_dir = config.output_dir();
    fs::create_dir_all(&output_dir).context("Failed to create output directory")?;

    let renderer = PageRenderer::new(config, chrono::Local::now().year());

    for post in &site.posts {
        let html = renderer
            .post(&site, post)
            .with_context(|| format!("Failed to render post {}", post.id))?;
        write_page(&output_dir.join("posts").join(&post.id).join("index.html"), &html)?;
    }

    let archive = renderer.archive(&site).context("Failed to render archive")?;
    write_page(&output_dir.join("archive").join("index.html"), &archive)?;
    write_page(&output_dir.join("posts").join("index.html"), &archive)?;

    let home = renderer.home(&site).context("Failed to render homepage")?;
    write_page(&output_dir.join("index.html"), &home)?;

    let sitemap = renderer.sitemap(&site).context("Failed to render sitemap")?;
    write_page(&output_dir.join("sitemap.xml"), &sitemap)?;
    tracing::info!("Generated sitemap.xml");

    extract_assets(&output_dir.join("assets"))?;

    tracing::info!("✓ Built {} posts, archive, homepage and sitemap", site.posts.len());
    tracing::info!("✓ Output written to {:?}", output_dir);

    Ok(())
}

fn write_page(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("Failed to create {:?}", parent))?;
    }
    fs::write(path, contents).with_context(|| format!("Failed to write {:?}", path))?;
    tracing::debug!("Wrote {:?}", path);
    Ok(())
}

fn extract_assets(dest: &Path) -> Result<()> {
    for entry in ASSETS.entries() {
        extract_entry(entry, dest)?;
    }
    Ok(())
}

fn extract_entry(entry: &include_dir::DirEntry, dest: &Path) -> Result<()> {
    match entry {
        include_dir::DirEntry::Dir(dir) => {
            for sub_entry in dir.entries() {
                extract_entry(sub_entry, dest)?;
            }
        }
        include_dir::DirEntry::File(file) => {
            let target = dest.join(file.path());
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&target, file.contents())
                .with_context(|| format!("Failed to write embedded asset to {:?}", target))?;
        }
    }
    Ok(())
}
