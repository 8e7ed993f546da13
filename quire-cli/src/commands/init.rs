//! Init command implementation.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"site:
  title: "my notes"
  author: "me"
  description: "Technical notes and essays."
  url: "https://example.com"
  tagline: "research, technical notes, and personal frameworks."

paths:
  posts: "posts"
  output: "."

related_posts: 3
words_per_minute: 220
toc_min_headings: 3
"#;

/// Initialize a new quire project
pub fn init_project(path: Option<&Path>) -> Result<()> {
    let root = path.unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(root).with_context(|| format!("Failed to create {:?}", root))?;

    write_config(root)?;
    scaffold_posts(root)?;

    println!("✓ quire initialized in {:?}", root);
    println!("  - Edit quire.yml to customize site metadata");
    println!("  - Write posts in posts/ and list them in posts/posts.json");
    Ok(())
}

fn write_config(root: &Path) -> Result<()> {
    let config_path = root.join("quire.yml");
    if config_path.exists() {
        println!("quire.yml already exists at {:?}", config_path);
        return Ok(());
    }

    fs::write(&config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {:?}", config_path))?;
    println!("Created {:?}", config_path);
    Ok(())
}

fn scaffold_posts(root: &Path) -> Result<()> {
    let posts = root.join("posts");
    fs::create_dir_all(&posts).with_context(|| format!("Failed to create {:?}", posts))?;

    let sample = posts.join("hello-world.md");
    if !sample.exists() {
        fs::write(&sample, SAMPLE_POST).with_context(|| format!("Failed to write {:?}", sample))?;
        println!("Created {:?}", sample);
    }

    let index = posts.join("posts.json");
    if !index.exists() {
        fs::write(&index, "[\n  \"hello-world.md\"\n]\n")
            .with_context(|| format!("Failed to write {:?}", index))?;
        println!("Created {:?}", index);
    }

    Ok(())
}

const SAMPLE_POST: &str = r#"---
title: "Hello, world"
date: 2025-01-01
category: personal
tags: [meta, intro]
excerpt: "First post, and a tour of what the generator does."
---

## Writing

Posts are markdown with a small frontmatter header. Footnotes turn into
margin notes[^margin].

## Building

Run `quire build` from the project root. Every post gets a page under
`posts/<id>/`, plus an archive, a homepage and a sitemap.

## Linking

Add `related: [other-post]` to the header to pin entries in the "see also"
section; the rest are picked by shared tags.

[^margin]: Definitions can live anywhere in the file.
"#;
