//! Configuration parsing and management.

use crate::metrics::DEFAULT_WORDS_PER_MINUTE;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse YAML: {0}")]
    ParseError(#[from] serde_yaml::Error),

    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Main configuration struct matching the quire.yml schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub site: SiteConfig,

    #[serde(default)]
    pub paths: PathsConfig,

    /// Upper bound on "see also" entries per post
    #[serde(default = "default_related_posts")]
    pub related_posts: usize,

    #[serde(default = "default_words_per_minute")]
    pub words_per_minute: u32,

    /// Posts with fewer indexed headings get no table of contents
    #[serde(default = "default_toc_min_headings")]
    pub toc_min_headings: usize,

    // Path to the config file, for relative path resolution
    #[serde(skip)]
    config_path: Option<PathBuf>,
}

fn default_related_posts() -> usize {
    3
}

fn default_words_per_minute() -> u32 {
    DEFAULT_WORDS_PER_MINUTE
}

fn default_toc_min_headings() -> usize {
    3
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    pub title: String,
    pub author: String,
    pub description: String,
    /// Canonical origin, e.g. `https://example.com`
    pub url: String,

    #[serde(default)]
    pub tagline: Option<String>,

    #[serde(default)]
    pub github: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "default_posts_dir")]
    pub posts: PathBuf,

    /// JSON list of post file names; defaults to `<posts>/posts.json`
    #[serde(default)]
    pub index: Option<PathBuf>,

    #[serde(default = "default_output_dir")]
    pub output: PathBuf,
}

fn default_posts_dir() -> PathBuf {
    PathBuf::from("posts")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            posts: default_posts_dir(),
            index: None,
            output: default_output_dir(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_yaml(&contents)?;

        // Store config file path for relative path resolution
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Parse configuration from YAML text; paths resolve against the working directory
    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.words_per_minute == 0 {
            return Err(ConfigError::Invalid {
                field: "words_per_minute",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.site.url.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "site.url",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Get the posts directory, resolved relative to config file
    pub fn posts_dir(&self) -> PathBuf {
        self.resolve_path(&self.paths.posts)
    }

    /// Get the post index file, resolved relative to config file
    pub fn index_path(&self) -> PathBuf {
        match &self.paths.index {
            Some(index) => self.resolve_path(index),
            None => self.posts_dir().join("posts.json"),
        }
    }

    /// Get the output directory, resolved relative to config file
    pub fn output_dir(&self) -> PathBuf {
        self.resolve_path(&self.paths.output)
    }

    /// Site origin without a trailing slash
    pub fn site_origin(&self) -> &str {
        self.site.url.trim().trim_end_matches('/')
    }

    /// Resolve a path relative to the config file location
    fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            return path.to_path_buf();
        }
        match self.config_path.as_deref().and_then(Path::parent) {
            Some(parent) => parent.join(path),
            None => path.to_path_buf(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const MINIMAL: &str = r#"
site:
  title: "My Blog"
  author: "Jane"
  description: "Notes"
  url: "https://example.com/"
"#;

    #[test]
    fn test_default_values() {
        let config = Config::from_yaml(MINIMAL).unwrap();

        assert_eq!(config.related_posts, 3);
        assert_eq!(config.words_per_minute, 220);
        assert_eq!(config.toc_min_headings, 3);
        assert_eq!(config.site.tagline, None);
        assert_eq!(config.posts_dir(), PathBuf::from("posts"));
        assert_eq!(config.index_path(), PathBuf::from("posts/posts.json"));
        assert_eq!(config.output_dir(), PathBuf::from("."));
    }

    #[test]
    fn test_urls() {
        let config = Config::from_yaml(MINIMAL).unwrap();
        assert_eq!(config.site_origin(), "https://example.com");
    }

    #[test]
    fn test_paths_resolve_against_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quire.yml");
        fs::write(
            &path,
            format!(
                "{}paths:\n  posts: content\n  index: lists/all.json\n  output: /srv/site\nrelated_posts: 5\n",
                MINIMAL
            ),
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.posts_dir(), dir.path().join("content"));
        assert_eq!(config.index_path(), dir.path().join("lists/all.json"));
        assert_eq!(config.output_dir(), PathBuf::from("/srv/site"));
        assert_eq!(config.related_posts, 5);
    }

    #[test]
    fn test_missing_file() {
        let err = Config::from_file("/nonexistent/quire.yml").unwrap_err();
        assert!(matches!(err, ConfigError::ReadError { .. }));
    }

    #[test]
    fn test_rejects_zero_reading_speed() {
        let yaml = format!("{}words_per_minute: 0\n", MINIMAL);
        let err = Config::from_yaml(&yaml).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "words_per_minute",
                ..
            }
        ));
    }

    #[test]
    fn test_missing_site_section_is_an_error() {
        let err = Config::from_yaml("paths:\n  posts: p\n").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }
}
