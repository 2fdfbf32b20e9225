use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::error;

use crate::snippet::DEFAULT_SNIPPET_LENGTH;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("'feeds' array not found in config; add a 'feeds' array of URL strings")]
    MissingFeeds,
    #[error("'feeds' must be an array of URL strings, found {0}")]
    FeedsNotAList(&'static str),
    #[error("'feeds' entry {index} must be a URL string or a table with a 'url' key")]
    InvalidFeedEntry { index: usize },
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Raw `feeds` value; its shape is checked by [`Config::sources`]
    #[serde(default)]
    pub feeds: Option<toml::Value>,
    #[serde(default = "default_output")]
    pub output: PathBuf,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_snippet_length")]
    pub snippet_length: usize,
    /// Per-feed request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_output() -> PathBuf {
    PathBuf::from("public/index.html")
}

fn default_title() -> String {
    "Feed Digest".to_string()
}

fn default_snippet_length() -> usize {
    DEFAULT_SNIPPET_LENGTH
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            feeds: None,
            output: default_output(),
            title: default_title(),
            snippet_length: default_snippet_length(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// A configured feed URL, optionally with a display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedSource {
    pub url: String,
    pub name: Option<String>,
}

impl FeedSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            name: None,
        }
    }

    fn from_value(index: usize, value: &toml::Value) -> Result<Self, ConfigError> {
        match value {
            toml::Value::String(url) => Ok(Self::new(url.clone())),
            toml::Value::Table(table) => {
                let url = table
                    .get("url")
                    .and_then(toml::Value::as_str)
                    .ok_or(ConfigError::InvalidFeedEntry { index })?;
                let name = table
                    .get("name")
                    .and_then(toml::Value::as_str)
                    .map(str::to_string);
                Ok(Self {
                    url: url.to_string(),
                    name,
                })
            }
            _ => Err(ConfigError::InvalidFeedEntry { index }),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_str(&content)
    }

    /// Parse config from a TOML string (useful for testing)
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// Feed sources in configuration order.
    ///
    /// Fails only when `feeds` is absent or not an array. Malformed entries
    /// are logged and skipped so the remaining feeds still load.
    pub fn sources(&self) -> Result<Vec<FeedSource>, ConfigError> {
        let (sources, rejected) = self.partition_sources()?;
        for e in rejected {
            error!("Skipping feed: {}", e);
        }
        Ok(sources)
    }

    /// Valid sources plus one error per malformed `feeds` entry.
    pub fn partition_sources(
        &self,
    ) -> Result<(Vec<FeedSource>, Vec<ConfigError>), ConfigError> {
        let value = self.feeds.as_ref().ok_or(ConfigError::MissingFeeds)?;
        let entries = value
            .as_array()
            .ok_or_else(|| ConfigError::FeedsNotAList(value.type_str()))?;

        let mut sources = Vec::with_capacity(entries.len());
        let mut rejected = Vec::new();
        for (index, entry) in entries.iter().enumerate() {
            match FeedSource::from_value(index, entry) {
                Ok(source) => sources.push(source),
                Err(e) => rejected.push(e),
            }
        }

        Ok((sources, rejected))
    }
}
