use std::time::Duration;

use feed_rs::model::Entry;
use feed_rs::parser;
use reqwest::Client;
use thiserror::Error;
use tracing::{error, info};

use crate::config::FeedSource;
use crate::item::RawFeedItem;

const USER_AGENT: &str = "FeedPage/1.0 (Feed Aggregator)";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    #[error("parse error: {0}")]
    Parse(#[from] feed_rs::parser::ParseFeedError),
}

pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { client })
    }

    /// Fetches and parses one feed. Failures are logged and yield no items.
    pub async fn fetch(&self, source: &FeedSource) -> Vec<RawFeedItem> {
        match self.try_fetch(source).await {
            Ok(items) => {
                info!("Fetched {} items from {}", items.len(), source.url);
                items
            }
            Err(e) => {
                error!("Error fetching feed from {}: {}", source.url, e);
                Vec::new()
            }
        }
    }

    pub async fn try_fetch(&self, source: &FeedSource) -> Result<Vec<RawFeedItem>, FetchError> {
        info!("Fetching feed: {}", source.url);

        let response = self.client.get(&source.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus(status.as_u16()));
        }
        let bytes = response.bytes().await?;

        parse_items(&bytes, source.name.as_deref())
    }
}

/// Parses feed bytes into raw items.
///
/// `fallback_title` names the source when the feed has no title of its own.
pub fn parse_items(
    bytes: &[u8],
    fallback_title: Option<&str>,
) -> Result<Vec<RawFeedItem>, FetchError> {
    let feed = parser::parse(bytes)?;

    let feed_title = feed
        .title
        .map(|t| t.content)
        .filter(|t| !t.trim().is_empty())
        .or_else(|| fallback_title.map(str::to_string));

    let items = feed
        .entries
        .into_iter()
        .map(|entry| raw_item(entry, feed_title.clone()))
        .collect();

    Ok(items)
}

fn raw_item(entry: Entry, feed_title: Option<String>) -> RawFeedItem {
    let title = entry.title.as_ref().map(|t| t.content.clone());
    let link = entry.links.first().map(|l| l.href.clone());
    let published = entry
        .published
        .or(entry.updated)
        .map(|dt| dt.to_rfc3339());

    RawFeedItem {
        content: item_content(&entry),
        title,
        link,
        published,
        feed_title,
    }
}

/// Item body, taken from the first non-blank of: full content, summary
/// (RSS description), media description.
fn item_content(entry: &Entry) -> String {
    let candidates = [
        entry.content.as_ref().and_then(|c| c.body.as_deref()),
        entry.summary.as_ref().map(|s| s.content.as_str()),
        entry
            .media
            .iter()
            .find_map(|m| m.description.as_ref().map(|d| d.content.as_str())),
    ];

    candidates
        .into_iter()
        .flatten()
        .find(|c| !c.trim().is_empty())
        .unwrap_or_default()
        .to_string()
}
