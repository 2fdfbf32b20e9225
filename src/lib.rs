//! Feed Page - a static feed aggregator
//!
//! Fetches a list of RSS/Atom feeds, merges their items newest first and
//! renders them into a single self-contained HTML page.

pub mod aggregator;
pub mod config;
pub mod fetcher;
pub mod item;
pub mod output;
pub mod render;
pub mod snippet;

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use tracing::info;

use crate::aggregator::aggregate;
use crate::config::Config;
use crate::fetcher::{FetchError, Fetcher};
use crate::item::DisplayItem;
use crate::output::{ensure_dir, write_page, OutputError};
use crate::render::{render, PageTemplate, RenderError};

/// Errors that stop a run. Per-feed failures never end up here.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Output(#[from] OutputError),
    #[error("failed to create HTTP client: {0}")]
    Client(#[from] FetchError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

#[derive(Debug)]
pub struct RunSummary {
    pub items: usize,
    pub sources: usize,
    pub output: PathBuf,
}

/// Generates the page described by `config`.
pub async fn run(config: &Config) -> Result<RunSummary, RunError> {
    if let Some(dir) = config.output.parent().filter(|d| !d.as_os_str().is_empty()) {
        ensure_dir(dir).await?;
        info!("Output directory {} ensured", dir.display());
    }

    let fetcher = Fetcher::new(Duration::from_secs(config.timeout_secs))?;
    let aggregation = aggregate(&fetcher, config.sources()).await;

    let items: Vec<DisplayItem> = aggregation
        .items
        .into_iter()
        .map(|item| DisplayItem::from_raw(item, config.snippet_length))
        .collect();
    let item_count = items.len();

    let html = render(&PageTemplate::new(&config.title, items))?;
    write_page(&config.output, &html).await?;
    info!("Successfully generated {}", config.output.display());

    Ok(RunSummary {
        items: item_count,
        sources: aggregation.sources,
        output: config.output.clone(),
    })
}
