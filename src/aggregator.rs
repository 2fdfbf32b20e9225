use tracing::{error, info};

use crate::config::{ConfigError, FeedSource};
use crate::fetcher::Fetcher;
use crate::item::RawFeedItem;

/// Items collected from every configured source, newest first.
#[derive(Debug, Default)]
pub struct Aggregation {
    pub items: Vec<RawFeedItem>,
    /// Number of sources that were fetched, successfully or not
    pub sources: usize,
}

/// Fetches each source in order and merges the results.
///
/// A malformed source list is logged and treated as empty.
pub async fn aggregate(
    fetcher: &Fetcher,
    sources: Result<Vec<FeedSource>, ConfigError>,
) -> Aggregation {
    let sources = match sources {
        Ok(sources) => sources,
        Err(e) => {
            error!("Error: {}. No feeds will be fetched.", e);
            return Aggregation::default();
        }
    };

    let mut items = Vec::new();
    for source in &sources {
        items.extend(fetcher.fetch(source).await);
    }

    let items = sort_by_recency(items);
    info!("Aggregated {} items from {} feeds", items.len(), sources.len());

    Aggregation {
        items,
        sources: sources.len(),
    }
}

/// Orders items newest first.
///
/// Items without a parseable date cannot be compared, so they stay at their
/// original index; the dated items are stably sorted into the remaining
/// slots.
pub fn sort_by_recency(items: Vec<RawFeedItem>) -> Vec<RawFeedItem> {
    let mut dated: Vec<_> = items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| item.published_at().map(|at| (at, index)))
        .collect();
    let slots: Vec<usize> = dated.iter().map(|&(_, index)| index).collect();
    dated.sort_by(|a, b| b.0.cmp(&a.0));

    let mut order: Vec<usize> = (0..items.len()).collect();
    for (slot, (_, index)) in slots.into_iter().zip(dated) {
        order[slot] = index;
    }

    let mut items: Vec<Option<RawFeedItem>> = items.into_iter().map(Some).collect();
    order
        .into_iter()
        .filter_map(|index| items[index].take())
        .collect()
}
