use std::process::ExitCode;

use anyhow::Context;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use feed_page::config::Config;
use feed_page::{run, RunSummary};

const DEFAULT_CONFIG_PATH: &str = "feeds.toml";

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "feed_page=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match generate().await {
        Ok(summary) => {
            info!(
                "Rendered {} items from {} feeds to {}",
                summary.items,
                summary.sources,
                summary.output.display()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Error during application execution: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn generate() -> anyhow::Result<RunSummary> {
    // Load configuration
    let config_path =
        std::env::var("FEED_PAGE_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let config = Config::load(&config_path).unwrap_or_else(|e| {
        error!("Error loading {}: {}. Continuing with defaults.", config_path, e);
        Config::default()
    });

    let summary = run(&config)
        .await
        .with_context(|| format!("failed to generate {}", config.output.display()))?;

    Ok(summary)
}
