use std::sync::Arc;

use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use reelbrowse::carousel::{BannerRotator, DisplaySurface};
use reelbrowse::catalog::{self, CatalogClient};
use reelbrowse::config::Config;
use reelbrowse::store::{self, DocumentStore};

/// Logical page width the headless carousel rotates over. A real
/// screen would pass its own viewport width instead.
const BANNER_PAGE_WIDTH: f32 = 390.0;

/// Stand-in display surface for running without a UI: every scroll
/// command is echoed into the log.
struct LogSurface;

impl DisplaySurface for LogSurface {
    fn scroll_to(&self, offset: f32, animated: bool) {
        info!(offset = offset as f64, animated, "banner scrolled");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;
    let db = DocumentStore::open(&config.store_path)?;
    info!(path = %config.store_path.display(), "opened collection store");
    let favorites = db.list_all(store::FAVORITES)?;
    info!(count = favorites.len(), "favorites loaded");

    let client = CatalogClient::new(config.api_key.as_str())?;
    let mut items = client.trending_movies().await?;
    match client.trending_tv().await {
        Ok(tv) => items.extend(tv),
        Err(err) => warn!(%err, "tv trending unavailable, showing movies only"),
    }
    info!(count = items.len(), "fetched trending titles");
    if let Some(lead) = items.first() {
        if let Some(path) = &lead.backdrop_path {
            info!(title = %lead.title, image = %catalog::image_url(path), "lead banner");
        }
    }

    let rotator = BannerRotator::new(items, BANNER_PAGE_WIDTH, Arc::new(LogSurface));

    signal::ctrl_c().await?;
    info!("shutting down");
    drop(rotator);
    Ok(())
}
