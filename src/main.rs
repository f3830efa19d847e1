use anyhow::Context;
use cache_search::config::Config;
use cache_search::{search, GeocachingScraper};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Cache Search");

    let config = Config::from_env()?;
    let request = config
        .search
        .to_request()
        .context("Invalid search in config")?;

    let scraper = GeocachingScraper::with_config(config.scraper)?;

    let mut caches = Vec::new();
    for (i, result) in search(&scraper, &request).enumerate() {
        let cache = result?;
        println!("{}. {} {} ({} favorites)", i + 1, cache.wp, cache.name, cache.favorites);
        caches.push(cache);
    }

    info!("Found {} caches", caches.len());

    let json = serde_json::to_string_pretty(&caches)?;
    std::fs::write("search_results.json", json).context("Failed to write search_results.json")?;
    info!("Saved results to search_results.json");

    Ok(())
}
