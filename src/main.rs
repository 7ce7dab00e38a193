use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use homefinder::adapters::cache::memory_cache::MemoryCache;
use homefinder::adapters::scraper::client::HttpPageSource;
use homefinder::adapters::submission::build_sink;
use homefinder::config::load_config;
use homefinder::config::types::{Config, Destination, ProfileConfig};
use homefinder::pipeline::{Harvester, run_profile};
use homefinder::ports::cache::PageCache;

fn find_config_path() -> PathBuf {
    let candidates = [PathBuf::from("config.yaml"), binary_dir().join("config.yaml")];

    for path in &candidates {
        if path.exists() {
            return path.clone();
        }
    }

    candidates[0].clone()
}

fn binary_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// With no configured profiles, scrape the default search once without
/// submitting anywhere.
fn profiles(config: &Config) -> Vec<ProfileConfig> {
    if config.profiles.is_empty() {
        tracing::info!("No profiles configured, running the default search");
        return vec![ProfileConfig {
            name: "default".into(),
            search_url: "https://appbrewery.github.io/Zillow-Clone/".into(),
            destination: Destination::None,
        }];
    }
    config.profiles.clone()
}

async fn run(profile: &ProfileConfig, harvester: &Harvester, config: &Config) -> Result<()> {
    let sink = build_sink(&profile.destination, config)?;
    let (harvest, submission) = run_profile(harvester, &profile.search_url, sink.as_deref()).await?;

    for listing in &harvest.listings {
        tracing::debug!(profile = %profile.name, "{listing}");
    }
    if let Some(report) = submission {
        tracing::info!(
            profile = %profile.name,
            submitted = report.submitted,
            failed = report.failed,
            "Profile finished"
        );
    } else {
        tracing::info!(
            profile = %profile.name,
            listings = harvest.listings.len(),
            "Profile finished without submission"
        );
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    tracing::info!("Starting homefinder");

    let config_path = find_config_path();
    let config = load_config(&config_path)?;

    let cache: Arc<dyn PageCache> = Arc::new(MemoryCache::new(config.cache.max_entries));
    let source = Arc::new(HttpPageSource::new(&config.scraper, &config.cache, cache)?);
    let harvester = Harvester::new(
        source,
        config.scraper.site_origin.clone(),
        config.scraper.max_pages,
    );

    let mut failures = 0;
    for profile in profiles(&config) {
        tracing::info!(profile = %profile.name, url = %profile.search_url, "Running profile");
        if let Err(e) = run(&profile, &harvester, &config).await {
            tracing::error!(profile = %profile.name, "Profile failed: {e:#}");
            failures += 1;
        }
    }

    if failures > 0 {
        anyhow::bail!("{failures} profile(s) failed");
    }
    Ok(())
}
