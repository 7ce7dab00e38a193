use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{debug, warn};
use url::Url;

use crate::adapters::scraper::rate_limiter::RateLimiter;
use crate::config::types::{CacheConfig, ScraperConfig};
use crate::error::{HomefinderError, Result};
use crate::ports::cache::PageCache;
use crate::ports::page_source::PageSource;

/// Fetches search pages over HTTP, or reads `file://` snapshots saved by a
/// browser.
pub struct HttpPageSource {
    http: Client,
    rate_limiter: RateLimiter,
    cache: Arc<dyn PageCache>,
    max_retries: u32,
    page_ttl: Duration,
}

impl HttpPageSource {
    pub fn new(
        config: &ScraperConfig,
        cache_config: &CacheConfig,
        cache: Arc<dyn PageCache>,
    ) -> Result<Self> {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .cookie_store(true)
            .build()?;

        Ok(Self {
            http,
            rate_limiter: RateLimiter::new(config.rate_limit_per_second),
            cache,
            max_retries: config.max_retries,
            page_ttl: Duration::from_secs(cache_config.page_ttl_secs),
        })
    }

    async fn read_snapshot(url: &Url) -> Result<String> {
        let path = url.to_file_path().map_err(|()| HomefinderError::Config(format!(
            "not a local file URL: {url}"
        )))?;
        debug!(path = %path.display(), "Reading page snapshot");
        tokio::fs::read_to_string(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                HomefinderError::PageNotFound {
                    url: url.to_string(),
                }
            } else {
                HomefinderError::Io(e)
            }
        })
    }

    async fn fetch_html(&self, url: &str) -> Result<String> {
        let mut last_error = None;
        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = Duration::from_secs(u64::from(attempt) * 2);
                debug!(attempt, delay_secs = delay.as_secs(), "Retrying request");
                tokio::time::sleep(delay).await;
            }
            self.rate_limiter.wait().await;
            debug!(url, attempt, "Fetching page");

            match self.http.get(url).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return response.text().await.map_err(HomefinderError::Http);
                    }
                    if status == StatusCode::TOO_MANY_REQUESTS {
                        warn!(url, "Rate limited by site (429)");
                        last_error = Some(HomefinderError::RateLimited);
                        continue;
                    }
                    if status == StatusCode::NOT_FOUND {
                        return Err(HomefinderError::PageNotFound {
                            url: url.to_string(),
                        });
                    }
                    let error = HomefinderError::HttpStatus {
                        status: status.as_u16(),
                        url: url.to_string(),
                    };
                    if status.is_client_error() {
                        return Err(error);
                    }
                    warn!(url, %status, "Server error while fetching page");
                    last_error = Some(error);
                }
                Err(e) => {
                    warn!(error = %e, attempt, "HTTP request failed");
                    last_error = Some(HomefinderError::Http(e));
                }
            }
        }

        Err(last_error.unwrap_or(HomefinderError::RateLimited))
    }
}

#[async_trait]
impl PageSource for HttpPageSource {
    async fn fetch_page(&self, url: &str) -> Result<String> {
        let parsed = Url::parse(url)?;
        if parsed.scheme() == "file" {
            return Self::read_snapshot(&parsed).await;
        }

        if let Some(cached) = self.cache.get(url) {
            debug!(url, "Cache hit for page");
            return Ok(cached);
        }

        let html = self.fetch_html(url).await?;
        self.cache.set(url, &html, self.page_ttl);
        Ok(html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::cache::memory_cache::MemoryCache;

    fn source() -> HttpPageSource {
        let config = ScraperConfig {
            rate_limit_per_second: 0.0,
            max_retries: 0,
            ..Default::default()
        };
        HttpPageSource::new(&config, &CacheConfig::default(), Arc::new(MemoryCache::new(4)))
            .unwrap()
    }

    #[tokio::test]
    async fn reads_file_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page1.html");
        std::fs::write(&path, "<html>snapshot</html>").unwrap();
        let url = Url::from_file_path(&path).unwrap();

        let html = source().fetch_page(url.as_str()).await.unwrap();
        assert_eq!(html, "<html>snapshot</html>");
    }

    #[tokio::test]
    async fn missing_snapshot_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let url = Url::from_file_path(dir.path().join("absent.html")).unwrap();
        let err = source().fetch_page(url.as_str()).await.unwrap_err();
        assert!(matches!(err, HomefinderError::PageNotFound { .. }));
    }

    #[tokio::test]
    async fn invalid_url_is_rejected() {
        let err = source().fetch_page("not a url").await.unwrap_err();
        assert!(matches!(err, HomefinderError::Url(_)));
    }

    #[tokio::test]
    async fn cached_page_skips_network() {
        let cache = Arc::new(MemoryCache::new(4));
        cache.set(
            "http://127.0.0.1:9/never",
            "<html>cached</html>",
            Duration::from_secs(60),
        );
        let source = HttpPageSource::new(&ScraperConfig::default(), &CacheConfig::default(), cache)
            .unwrap();
        let html = source.fetch_page("http://127.0.0.1:9/never").await.unwrap();
        assert_eq!(html, "<html>cached</html>");
    }
}
