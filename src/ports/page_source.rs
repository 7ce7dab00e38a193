use async_trait::async_trait;

use crate::error::Result;

/// Yields the fully rendered HTML of one search-results page.
///
/// Implementations may fetch over HTTP, read snapshots written by a browser,
/// or serve canned pages in tests. Parsing never happens here.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_page(&self, url: &str) -> Result<String>;
}
