use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::adapters::scraper::search_parser::{find_next_page, parse_search_page};
use crate::domain::dedup::deduplicate;
use crate::domain::listing::{Listing, SkippedCard};
use crate::error::Result;
use crate::ports::listing_sink::{ListingSink, SubmissionReport};
use crate::ports::page_source::PageSource;

/// Everything collected from one paginated search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HarvestReport {
    /// Deduplicated listings in first-seen order.
    pub listings: Vec<Listing>,
    pub pages: usize,
    /// Cards skipped across all pages, with their page-local index.
    pub skipped: Vec<SkippedCard>,
    pub duplicates_removed: usize,
}

/// Walks a search through its "Next page" links and gathers listings.
pub struct Harvester {
    source: Arc<dyn PageSource>,
    origin: String,
    max_pages: usize,
}

impl Harvester {
    pub fn new(source: Arc<dyn PageSource>, origin: impl Into<String>, max_pages: usize) -> Self {
        Self {
            source,
            origin: origin.into(),
            max_pages: max_pages.max(1),
        }
    }

    pub async fn harvest(&self, search_url: &str) -> Result<HarvestReport> {
        let mut visited = HashSet::new();
        let mut next = Some(search_url.to_string());
        let mut all_listings = Vec::new();
        let mut report = HarvestReport::default();

        while let Some(url) = next.take() {
            if report.pages >= self.max_pages {
                info!(max_pages = self.max_pages, "Reached page limit");
                break;
            }
            if !visited.insert(url.clone()) {
                warn!(url, "Next page points to an already visited page, stopping");
                break;
            }

            let html = self.source.fetch_page(&url).await?;
            let page = parse_search_page(&html, &self.origin)?;
            report.pages += 1;
            debug!(
                page = report.pages,
                listings = page.listings.len(),
                skipped = page.skipped.len(),
                "Collected page"
            );
            all_listings.extend(page.listings);
            report.skipped.extend(page.skipped);

            next = find_next_page(&html, &url);
        }

        let unique = deduplicate(all_listings);
        report.listings = unique.listings;
        report.duplicates_removed = unique.removed;

        info!(
            pages = report.pages,
            listings = report.listings.len(),
            skipped = report.skipped.len(),
            duplicates = report.duplicates_removed,
            "Harvest complete"
        );
        Ok(report)
    }
}

/// Harvests one search and hands the batch to `sink`, if there is one.
pub async fn run_profile(
    harvester: &Harvester,
    search_url: &str,
    sink: Option<&dyn ListingSink>,
) -> Result<(HarvestReport, Option<SubmissionReport>)> {
    let harvest = harvester.harvest(search_url).await?;
    let Some(sink) = sink else {
        warn!("No submission destination configured, listings were not submitted");
        return Ok((harvest, None));
    };
    let submission = sink.submit(&harvest.listings).await?;
    Ok((harvest, Some(submission)))
}
