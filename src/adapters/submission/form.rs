use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, error, info, warn};

use crate::config::types::{FormDestination, ScraperConfig};
use crate::domain::listing::Listing;
use crate::error::{HomefinderError, Result};
use crate::ports::listing_sink::{ListingSink, SubmissionReport};

/// Posts listings one at a time to a web form.
///
/// A post only counts as submitted when the response page shows the
/// configured confirmation text. Failed posts are logged and counted; the
/// remaining listings are still sent.
pub struct FormSubmitter {
    http: Client,
    destination: FormDestination,
}

impl FormSubmitter {
    pub fn new(destination: FormDestination, scraper: &ScraperConfig) -> Result<Self> {
        let http = Client::builder()
            .user_agent(&scraper.user_agent)
            .timeout(Duration::from_secs(scraper.request_timeout_secs))
            .build()?;
        Ok(Self { http, destination })
    }

    fn encode(&self, listing: &Listing) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .append_pair(&self.destination.address_field, listing.address())
            .append_pair(&self.destination.price_field, listing.price())
            .append_pair(&self.destination.link_field, listing.link())
            .finish()
    }

    async fn submit_one(&self, listing: &Listing) -> Result<()> {
        let response = self
            .http
            .post(&self.destination.url)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(self.encode(listing))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if status.is_success() && body.contains(&self.destination.confirmation_text) {
            debug!(address = listing.address(), "Form submission confirmed");
            return Ok(());
        }
        Err(HomefinderError::Submission {
            reason: format!(
                "Form submission confirmation not received for {} (HTTP {status})",
                listing.address()
            ),
        })
    }
}

#[async_trait]
impl ListingSink for FormSubmitter {
    async fn submit(&self, listings: &[Listing]) -> Result<SubmissionReport> {
        if listings.is_empty() {
            warn!("No listings to submit");
            return Ok(SubmissionReport::default());
        }

        let mut report = SubmissionReport::default();
        for listing in listings {
            match self.submit_one(listing).await {
                Ok(()) => report.submitted += 1,
                Err(e) => {
                    error!(
                        "Failed to submit listing: {} - Error: {e}",
                        listing.address()
                    );
                    report.failed += 1;
                }
            }
        }

        info!(
            "Submission complete: {} successful, {} failed",
            report.submitted, report.failed
        );
        Ok(report)
    }
}
