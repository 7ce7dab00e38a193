use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Datelike, Timelike, Utc};
use reqwest::{Client, Response, StatusCode};
use serde_json::json;
use tracing::{error, info, warn};
use url::Url;

use crate::config::types::{ScraperConfig, SheetDestination, SheetsConfig};
use crate::domain::listing::Listing;
use crate::error::{HomefinderError, Result};
use crate::ports::listing_sink::{ListingSink, SubmissionReport};

pub const SHEET_HEADER: [&str; 6] = [
    "Timestamp",
    "Date",
    "Address",
    "Starting Price / Month",
    "Starting Price / Month (Median of Ranges)",
    "Link",
];

/// `M/D/YYYY H:MM:SS`, the format spreadsheet users see for form responses.
pub fn format_timestamp(now: DateTime<Utc>) -> String {
    format!(
        "{}/{}/{} {}:{:02}:{:02}",
        now.month(),
        now.day(),
        now.year(),
        now.hour(),
        now.minute(),
        now.second()
    )
}

pub fn listing_rows(listings: &[Listing], now: DateTime<Utc>) -> Vec<[String; 6]> {
    let timestamp = format_timestamp(now);
    let date = now.date_naive().to_string();
    listings
        .iter()
        .map(|listing| {
            [
                timestamp.clone(),
                date.clone(),
                listing.address().to_string(),
                listing.price().to_string(),
                listing.median_price().to_string(),
                listing.link().to_string(),
            ]
        })
        .collect()
}

/// The `{id}` in `https://docs.google.com/spreadsheets/d/{id}/edit`.
pub fn spreadsheet_id(sheet_url: &str) -> Option<String> {
    let url = Url::parse(sheet_url).ok()?;
    let mut segments = url.path_segments()?;
    segments.find(|s| *s == "d")?;
    segments
        .next()
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}

/// Writes a whole batch to one worksheet through the spreadsheet values API.
pub struct SheetsSubmitter {
    http: Client,
    api_base: Url,
    spreadsheet_id: String,
    worksheet: String,
    append: bool,
    token: String,
}

impl SheetsSubmitter {
    pub fn new(
        sheets: &SheetsConfig,
        destination: &SheetDestination,
        scraper: &ScraperConfig,
        token: String,
    ) -> Result<Self> {
        let spreadsheet_id = spreadsheet_id(&destination.url).ok_or_else(|| {
            HomefinderError::Config(format!("no spreadsheet id in {}", destination.url))
        })?;
        let http = Client::builder()
            .timeout(Duration::from_secs(scraper.request_timeout_secs))
            .build()?;
        Ok(Self {
            http,
            api_base: Url::parse(&sheets.api_base)?,
            spreadsheet_id,
            worksheet: destination.worksheet.clone(),
            append: destination.append,
            token,
        })
    }

    /// Reads the bearer token from the environment variable named in config.
    pub fn from_env(
        sheets: &SheetsConfig,
        destination: &SheetDestination,
        scraper: &ScraperConfig,
    ) -> Result<Self> {
        let token = std::env::var(&sheets.token_env).map_err(|_| {
            HomefinderError::Config(format!(
                "environment variable {} with the sheets access token is not set",
                sheets.token_env
            ))
        })?;
        Self::new(sheets, destination, scraper, token)
    }

    fn values_url(&self, range_suffix: &str) -> Result<Url> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|()| HomefinderError::Config(format!("invalid API base {}", self.api_base)))?
            .pop_if_empty()
            .extend([
                "v4",
                "spreadsheets",
                self.spreadsheet_id.as_str(),
                "values",
                format!("{}{range_suffix}", self.worksheet).as_str(),
            ]);
        url.query_pairs_mut().append_pair("valueInputOption", "RAW");
        Ok(url)
    }

    async fn check(&self, response: Response, action: &str) -> Result<()> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        if status == StatusCode::NOT_FOUND {
            error!("Spreadsheet not found. Check the URL and sharing permissions");
        } else if body.contains("Unable to parse range") {
            error!("Worksheet '{}' not found in sheet", self.worksheet);
        } else {
            error!(%status, "Failed to submit to sheet: {body}");
        }
        Err(HomefinderError::Submission {
            reason: format!("{action} returned HTTP {status}"),
        })
    }

    async fn append_rows(&self, rows: Vec<[String; 6]>) -> Result<()> {
        let mut url = self.values_url("!A1:append")?;
        url.query_pairs_mut()
            .append_pair("insertDataOption", "INSERT_ROWS");
        let response = self
            .http
            .post(url)
            .bearer_auth(&self.token)
            .json(&json!({ "values": rows }))
            .send()
            .await?;
        self.check(response, "append").await
    }

    async fn replace_rows(&self, rows: Vec<[String; 6]>) -> Result<()> {
        let clear_url = self.values_url(":clear")?;
        let response = self
            .http
            .post(clear_url)
            .bearer_auth(&self.token)
            .json(&json!({}))
            .send()
            .await?;
        self.check(response, "clear").await?;

        let mut values: Vec<Vec<String>> = vec![SHEET_HEADER.map(String::from).to_vec()];
        values.extend(rows.into_iter().map(Vec::from));
        let response = self
            .http
            .put(self.values_url("!A1")?)
            .bearer_auth(&self.token)
            .json(&json!({ "majorDimension": "ROWS", "values": values }))
            .send()
            .await?;
        self.check(response, "update").await
    }
}

#[async_trait]
impl ListingSink for SheetsSubmitter {
    async fn submit(&self, listings: &[Listing]) -> Result<SubmissionReport> {
        if listings.is_empty() {
            warn!("No listings to submit");
            return Ok(SubmissionReport::default());
        }

        let rows = listing_rows(listings, Utc::now());
        let count = rows.len();
        if self.append {
            self.append_rows(rows).await?;
            info!("Appended {count} listings to sheet");
        } else {
            self.replace_rows(rows).await?;
            info!("Wrote {count} listings to sheet (cleared existing data)");
        }

        Ok(SubmissionReport {
            submitted: count,
            failed: 0,
        })
    }
}
