use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::listing::Listing;
use crate::domain::price::extract_numeric_price;
use crate::error::{HomefinderError, Result};
use crate::ports::listing_sink::{ListingSink, SubmissionReport};
use crate::ports::page_source::PageSource;

/// Serves canned HTML by exact URL; unknown URLs are `PageNotFound`.
#[derive(Default)]
pub struct MockPageSource {
    pages: HashMap<String, String>,
    requests: Mutex<Vec<String>>,
}

impl MockPageSource {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_page(mut self, url: &str, html: String) -> Self {
        self.pages.insert(url.to_string(), html);
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageSource for MockPageSource {
    async fn fetch_page(&self, url: &str) -> Result<String> {
        self.requests.lock().unwrap().push(url.to_string());
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| HomefinderError::PageNotFound {
                url: url.to_string(),
            })
    }
}

/// Accepts every batch and keeps a copy of it.
#[derive(Default)]
pub struct RecordingSink {
    batches: Mutex<Vec<Vec<Listing>>>,
}

impl RecordingSink {
    pub fn batches(&self) -> Vec<Vec<Listing>> {
        self.batches.lock().unwrap().clone()
    }
}

#[async_trait]
impl ListingSink for RecordingSink {
    async fn submit(&self, listings: &[Listing]) -> Result<SubmissionReport> {
        self.batches.lock().unwrap().push(listings.to_vec());
        Ok(SubmissionReport {
            submitted: listings.len(),
            failed: 0,
        })
    }
}

/// A listing whose link is derived from the address and whose median is the
/// numeric price.
pub fn make_listing(address: &str, price: &str) -> Listing {
    let median = extract_numeric_price(price).map_or_else(|| price.to_string(), |v| v.to_string());
    let link = format!(
        "https://www.zillow.com/homedetails/{}/",
        address.replace(' ', "-")
    );
    Listing::new(address, price, median, link).expect("test listing fields must be non-empty")
}

/// Builder for the inner markup of one property card.
#[derive(Default)]
pub struct CardHtml {
    address: Option<String>,
    link: Option<String>,
    price: Option<String>,
    badges: Vec<String>,
    inventory: Vec<(String, String)>,
}

impl CardHtml {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn address(mut self, address: &str) -> Self {
        self.address = Some(address.to_string());
        self
    }

    #[must_use]
    pub fn link(mut self, href: &str) -> Self {
        self.link = Some(href.to_string());
        self
    }

    #[must_use]
    pub fn price(mut self, price: &str) -> Self {
        self.price = Some(price.to_string());
        self
    }

    #[must_use]
    pub fn badge(mut self, text: &str) -> Self {
        self.badges.push(text.to_string());
        self
    }

    #[must_use]
    pub fn inventory(mut self, price: &str, bedroom_label: &str) -> Self {
        self.inventory
            .push((price.to_string(), bedroom_label.to_string()));
        self
    }

    pub fn build(&self) -> String {
        let mut html = String::new();
        if let Some(href) = &self.link {
            html.push_str(&format!(
                r#"<a class="property-card-link" data-test="property-card-link" href="{href}">"#
            ));
            if let Some(address) = &self.address {
                html.push_str(&format!("<address>{address}</address>"));
            }
            html.push_str("</a>");
        } else if let Some(address) = &self.address {
            html.push_str(&format!("<address>{address}</address>"));
        }

        if let Some(price) = &self.price {
            html.push_str(&format!(
                r#"<div><span data-test="property-card-price">{price}</span></div>"#
            ));
        }

        if !self.badges.is_empty() {
            html.push_str(r#"<div class="StyledPropertyCardBadgeArea-c11n-8-109">"#);
            for badge in &self.badges {
                html.push_str(&format!(
                    r#"<span class="StyledPropertyCardBadge-c11n-8-109">{badge}</span>"#
                ));
            }
            html.push_str("</div>");
        }

        if !self.inventory.is_empty() {
            html.push_str(r#"<div class="property-card-inventory-set">"#);
            for (price, label) in &self.inventory {
                html.push_str(r#"<div data-testid="PropertyCardInventoryBox">"#);
                html.push_str(&format!("<span>{price}</span>"));
                if !label.is_empty() {
                    html.push_str(&format!("<span>{label}</span>"));
                }
                html.push_str("</div>");
            }
            html.push_str("</div>");
        }
        html
    }
}

/// Wraps card bodies into a search results document.
pub fn card_document(cards: &[String]) -> String {
    let mut html = String::from(r#"<html><body><ul class="photo-cards">"#);
    for card in cards {
        html.push_str(&format!(
            r#"<li><article data-test="property-card">{card}</article></li>"#
        ));
    }
    html.push_str("</ul></body></html>");
    html
}
