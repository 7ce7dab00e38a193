use std::sync::LazyLock;

use scraper::{Html, Selector};
use tracing::{debug, warn};
use url::Url;

use crate::adapters::scraper::card::locate_cards;
use crate::adapters::scraper::card_parser::parse_card;
use crate::domain::listing::{PageListings, SkippedCard};
use crate::error::ParseFailure;

static NEXT_PAGE: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"a[title="Next page"]"#).expect("invalid CSS selector: next page")
});

/// Extracts every listing from one rendered search page.
///
/// Only a page without any property card is an error. Cards that fail to
/// parse are recorded in [`PageListings::skipped`] and the rest of the page
/// is still collected.
pub fn parse_search_page(html: &str, origin: &str) -> Result<PageListings, ParseFailure> {
    let document = Html::parse_document(html);
    let cards = locate_cards(&document)?;
    debug!(cards = cards.len(), "Found property cards to parse");

    let mut page = PageListings::default();
    for (i, card) in cards.into_iter().enumerate() {
        let index = i + 1;
        match parse_card(card, origin) {
            Ok(listings) => {
                debug!(card = index, entries = listings.len(), "Parsed card");
                page.listings.extend(listings);
            }
            Err(e) => {
                warn!(card = index, "Skipping card {index} due to parse error: {e}");
                page.skipped.push(SkippedCard {
                    index,
                    reason: e.to_string(),
                });
            }
        }
    }

    if !page.skipped.is_empty() {
        warn!(
            skipped = page.skipped.len(),
            accepted = page.listings.len(),
            "Some property cards were skipped"
        );
    }
    Ok(page)
}

/// URL of the enabled "Next page" link, resolved against `current_url`.
pub fn find_next_page(html: &str, current_url: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let next = document.select(&NEXT_PAGE).next()?;
    let attrs = next.value();
    if attrs.attr("disabled").is_some() || attrs.attr("aria-disabled") == Some("true") {
        debug!("Next page link found but disabled");
        return None;
    }

    let href = attrs.attr("href")?.trim();
    if href.is_empty() {
        return None;
    }
    Url::parse(current_url)
        .and_then(|base| base.join(href))
        .map(String::from)
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{CardHtml, card_document};

    const ORIGIN: &str = "https://www.zillow.com";

    #[test]
    fn parse_empty_html_is_document_failure() {
        let err = parse_search_page("<html></html>", ORIGIN).unwrap_err();
        assert_eq!(err, ParseFailure::NoCards);
        assert_eq!(err.to_string(), "No property cards found.");
        assert!(parse_search_page("", ORIGIN).is_err());
    }

    #[test]
    fn bad_card_is_skipped_with_index() {
        let html = card_document(&[
            CardHtml::new()
                .address("123 Valid St, Valid City")
                .link("/valid-link/")
                .price("$2000")
                .build(),
            CardHtml::new().link("/invalid-link/").price("$1500").build(),
        ]);
        let page = parse_search_page(&html, ORIGIN).unwrap();
        assert_eq!(page.listings.len(), 1);
        assert_eq!(page.listings[0].address(), "123 Valid St, Valid City");
        assert_eq!(
            page.skipped,
            vec![SkippedCard {
                index: 2,
                reason: "Missing Address in card.".into(),
            }]
        );
    }

    #[test]
    fn every_card_failing_yields_empty_page() {
        let html = card_document(&[CardHtml::new().build(), CardHtml::new().build()]);
        let page = parse_search_page(&html, ORIGIN).unwrap();
        assert!(page.listings.is_empty());
        assert_eq!(page.skipped.len(), 2);
    }

    #[test]
    fn listings_keep_card_order() {
        let html = card_document(&[
            CardHtml::new().address("A").link("/a/").price("$1").build(),
            CardHtml::new()
                .address("B")
                .link("/b/")
                .inventory("$2", "1 bd")
                .inventory("$3", "2 bds")
                .build(),
            CardHtml::new().address("C").link("/c/").price("$4").build(),
        ]);
        let page = parse_search_page(&html, ORIGIN).unwrap();
        let prices: Vec<&str> = page.listings.iter().map(|l| l.price()).collect();
        assert_eq!(prices, vec!["$1", "$2", "$3", "$4"]);
    }

    #[test]
    fn next_page_resolved_against_current_url() {
        let html = r#"<nav><a title="Next page" href="/homes/2_p/">Next</a></nav>"#;
        assert_eq!(
            find_next_page(html, "https://www.zillow.com/homes/").as_deref(),
            Some("https://www.zillow.com/homes/2_p/")
        );
        let relative = r#"<a title="Next page" href="page2.html">Next</a>"#;
        assert_eq!(
            find_next_page(relative, "https://appbrewery.github.io/Zillow-Clone/").as_deref(),
            Some("https://appbrewery.github.io/Zillow-Clone/page2.html")
        );
    }

    #[test]
    fn next_page_disabled_or_missing() {
        let disabled = r#"<a title="Next page" href="/p2" aria-disabled="true">Next</a>"#;
        assert_eq!(find_next_page(disabled, "https://x.com/"), None);
        let disabled_attr = r#"<a title="Next page" href="/p2" disabled>Next</a>"#;
        assert_eq!(find_next_page(disabled_attr, "https://x.com/"), None);
        assert_eq!(find_next_page("<p>end</p>", "https://x.com/"), None);
        let no_href = r#"<a title="Next page">Next</a>"#;
        assert_eq!(find_next_page(no_href, "https://x.com/"), None);
    }
}
