//! Card location and per-card field extraction.
//!
//! Extractors are best-effort: a missing element yields an empty string, an
//! empty vector or a default, never an error. Deciding whether a card is
//! usable is left to [`card_parser`](super::card_parser).

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::error::ParseFailure;

/// One property card inside a parsed search page.
pub type Card<'a> = ElementRef<'a>;

fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid CSS selector {css:?}: {e}"))
}

static CARD: LazyLock<Selector> = LazyLock::new(|| selector(r#"article[data-test="property-card"]"#));
static ADDRESS: LazyLock<Selector> = LazyLock::new(|| selector("address"));
static MAIN_LINK: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"a.property-card-link[data-test="property-card-link"]"#));
static MAIN_PRICE: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"span[data-test="property-card-price"]"#));
static SPAN: LazyLock<Selector> = LazyLock::new(|| selector("span"));
static BADGE_AREA: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"div[class*="StyledPropertyCardBadgeArea"]"#));
static BADGE: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"span[class*="StyledPropertyCardBadge"]"#));
static INVENTORY_SET: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"div[class*="property-card-inventory-set"]"#));
static INVENTORY_BOX: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"[data-testid="PropertyCardInventoryBox"]"#));
static LEGACY_PRICE: LazyLock<Selector> = LazyLock::new(|| selector(r#"span[class*="PriceText"]"#));
static LEGACY_BEDS: LazyLock<Selector> = LazyLock::new(|| selector(r#"span[class*="BedText"]"#));

static RE_UNIT_COUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+)\s+(?:available\s+)?units?").expect("invalid regex: unit count")
});

/// One priced unit type listed in a card's inventory section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryEntry {
    /// Raw, uncleaned price text.
    pub price_text: String,
    pub bedroom_label: String,
    /// The entry's own link, or the card's main link when it has none.
    pub link: String,
}

/// All property cards in document order.
pub fn locate_cards(document: &Html) -> Result<Vec<Card<'_>>, ParseFailure> {
    let cards: Vec<Card<'_>> = document.select(&CARD).collect();
    if cards.is_empty() {
        return Err(ParseFailure::NoCards);
    }
    Ok(cards)
}

/// Text content with every text node trimmed, like a browser's "visible
/// text" with layout whitespace removed.
fn stripped_text(element: ElementRef<'_>) -> String {
    element.text().map(str::trim).collect()
}

/// Makes a card href absolute against the site origin.
pub fn absolutize(href: &str, origin: &str) -> String {
    let href = href.trim();
    if href.is_empty() || href.starts_with("http") {
        return href.to_string();
    }
    if href.starts_with('/') {
        return format!("{}{href}", origin.trim_end_matches('/'));
    }
    Url::parse(origin)
        .and_then(|base| base.join(href))
        .map_or_else(|_| format!("{origin}{href}"), String::from)
}

pub fn extract_address(card: Card<'_>) -> String {
    card.select(&ADDRESS)
        .next()
        .map(|el| stripped_text(el).replace('|', "").trim().to_string())
        .unwrap_or_default()
}

pub fn extract_main_link(card: Card<'_>, origin: &str) -> String {
    card.select(&MAIN_LINK)
        .next()
        .and_then(|el| el.value().attr("href"))
        .map(|href| absolutize(href, origin))
        .unwrap_or_default()
}

/// Text of the main price element, without sibling notes such as
/// "Fees may apply" that share its container.
pub fn extract_main_price(card: Card<'_>) -> String {
    let Some(container) = card.select(&MAIN_PRICE).next() else {
        return String::new();
    };
    let inner = container.select(&SPAN).next();
    let innermost = inner.and_then(|span| span.select(&SPAN).next());
    stripped_text(innermost.or(inner).unwrap_or(container))
}

/// Number of available units advertised by the card's badges, default 1.
pub fn extract_unit_count(card: Card<'_>) -> u32 {
    let Some(area) = card.select(&BADGE_AREA).next() else {
        return 1;
    };
    area.select(&BADGE)
        .find_map(|badge| {
            let text = stripped_text(badge).to_lowercase();
            RE_UNIT_COUNT
                .captures(&text)
                .and_then(|caps| caps[1].parse::<u32>().ok())
        })
        .unwrap_or(1)
}

pub fn extract_inventory(card: Card<'_>, main_link: &str, origin: &str) -> Vec<InventoryEntry> {
    let Some(section) = card.select(&INVENTORY_SET).next() else {
        return Vec::new();
    };

    let boxes: Vec<ElementRef<'_>> = section.select(&INVENTORY_BOX).collect();
    if boxes.is_empty() {
        return legacy_inventory(section, main_link);
    }

    boxes
        .into_iter()
        .filter_map(|entry| {
            let mut spans = entry.select(&SPAN);
            let price_text = stripped_text(spans.next()?);
            let bedroom_label = spans.next().map(stripped_text).unwrap_or_default();
            let link = enclosing_href(entry, section)
                .map(|href| absolutize(href, origin))
                .filter(|link| !link.is_empty())
                .unwrap_or_else(|| main_link.to_string());
            Some(InventoryEntry {
                price_text,
                bedroom_label,
                link,
            })
        })
        .collect()
}

/// Older layout: parallel lists of price and bedroom spans matched by index.
fn legacy_inventory(section: ElementRef<'_>, main_link: &str) -> Vec<InventoryEntry> {
    let beds: Vec<String> = section.select(&LEGACY_BEDS).map(stripped_text).collect();
    section
        .select(&LEGACY_PRICE)
        .enumerate()
        .map(|(i, price)| InventoryEntry {
            price_text: stripped_text(price),
            bedroom_label: beds.get(i).cloned().unwrap_or_default(),
            link: main_link.to_string(),
        })
        .collect()
}

/// `href` of the nearest `<a>` wrapping `element`, searching no higher than
/// `boundary`.
fn enclosing_href<'a>(element: ElementRef<'a>, boundary: ElementRef<'a>) -> Option<&'a str> {
    element
        .ancestors()
        .take_while(|node| node.id() != boundary.id())
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "a")
        .and_then(|a| a.value().attr("href"))
}
