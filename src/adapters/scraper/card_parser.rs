use crate::adapters::scraper::card::{
    Card, InventoryEntry, extract_address, extract_inventory, extract_main_link,
    extract_main_price, extract_unit_count,
};
use crate::domain::listing::Listing;
use crate::domain::price::{
    clean_price_text, create_specific_link, extract_numeric_price, format_price_range,
    median_price,
};
use crate::error::{ParseFailure, RequiredField};

/// Turns one property card into listings.
///
/// A card with an inventory section yields one listing per unit type, or a
/// single price-range listing when the building advertises several available
/// units. Cards without inventory fall back to their main price.
pub fn parse_card(card: Card<'_>, origin: &str) -> Result<Vec<Listing>, ParseFailure> {
    let address = extract_address(card);
    let main_link = extract_main_link(card, origin);
    validate_basics(&address, &main_link)?;

    let unit_count = extract_unit_count(card);
    let inventory = extract_inventory(card, &main_link, origin);

    let mut listings = inventory_listings(&address, &main_link, unit_count, inventory);
    if listings.is_empty() {
        listings = main_price_listing(&address, &main_link, unit_count, &extract_main_price(card))
            .into_iter()
            .collect();
    }

    if listings.is_empty() {
        return Err(ParseFailure::NoPrices);
    }
    Ok(listings)
}

fn validate_basics(address: &str, main_link: &str) -> Result<(), ParseFailure> {
    let mut missing = Vec::new();
    if address.trim().is_empty() {
        missing.push(RequiredField::Address);
    }
    if main_link.trim().is_empty() {
        missing.push(RequiredField::Link);
    }
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ParseFailure::MissingFields(missing))
    }
}

fn units_suffix(unit_count: u32) -> String {
    if unit_count > 1 {
        format!(" ({unit_count} units available)")
    } else {
        String::new()
    }
}

/// Median of a single display price: its numeric value, or the text itself
/// when it has no positive value.
fn single_median(price: &str) -> String {
    extract_numeric_price(price)
        .filter(|v| *v > 0)
        .map_or_else(|| price.to_string(), |v| v.to_string())
}

fn inventory_listings(
    address: &str,
    main_link: &str,
    unit_count: u32,
    inventory: Vec<InventoryEntry>,
) -> Vec<Listing> {
    let entries: Vec<InventoryEntry> = inventory
        .into_iter()
        .filter_map(|entry| {
            let price_text = clean_price_text(&entry.price_text);
            (!price_text.is_empty()).then_some(InventoryEntry {
                price_text,
                ..entry
            })
        })
        .collect();

    if unit_count > 1 && entries.len() > 1 {
        let prices: Vec<&str> = entries.iter().map(|e| e.price_text.as_str()).collect();
        let Some(range) = format_price_range(&prices) else {
            return Vec::new();
        };
        let median = median_price(&prices).unwrap_or_else(|| range.clone());
        return Listing::new(
            format!("{address}{}", units_suffix(unit_count)),
            range,
            median,
            main_link,
        )
        .into_iter()
        .collect();
    }

    entries
        .into_iter()
        .filter_map(|entry| {
            let mut entry_address = address.to_string();
            if !entry.bedroom_label.is_empty() {
                entry_address.push_str(&format!(" ({})", entry.bedroom_label));
            }
            entry_address.push_str(&units_suffix(unit_count));

            let link = if entry.link.contains('#') {
                entry.link
            } else {
                create_specific_link(&entry.link, &entry.bedroom_label)
            };
            let median = single_median(&entry.price_text);
            Listing::new(entry_address, entry.price_text, median, link)
        })
        .collect()
}

fn main_price_listing(
    address: &str,
    main_link: &str,
    unit_count: u32,
    raw_price: &str,
) -> Option<Listing> {
    let price = clean_price_text(raw_price);
    if price.is_empty() {
        return None;
    }
    let median = single_median(&price);
    Listing::new(
        format!("{address}{}", units_suffix(unit_count)),
        price,
        median,
        main_link,
    )
}
