use std::collections::HashSet;

use crate::domain::listing::Listing;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Deduplicated {
    pub listings: Vec<Listing>,
    pub removed: usize,
}

/// Keeps the first occurrence of every `(address, price, link)` triple.
///
/// Paginated results often repeat cards across page boundaries; order of
/// first appearance is preserved.
pub fn deduplicate(listings: Vec<Listing>) -> Deduplicated {
    let mut seen: HashSet<(String, String, String)> = HashSet::with_capacity(listings.len());
    let mut unique = Vec::with_capacity(listings.len());
    let mut removed = 0;

    for listing in listings {
        let (address, price, link) = listing.key();
        if seen.insert((address.to_string(), price.to_string(), link.to_string())) {
            unique.push(listing);
        } else {
            removed += 1;
        }
    }

    if removed > 0 {
        tracing::debug!(removed, "Removed duplicate listings");
    }
    tracing::debug!(unique = unique.len(), "Unique listings after deduplication");

    Deduplicated {
        listings: unique,
        removed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::make_listing;

    #[test]
    fn keeps_first_seen_order() {
        let a = make_listing("1 Main St", "$2,000");
        let b = make_listing("2 Oak Ave", "$1,500");
        let result = deduplicate(vec![a.clone(), b.clone(), a.clone()]);
        assert_eq!(result.listings, vec![a, b]);
        assert_eq!(result.removed, 1);
    }

    #[test]
    fn same_address_different_price_is_kept() {
        let a = make_listing("1 Main St", "$2,000");
        let b = make_listing("1 Main St", "$2,100");
        let result = deduplicate(vec![a, b]);
        assert_eq!(result.listings.len(), 2);
        assert_eq!(result.removed, 0);
    }

    #[test]
    fn different_link_is_kept() {
        let a = Listing::new("1 Main St", "$2,000", "2000", "https://x/1").unwrap();
        let b = Listing::new("1 Main St", "$2,000", "2000", "https://x/1#bedrooms-1").unwrap();
        assert_eq!(deduplicate(vec![a, b]).listings.len(), 2);
    }

    #[test]
    fn median_does_not_affect_identity() {
        let a = Listing::new("1 Main St", "$2,000", "2000", "https://x/1").unwrap();
        let b = Listing::new("1 Main St", "$2,000", "1999", "https://x/1").unwrap();
        let result = deduplicate(vec![a.clone(), b]);
        assert_eq!(result.listings, vec![a]);
    }

    #[test]
    fn empty_input() {
        let result = deduplicate(Vec::new());
        assert!(result.listings.is_empty());
        assert_eq!(result.removed, 0);
    }
}
