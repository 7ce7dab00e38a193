use serde::Serialize;

/// One priced rental offer extracted from a property card.
///
/// Every field is non-empty; [`Listing::new`] is the only way to build one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Listing {
    address: String,
    price: String,
    median_price: String,
    link: String,
}

impl Listing {
    /// Returns `None` when any field is blank.
    pub fn new(
        address: impl Into<String>,
        price: impl Into<String>,
        median_price: impl Into<String>,
        link: impl Into<String>,
    ) -> Option<Self> {
        let listing = Self {
            address: address.into(),
            price: price.into(),
            median_price: median_price.into(),
            link: link.into(),
        };
        let complete = [
            &listing.address,
            &listing.price,
            &listing.median_price,
            &listing.link,
        ]
        .iter()
        .all(|field| !field.trim().is_empty());
        complete.then_some(listing)
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn price(&self) -> &str {
        &self.price
    }

    /// Numeric summary of the price; the midpoint value for ranges.
    pub fn median_price(&self) -> &str {
        &self.median_price
    }

    pub fn link(&self) -> &str {
        &self.link
    }

    /// The identity used for deduplication.
    pub fn key(&self) -> (&str, &str, &str) {
        (&self.address, &self.price, &self.link)
    }
}

impl std::fmt::Display for Listing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {} ({})", self.address, self.price, self.link)
    }
}

/// Listings accepted from one search page, plus the cards that were skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageListings {
    pub listings: Vec<Listing>,
    pub skipped: Vec<SkippedCard>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedCard {
    /// 1-based position of the card in the document.
    pub index: usize,
    pub reason: String,
}
