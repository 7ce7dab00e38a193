use std::fmt;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HomefinderError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to parse search page: {0}")]
    Parse(#[from] ParseFailure),

    #[error("Page not found: {url}")]
    PageNotFound { url: String },

    #[error("HTTP {status} for {url}")]
    HttpStatus { status: u16, url: String },

    #[error("Rate limit exceeded, try again later")]
    RateLimited,

    #[error("Submission failed: {reason}")]
    Submission { reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yml::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),
}

pub type Result<T> = std::result::Result<T, HomefinderError>;

/// A required card field that can be reported as missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredField {
    Address,
    Link,
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Address => f.write_str("Address"),
            Self::Link => f.write_str("Link"),
        }
    }
}

/// Why a document or a single property card could not be turned into listings.
///
/// `NoCards` is fatal for the whole document; the other variants only ever
/// describe one card and are skipped by the collector.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseFailure {
    #[error("No property cards found.")]
    NoCards,

    #[error("Missing {} in card.", join_fields(.0))]
    MissingFields(Vec<RequiredField>),

    #[error("No valid prices found in card.")]
    NoPrices,
}

fn join_fields(fields: &[RequiredField]) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
