pub mod cache;
pub mod scraper;
pub mod submission;
