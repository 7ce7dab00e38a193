pub mod cache;
pub mod listing_sink;
pub mod page_source;
