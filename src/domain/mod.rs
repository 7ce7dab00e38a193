pub mod dedup;
pub mod listing;
pub mod price;
