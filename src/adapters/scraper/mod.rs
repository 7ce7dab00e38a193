pub mod card;
pub mod card_parser;
pub mod client;
pub mod rate_limiter;
pub mod search_parser;
