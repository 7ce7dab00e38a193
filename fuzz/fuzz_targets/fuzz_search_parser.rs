#![no_main]
use libfuzzer_sys::fuzz_target;

use homefinder::adapters::scraper::search_parser::{find_next_page, parse_search_page};

fuzz_target!(|data: &[u8]| {
    if let Ok(html) = std::str::from_utf8(data) {
        let _ = parse_search_page(html, "https://www.zillow.com");
        let _ = find_next_page(html, "https://www.zillow.com/homes/for_rent/");
    }
});
