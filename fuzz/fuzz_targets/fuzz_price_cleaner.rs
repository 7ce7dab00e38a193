#![no_main]
use libfuzzer_sys::fuzz_target;

use homefinder::domain::price::{clean_price_text, format_price_range, median_price};

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let cleaned = clean_price_text(text);
        assert_eq!(clean_price_text(&cleaned), cleaned);

        let parts: Vec<&str> = text.split('|').collect();
        let _ = format_price_range(&parts);
        let _ = median_price(&parts);
    }
});
