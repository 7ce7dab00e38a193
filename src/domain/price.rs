//! Price text normalization.
//!
//! Raw card prices look like `"$2,667+ 1 bd"`, `"$1,608+ 2 bds"` or
//! `"$2,600+ Total Price"`. [`clean_price_text`] reduces them to a display
//! string such as `"$2,667"`, and the remaining helpers compare, summarize and
//! link those display strings.

use std::sync::LazyLock;

use regex::Regex;

static RE_BEDROOM_COUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:^|\s|\+)\s*\d+\s*bds?(?:\s|$)").expect("invalid regex: bedroom count")
});

static RE_BARE_BEDROOM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:^|\s)bds?(?:\s|$)").expect("invalid regex: bare bedroom")
});

static RE_NOISE_WORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)total price|studio|utilities").expect("invalid regex: noise words")
});

static RE_DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("invalid regex: digits"));

/// A display price paired with its comparable value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceCandidate<'a> {
    pub display: &'a str,
    pub value: Option<i64>,
}

impl<'a> PriceCandidate<'a> {
    pub fn new(display: &'a str) -> Self {
        Self {
            display,
            value: extract_numeric_price(display),
        }
    }

    fn is_positive(&self) -> bool {
        self.value.is_some_and(|v| v > 0)
    }
}

pub fn strip_plus_signs(text: &str) -> String {
    text.replace('+', "")
}

/// Removes `"2 bds"` / `"1 bd"` tokens, including a leading `+` as in
/// `"$2,667+1 bd"`, and bare `"bd"` tokens.
pub fn strip_bedroom_counts(text: &str) -> String {
    let without_counts = RE_BEDROOM_COUNT.replace_all(text, " ");
    RE_BARE_BEDROOM
        .replace_all(&without_counts, " ")
        .into_owned()
}

pub fn strip_noise_words(text: &str) -> String {
    RE_NOISE_WORDS.replace_all(text, "").into_owned()
}

pub fn strip_monthly_suffix(text: &str) -> String {
    text.replace("/mo", "")
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn clean_once(text: &str) -> String {
    let text = strip_bedroom_counts(text);
    let text = strip_plus_signs(&text);
    let text = strip_noise_words(&text);
    let text = strip_monthly_suffix(&text);
    collapse_whitespace(&text)
}

/// Runs the cleanup steps until the text stops changing.
///
/// A single pass can expose a new match (removing `"Studio"` from
/// `"3 bStudiods"` leaves `"3 bds"`), so the pipeline is applied to a fixed
/// point. Every pass that changes the text shortens it, which bounds the loop.
pub fn clean_price_text(raw: &str) -> String {
    let mut current = clean_once(raw);
    loop {
        let next = clean_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

/// Digits and decimal point only, commas dropped, truncated toward zero.
#[allow(clippy::cast_possible_truncation)]
pub fn extract_numeric_price(text: &str) -> Option<i64> {
    let numeric: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    numeric
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(|v| v.trunc() as i64)
}

/// Summarizes several display prices as `"{min} - {max}"`.
///
/// A single price is returned verbatim without being parsed. When none of
/// several prices carries a positive value the first input is returned as-is.
pub fn format_price_range<S: AsRef<str>>(prices: &[S]) -> Option<String> {
    match prices {
        [] => None,
        [only] => Some(only.as_ref().to_string()),
        [first, ..] => {
            let mut valid: Vec<PriceCandidate<'_>> = prices
                .iter()
                .map(|p| PriceCandidate::new(p.as_ref()))
                .filter(PriceCandidate::is_positive)
                .collect();
            if valid.is_empty() {
                return Some(first.as_ref().to_string());
            }
            valid.sort_by_key(|c| c.value);

            let min = valid[0];
            let max = valid[valid.len() - 1];
            if min.value == max.value {
                Some(min.display.to_string())
            } else {
                Some(format!("{} - {}", min.display, max.display))
            }
        }
    }
}

/// Median of the positive price values, as a plain integer string.
pub fn median_price<S: AsRef<str>>(prices: &[S]) -> Option<String> {
    let mut values: Vec<i64> = prices
        .iter()
        .filter_map(|p| extract_numeric_price(p.as_ref()))
        .filter(|v| *v > 0)
        .collect();
    if values.is_empty() {
        return None;
    }
    values.sort_unstable();

    let mid = values.len() / 2;
    let median = if values.len() % 2 == 0 {
        (i128::from(values[mid - 1]) + i128::from(values[mid])) / 2
    } else {
        i128::from(values[mid])
    };
    Some(median.to_string())
}

/// Anchors `main_link` to a bedroom section, e.g. `"1 bd"` → `#bedrooms-1`.
pub fn create_specific_link(main_link: &str, bedroom_label: &str) -> String {
    let label = bedroom_label.to_lowercase();
    if label.contains("studio") {
        return format!("{main_link}#bedrooms-0");
    }
    if label.contains("bd")
        && let Some(digits) = RE_DIGITS.find(bedroom_label)
    {
        return format!("{main_link}#bedrooms-{}", digits.as_str());
    }
    main_link.to_string()
}
