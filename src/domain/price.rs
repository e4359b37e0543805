// src/domain/price.rs

use crate::domain::currency::CurrencyRates;
use crate::domain::listing::Listing;
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

/// Bare prices at or above this are assumed to be Rupiah.
pub const IDR_INFERENCE_THRESHOLD: f64 = 1_000_000.0;

fn price_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        // One separator style per amount: comma, dot or space groups, else plain digits.
        Regex::new(concat!(
            r"(?i)\b(IDR|USD|AUD|EUR|SGD)[\s:]*(",
            r"[0-9]{1,3}(?:,[0-9]{3})+(?:\.[0-9]{1,2})?",
            r"|[0-9]{1,3}(?:\.[0-9]{3})+",
            r"|[0-9]{1,3}(?:[ \x{A0}][0-9]{3})+",
            r"|[0-9]+(?:\.[0-9]{1,2})?",
            r")",
        ))
        .expect("price pattern is a valid regex")
    })
}

/// A listing price, in the currency it was quoted in and in USD.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuote {
    pub amount: f64,
    pub currency: String,
    pub amount_usd: f64,
}

impl PriceQuote {
    fn zero() -> Self {
        Self {
            amount: 0.0,
            currency: "USD".to_string(),
            amount_usd: 0.0,
        }
    }
}

/// Parses a numeric literal such as `4,500,000,000`, `4.500.000.000`,
/// `1 250 000` or `350000.50`.
fn parse_amount(literal: &str, currency: &str) -> Option<f64> {
    let compact: String = literal
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .collect();
    let compact = compact.trim_end_matches('.');

    let dots = compact.matches('.').count();
    let cleaned = if dots > 1 {
        compact.replace('.', "")
    } else if dots == 1 && currency == "IDR" {
        // Rupiah has no minor unit in listings, so a single dot before three
        // digits is a thousands separator.
        match compact.split_once('.') {
            Some((_, frac)) if frac.len() == 3 => compact.replace('.', ""),
            _ => compact.to_string(),
        }
    } else {
        compact.to_string()
    };

    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Extracts `(currency, amount)` from free price text.
pub fn parse_price_text(text: &str) -> Option<(String, f64)> {
    let caps = price_pattern().captures(text)?;
    let currency = caps.get(1)?.as_str().to_ascii_uppercase();
    let amount = parse_amount(caps.get(2)?.as_str(), &currency)?;
    Some((currency, amount))
}

/// Currency of a bare number, inferred from its magnitude.
pub fn infer_currency(raw: f64) -> &'static str {
    if raw >= IDR_INFERENCE_THRESHOLD {
        "IDR"
    } else {
        "USD"
    }
}

/// Normalizes a listing's price to USD.
///
/// The description text is tried first, then `last_price`. An unparseable or
/// missing price is a zero quote, which downstream turns into zero yields.
pub fn normalize_price(listing: &Listing, rates: &CurrencyRates) -> PriceQuote {
    let parsed = listing
        .price_description
        .as_deref()
        .and_then(parse_price_text)
        .or_else(|| {
            listing
                .last_price
                .filter(|p| p.is_finite())
                .map(|raw| (infer_currency(raw).to_string(), raw))
        });

    match parsed {
        Some((currency, amount)) => PriceQuote {
            amount_usd: rates.to_usd(amount, &currency),
            amount,
            currency,
        },
        None => PriceQuote::zero(),
    }
}
