// src/domain/currency.rs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Snapshot of exchange rates, expressed as units of each currency per USD.
///
/// The host fetches rates at most once per session; when that fails it falls
/// back to [`CurrencyRates::fallback`]. Either snapshot is used the same way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyRates {
    rates: BTreeMap<String, f64>,
}

/// Shape returned by the public exchange-rate service.
#[derive(Deserialize)]
#[serde(untagged)]
enum RatesDocument {
    Wrapped { rates: BTreeMap<String, f64> },
    Flat(BTreeMap<String, f64>),
}

impl Default for CurrencyRates {
    fn default() -> Self {
        Self::fallback()
    }
}

impl CurrencyRates {
    pub fn new(rates: impl IntoIterator<Item = (String, f64)>) -> Self {
        Self {
            rates: rates
                .into_iter()
                .map(|(code, rate)| (code.to_ascii_uppercase(), rate))
                .collect(),
        }
    }

    /// Hardcoded table used when the rate fetch fails.
    pub fn fallback() -> Self {
        Self::new([
            ("USD".to_string(), 1.0),
            ("IDR".to_string(), 16782.0),
            ("AUD".to_string(), 1.53),
            ("EUR".to_string(), 0.92),
            ("SGD".to_string(), 1.34),
        ])
    }

    /// Parses either `{"IDR": 16782, ...}` or `{"rates": {"IDR": 16782, ...}}`.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        let doc: RatesDocument = serde_json::from_str(text)?;
        let rates = match doc {
            RatesDocument::Wrapped { rates } | RatesDocument::Flat(rates) => rates,
        };
        Ok(Self::new(rates))
    }

    /// Usable rate for `code`; missing, non-finite and non-positive rates are `None`.
    pub fn rate(&self, code: &str) -> Option<f64> {
        self.rates
            .get(&code.to_ascii_uppercase())
            .copied()
            .filter(|r| r.is_finite() && *r > 0.0)
    }

    /// Converts `amount` of `code` into USD. Without a usable rate the amount
    /// is returned unconverted.
    pub fn to_usd(&self, amount: f64, code: &str) -> f64 {
        match self.rate(code) {
            Some(rate) => amount / rate,
            None => amount,
        }
    }

    pub fn from_usd(&self, usd: f64, code: &str) -> f64 {
        match self.rate(code) {
            Some(rate) => usd * rate,
            None => usd,
        }
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.rates.keys().map(String::as_str)
    }
}

fn symbol(code: &str) -> Option<&'static str> {
    match code.to_ascii_uppercase().as_str() {
        "USD" => Some("$"),
        "AUD" => Some("A$"),
        "SGD" => Some("S$"),
        "EUR" => Some("€"),
        "IDR" => Some("Rp "),
        _ => None,
    }
}

/// Groups the whole part of `value` with thousands separators.
fn group_thousands(value: f64) -> String {
    let rounded = value.round();
    let negative = rounded < 0.0;
    let digits = format!("{:.0}", rounded.abs());

    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if negative {
        format!("-{out}")
    } else {
        out
    }
}

/// Formats money rounded to whole units, e.g. `$30,000` or `Rp 16,782,000`.
/// Non-finite amounts render as zero.
pub fn format_money(amount: f64, code: &str) -> String {
    let amount = if amount.is_finite() { amount } else { 0.0 };
    let grouped = group_thousands(amount);
    match symbol(code) {
        Some(sym) => match grouped.strip_prefix('-') {
            Some(abs) => format!("-{sym}{abs}"),
            None => format!("{sym}{grouped}"),
        },
        None => format!("{} {grouped}", code.to_ascii_uppercase()),
    }
}

pub fn format_usd(amount: f64) -> String {
    format_money(amount, "USD")
}

/// One-decimal percentage for display.
pub fn format_pct(value: f64) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    format!("{value:.1}%")
}

/// Converts a USD price into `code` and formats it.
pub fn display_price(usd: f64, code: &str, rates: &CurrencyRates) -> String {
    let code = if rates.rate(code).is_some() { code } else { "USD" };
    format_money(rates.from_usd(usd, code), code)
}
