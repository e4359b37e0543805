// loader.rs
use crate::domain::{CurrencyRates, Listing};
use crate::errors::{AppError, AppResult};
use std::fs;
use std::path::Path;

/// Reads a listings export: a JSON array of `listings_tracker` rows.
pub fn load_listings(path: &Path) -> AppResult<Vec<Listing>> {
    let text = fs::read_to_string(path).map_err(|e| AppError::io(path, e))?;
    let listings: Vec<Listing> =
        serde_json::from_str(&text).map_err(|source| AppError::JsonParse {
            path: path.to_path_buf(),
            source,
        })?;

    tracing::info!(count = listings.len(), path = %path.display(), "loaded listings");
    Ok(listings)
}

/// Reads a currency snapshot. A missing path, unreadable file or bad JSON
/// is not fatal: the fallback table is used and a warning logged.
pub fn load_rates(path: Option<&Path>, fallback: CurrencyRates) -> CurrencyRates {
    let Some(path) = path else {
        return fallback;
    };

    let loaded = fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|text| CurrencyRates::from_json(&text).map_err(|e| e.to_string()));

    match loaded {
        Ok(rates) => {
            tracing::info!(path = %path.display(), "loaded currency rates");
            rates
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "using fallback currency rates");
            fallback
        }
    }
}
