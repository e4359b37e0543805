// config.rs
use crate::domain::{Assumptions, CurrencyRates, FlagPolicy, RatePolicy};
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Policy and default assumptions, loaded from TOML. Every section is
/// optional; missing keys keep their defaults.
///
/// ```toml
/// [assumptions]
/// occupancy_pct = 60.0
///
/// [rate]
/// dampening_exponent = 0.35
///
/// [flags]
/// short_lease_years = 20
///
/// [currency]
/// display = "IDR"
/// fallback_rates = { USD = 1.0, IDR = 16500.0 }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub assumptions: Assumptions,
    pub rate: RatePolicy,
    pub flags: FlagPolicy,
    pub currency: CurrencyConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrencyConfig {
    /// Currency prices are displayed in.
    pub display: String,
    /// Replaces the built-in fallback table when set.
    pub fallback_rates: Option<BTreeMap<String, f64>>,
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        Self {
            display: "USD".to_string(),
            fallback_rates: None,
        }
    }
}

impl Config {
    pub fn from_toml_str(text: &str, path: &Path) -> AppResult<Self> {
        toml::from_str(text).map_err(|source| AppError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Reads the config file, or returns defaults when no path is given.
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let Some(path) = path else {
            tracing::debug!("no config file, using defaults");
            return Ok(Self::default());
        };

        let text = fs::read_to_string(path).map_err(|e| AppError::io(path, e))?;
        let config = Self::from_toml_str(&text, path)?;
        tracing::info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Rates used when no snapshot is supplied or it cannot be read.
    pub fn fallback_rates(&self) -> CurrencyRates {
        match &self.currency.fallback_rates {
            Some(rates) => CurrencyRates::new(rates.clone()),
            None => CurrencyRates::fallback(),
        }
    }
}
