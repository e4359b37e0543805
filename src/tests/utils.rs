use crate::domain::area_rates::AreaRates;
use crate::domain::{
    AreaRateTable, AuditContext, CurrencyRates, FlagPolicy, Listing, RatePolicy,
};

/// Owns the reference data an [`AuditContext`] borrows.
pub struct Fixture {
    pub areas: AreaRateTable,
    pub rates: CurrencyRates,
    pub rate_policy: RatePolicy,
    pub flag_policy: FlagPolicy,
    pub display_currency: String,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_areas(AreaRateTable::bali())
    }

    pub fn with_areas(areas: AreaRateTable) -> Self {
        Self {
            areas,
            rates: CurrencyRates::fallback(),
            rate_policy: RatePolicy::default(),
            flag_policy: FlagPolicy::default(),
            display_currency: "USD".to_string(),
        }
    }

    pub fn ctx(&self) -> AuditContext<'_> {
        AuditContext {
            areas: &self.areas,
            rates: &self.rates,
            rate_policy: &self.rate_policy,
            flag_policy: &self.flag_policy,
            display_currency: &self.display_currency,
        }
    }
}

/// Single area where every tier rents for `nightly` against a `median` price.
pub fn flat_area(name: &str, nightly: f64, median: f64) -> AreaRateTable {
    AreaRateTable::new(vec![AreaRates {
        name: name.to_string(),
        nightly: [nightly; 5],
        median_price: [median; 5],
    }])
}

/// An audited 3-bedroom Canggu leasehold priced in USD, never enriched
/// (no pipeline flags), with an upstream nightly rate.
pub fn leasehold(id: i64, price_usd: f64, lease_years: i64, nightly: f64) -> Listing {
    Listing {
        id,
        villa_name: Some(format!("Villa {id}")),
        url: Some(format!("https://example.test/villa/{id}")),
        status: Some("audited".to_string()),
        location: Some("Canggu".to_string()),
        last_price: Some(price_usd),
        bedrooms: Some(3),
        land_size: Some(300.0),
        lease_years: Some(lease_years),
        est_nightly_rate: Some(nightly),
        ..Default::default()
    }
}

pub fn approx(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected} ± {tolerance}, got {actual}"
    );
}
