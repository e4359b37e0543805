// src/domain/rate.rs

use crate::domain::area_rates::{AreaRateTable, Baseline};
use crate::domain::assumptions::Assumptions;
use crate::domain::listing::Listing;
use serde::{Deserialize, Serialize};

/// Tunable parameters of the nightly-rate model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatePolicy {
    /// Exponent applied to the price/median ratio. 0.38 maps a 2x price to
    /// roughly a 1.3x rate.
    pub dampening_exponent: f64,
    pub min_multiplier: f64,
    pub max_multiplier: f64,
    /// Highest gross yield (percent) any modeled rate may imply.
    pub max_gross_yield_pct: f64,
    /// Bedrooms assumed when a listing omits the count.
    pub assumed_bedrooms: i64,
}

impl Default for RatePolicy {
    fn default() -> Self {
        Self {
            dampening_exponent: 0.38,
            min_multiplier: 0.6,
            max_multiplier: 1.6,
            max_gross_yield_pct: 25.0,
            assumed_bedrooms: 1,
        }
    }
}

impl RatePolicy {
    /// Dampened price multiplier for a price/median ratio.
    pub fn price_multiplier(&self, ratio: f64) -> f64 {
        if !ratio.is_finite() || ratio <= 0.0 {
            return 1.0;
        }
        let raw = ratio.powf(self.dampening_exponent);
        if raw.is_finite() {
            raw.clamp(self.min_multiplier, self.max_multiplier)
        } else {
            1.0
        }
    }

    /// Highest nightly rate that keeps gross yield within
    /// `max_gross_yield_pct`. `None` when price or occupancy is unusable.
    pub fn price_cap(&self, price_usd: f64, occupancy_pct: f64) -> Option<f64> {
        if !(price_usd > 0.0 && occupancy_pct > 0.0) {
            return None;
        }
        let cap = (price_usd * self.max_gross_yield_pct / 100.0)
            / (365.0 * occupancy_pct / 100.0);
        cap.is_finite().then_some(cap)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RateSource {
    /// Enrichment pipeline value, used as-is.
    Upstream,
    /// Area table, price adjustment and cap.
    Model,
}

/// Outcome of the nightly-rate estimate, with enough detail to explain it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateEstimate {
    /// Unrounded; round only for display.
    pub nightly_rate: f64,
    pub source: RateSource,
    pub baseline: Baseline,
    /// Price adjustment multiplier (1.0 for upstream rates).
    pub multiplier: f64,
    /// Assumption multiplier already folded into the rates above.
    pub nightly_multiplier: f64,
    /// Rate after the price adjustment and assumption multiplier, before the cap.
    pub adjusted_rate: f64,
    pub cap: Option<f64>,
    pub cap_binding: bool,
    /// True when the bedroom count was assumed.
    pub assumed_bedrooms: bool,
}

impl RateEstimate {
    /// Relative change of the final rate against the naive area baseline, in
    /// percent. The assumption multiplier scales both sides.
    pub fn deviation_pct(&self) -> f64 {
        let reference = self.baseline.nightly * self.nightly_multiplier;
        if reference > 0.0 {
            (self.nightly_rate - reference) / reference * 100.0
        } else {
            0.0
        }
    }

    pub fn display_rate(&self) -> f64 {
        self.nightly_rate.round()
    }
}

/// Estimates the nightly rate for a listing under one assumption set.
///
/// The assumption multiplier is applied before the cap, and the cap uses the
/// same occupancy the yields are computed at, so a modeled rate never implies
/// more than `max_gross_yield_pct`. Upstream rates are scaled but not capped.
pub fn estimate_nightly_rate(
    listing: &Listing,
    areas: &AreaRateTable,
    price_usd: f64,
    assumptions: &Assumptions,
    policy: &RatePolicy,
) -> RateEstimate {
    let assumptions = assumptions.clamped();
    let nightly_multiplier = assumptions.nightly_multiplier;
    let bedrooms = listing
        .known_bedrooms()
        .unwrap_or(policy.assumed_bedrooms);
    let baseline = areas.baseline(listing.location.as_deref(), bedrooms);

    if let Some(rate) = listing.upstream_nightly_rate() {
        let scaled = rate * nightly_multiplier;
        return RateEstimate {
            nightly_rate: scaled,
            source: RateSource::Upstream,
            baseline,
            multiplier: 1.0,
            nightly_multiplier,
            adjusted_rate: scaled,
            cap: None,
            cap_binding: false,
            assumed_bedrooms: listing.is_missing_bedrooms(),
        };
    }

    let ratio = if baseline.median_price > 0.0 {
        price_usd / baseline.median_price
    } else {
        f64::NAN
    };
    let multiplier = policy.price_multiplier(ratio);
    let adjusted_rate = baseline.nightly * multiplier * nightly_multiplier;

    let cap = policy.price_cap(price_usd, assumptions.occupancy_pct);
    let cap_binding = cap.is_some_and(|c| adjusted_rate > c);
    let nightly_rate = match cap {
        Some(c) if cap_binding => c,
        _ => adjusted_rate,
    };

    if cap_binding {
        tracing::debug!(
            listing_id = listing.id,
            adjusted_rate,
            nightly_rate,
            "price cap binding"
        );
    }

    RateEstimate {
        nightly_rate,
        source: RateSource::Model,
        baseline,
        multiplier,
        nightly_multiplier,
        adjusted_rate,
        cap,
        cap_binding,
        assumed_bedrooms: listing.is_missing_bedrooms(),
    }
}
