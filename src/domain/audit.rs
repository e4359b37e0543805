// src/domain/audit.rs

use crate::domain::area_rates::AreaRateTable;
use crate::domain::assumptions::Assumptions;
use crate::domain::currency::{display_price, CurrencyRates};
use crate::domain::flags::{
    claimed_gross_yield, derive_flags, top_level, Flag, FlagInputs, FlagLevel, FlagPolicy,
};
use crate::domain::listing::Listing;
use crate::domain::price::{normalize_price, PriceQuote};
use crate::domain::rate::{estimate_nightly_rate, RateEstimate, RatePolicy};
use crate::domain::yields::{compute_yield, YieldResult};
use serde::Serialize;

/// Immutable reference data and policy shared by every audit in a run.
#[derive(Debug, Clone, Copy)]
pub struct AuditContext<'a> {
    pub areas: &'a AreaRateTable,
    pub rates: &'a CurrencyRates,
    pub rate_policy: &'a RatePolicy,
    pub flag_policy: &'a FlagPolicy,
    /// Currency prices are displayed in.
    pub display_currency: &'a str,
}

/// One audited listing, flattened for table rows, map popups and exports.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingAudit {
    pub id: i64,
    pub villa_name: String,
    pub location: Option<String>,
    pub url: Option<String>,
    pub bedrooms: Option<i64>,
    pub land_size: Option<f64>,

    pub price: PriceQuote,
    pub display_price: String,

    #[serde(flatten)]
    pub yields: YieldResult,
    pub rate_estimate: RateEstimate,
    pub claimed_gross_yield: Option<f64>,
    pub assumptions: Assumptions,

    pub flags: Vec<Flag>,
    pub top_level: Option<FlagLevel>,
    pub rate_factors: Vec<String>,
}

impl ListingAudit {
    pub fn price_usd(&self) -> f64 {
        self.price.amount_usd
    }

    pub fn is_flagged(&self) -> bool {
        !self.flags.is_empty()
    }

    pub fn has_level(&self, level: FlagLevel) -> bool {
        self.flags.iter().any(|f| f.level == level)
    }
}

/// Runs price normalization, rate estimation, yield calculation and flag
/// derivation for one listing under one assumption set.
pub fn audit_listing(
    listing: &Listing,
    ctx: &AuditContext<'_>,
    assumptions: &Assumptions,
) -> ListingAudit {
    let assumptions = assumptions.clamped();
    let price = normalize_price(listing, ctx.rates);
    let price_usd = price.amount_usd;

    let rate = estimate_nightly_rate(
        listing,
        ctx.areas,
        price_usd,
        &assumptions,
        ctx.rate_policy,
    );
    let yields = compute_yield(listing, rate.nightly_rate, price_usd, &assumptions);

    let bedrooms = listing
        .known_bedrooms()
        .unwrap_or(ctx.rate_policy.assumed_bedrooms);
    let inputs = FlagInputs {
        listing,
        yields: &yields,
        rate: &rate,
        price_usd,
        occupancy_pct: assumptions.occupancy_pct,
        bedrooms,
    };
    let flags = derive_flags(
        &inputs,
        ctx.flag_policy,
        ctx.rate_policy.max_gross_yield_pct,
    );

    ListingAudit {
        id: listing.id,
        villa_name: listing.display_name(),
        location: listing.location.clone(),
        url: listing.url.clone(),
        bedrooms: listing.bedrooms,
        land_size: listing.land_size,
        display_price: display_price(price_usd, ctx.display_currency, ctx.rates),
        claimed_gross_yield: claimed_gross_yield(listing, price_usd, assumptions.occupancy_pct),
        top_level: top_level(&flags),
        rate_factors: listing.rate_factors(),
        price,
        yields,
        rate_estimate: rate,
        assumptions,
        flags,
    }
}

/// Audits every listing the pipeline marked `audited` with a price input.
pub fn audit_all(
    listings: &[Listing],
    ctx: &AuditContext<'_>,
    assumptions: &Assumptions,
) -> Vec<ListingAudit> {
    listings
        .iter()
        .filter(|l| {
            let keep = l.is_audited() && has_price_input(l);
            if !keep {
                tracing::debug!(listing_id = l.id, status = ?l.status, "skipping listing");
            }
            keep
        })
        .map(|l| audit_listing(l, ctx, assumptions))
        .collect()
}

fn has_price_input(listing: &Listing) -> bool {
    listing.last_price.is_some_and(|p| p > 0.0)
        || listing
            .price_description
            .as_deref()
            .is_some_and(|d| !d.trim().is_empty())
}
