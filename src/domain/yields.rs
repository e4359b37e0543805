// src/domain/yields.rs

use crate::domain::assumptions::Assumptions;
use crate::domain::listing::{Listing, Tenure};
use serde::Serialize;

pub const GROSS_YIELD_CEILING: f64 = 80.0;
pub const NET_YIELD_FLOOR: f64 = -20.0;

/// Yield figures for one listing under one assumption set.
///
/// Recomputed on every call and never stored. Percentages are unrounded.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YieldResult {
    /// Nightly rate the revenue is computed from.
    pub nightly_rate: f64,
    pub gross_revenue: f64,
    pub gross_yield: f64,
    pub net_revenue: f64,
    /// Revenue after expenses over price, before lease depreciation.
    pub cash_flow_yield: f64,
    pub lease_depreciation_pct: f64,
    /// Annual depreciation in USD.
    pub lease_depreciation_abs: f64,
    /// Cash-flow yield minus lease depreciation.
    pub net_yield: f64,
    pub is_freehold: bool,
    pub tenure: Tenure,
}

fn finite(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Computes revenue and yields from a nightly rate that already carries the
/// assumption multiplier (see `estimate_nightly_rate`).
pub fn compute_yield(
    listing: &Listing,
    nightly_rate: f64,
    price_usd: f64,
    assumptions: &Assumptions,
) -> YieldResult {
    let a = assumptions.clamped();
    let tenure = listing.tenure();

    let rate = finite(nightly_rate).max(0.0);
    let gross_revenue = rate * 365.0 * a.occupancy_pct / 100.0;
    let expenses = gross_revenue * a.expense_pct / 100.0;
    let net_revenue = gross_revenue - expenses;

    let priced = price_usd.is_finite() && price_usd > 0.0;
    if !priced {
        return YieldResult {
            nightly_rate: rate,
            gross_revenue,
            gross_yield: 0.0,
            net_revenue,
            cash_flow_yield: 0.0,
            lease_depreciation_pct: 0.0,
            lease_depreciation_abs: 0.0,
            net_yield: 0.0,
            is_freehold: tenure.is_freehold(),
            tenure,
        };
    }

    let gross_yield = finite(gross_revenue / price_usd * 100.0).clamp(0.0, GROSS_YIELD_CEILING);
    let cash_flow_yield =
        finite(net_revenue / price_usd * 100.0).clamp(0.0, GROSS_YIELD_CEILING);

    let (lease_depreciation_pct, lease_depreciation_abs) = match tenure {
        Tenure::Leasehold { years } if years > 0 => {
            let years = years as f64;
            (100.0 / years, price_usd / years)
        }
        _ => (0.0, 0.0),
    };

    let net_yield = (cash_flow_yield - lease_depreciation_pct).max(NET_YIELD_FLOOR);

    YieldResult {
        nightly_rate: rate,
        gross_revenue,
        gross_yield,
        net_revenue,
        cash_flow_yield,
        lease_depreciation_pct,
        lease_depreciation_abs,
        net_yield,
        is_freehold: tenure.is_freehold(),
        tenure,
    }
}

impl YieldResult {
    /// Whether rental cash flow pays for the annual lease depreciation.
    pub fn covers_depreciation(&self) -> bool {
        self.net_revenue >= self.lease_depreciation_abs
    }
}
