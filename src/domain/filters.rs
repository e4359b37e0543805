// src/domain/filters.rs

use crate::domain::audit::ListingAudit;
use crate::domain::flags::{FlagLevel, FlagPolicy};
use serde::Serialize;

/// Dashboard filters. `None` means "no constraint".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingFilter {
    /// Area name; "All" matches everything.
    pub location: Option<String>,
    pub max_price_usd: Option<f64>,
    pub min_net_yield: Option<f64>,
    /// Square meters.
    pub min_land_size: Option<f64>,
}

impl ListingFilter {
    pub fn matches(&self, audit: &ListingAudit) -> bool {
        let location_ok = match self.location.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(loc) if loc.eq_ignore_ascii_case("all") => true,
            Some(loc) => audit
                .location
                .as_deref()
                .is_some_and(|l| l.to_lowercase().contains(&loc.to_lowercase())),
        };

        let price_ok = self
            .max_price_usd
            .map_or(true, |max| audit.price_usd() <= max);
        let yield_ok = self
            .min_net_yield
            .map_or(true, |min| audit.yields.net_yield >= min);
        let land_ok = self
            .min_land_size
            .map_or(true, |min| audit.land_size.unwrap_or(0.0) >= min);

        location_ok && price_ok && yield_ok && land_ok
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Header badge counts.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditSummary {
    pub audited: usize,
    pub flagged: usize,
    pub danger: usize,
    /// Listings whose claimed gross ROI exceeds the alert threshold.
    pub high_roi_alerts: usize,
    pub average_net_yield: f64,
}

impl AuditSummary {
    pub fn from_audits<'a, I>(audits: I, policy: &FlagPolicy) -> Self
    where
        I: IntoIterator<Item = &'a ListingAudit>,
    {
        let mut summary = Self::default();
        let mut net_total = 0.0;

        for audit in audits {
            summary.audited += 1;
            net_total += audit.yields.net_yield;
            if audit.is_flagged() {
                summary.flagged += 1;
            }
            if audit.has_level(FlagLevel::Danger) {
                summary.danger += 1;
            }
            if audit
                .claimed_gross_yield
                .is_some_and(|c| c > policy.high_roi_alert_pct)
            {
                summary.high_roi_alerts += 1;
            }
        }

        if summary.audited > 0 {
            summary.average_net_yield = net_total / summary.audited as f64;
        }
        summary
    }
}
