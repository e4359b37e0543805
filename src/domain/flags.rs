// src/domain/flags.rs

use crate::domain::currency::{format_pct, format_usd};
use crate::domain::listing::{Listing, Tenure};
use crate::domain::rate::{RateEstimate, RateSource};
use crate::domain::yields::YieldResult;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Severity, lowest first so `Ord` ranks `Danger` highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FlagLevel {
    Assumed,
    Warning,
    Danger,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlagCode {
    ShortLease,
    BudgetVilla,
    InflatedRoi,
    OptimisticRoi,
    RatePriceGap,
    MissingData,
    RateAdjusted,
}

impl FlagCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlagCode::ShortLease => "SHORT_LEASE",
            FlagCode::BudgetVilla => "BUDGET_VILLA",
            FlagCode::InflatedRoi => "INFLATED_ROI",
            FlagCode::OptimisticRoi => "OPTIMISTIC_ROI",
            FlagCode::RatePriceGap => "RATE_PRICE_GAP",
            FlagCode::MissingData => "MISSING_DATA",
            FlagCode::RateAdjusted => "RATE_ADJUSTED",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FlagCode::ShortLease => "Short Lease",
            FlagCode::BudgetVilla => "Budget Villa",
            FlagCode::InflatedRoi => "Inflated ROI",
            FlagCode::OptimisticRoi => "Optimistic ROI",
            FlagCode::RatePriceGap => "Rate/Price Gap",
            FlagCode::MissingData => "Missing Data",
            FlagCode::RateAdjusted => "Rate Adjusted",
        }
    }
}

impl FromStr for FlagCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SHORT_LEASE" => Ok(FlagCode::ShortLease),
            "BUDGET_VILLA" => Ok(FlagCode::BudgetVilla),
            "INFLATED_ROI" => Ok(FlagCode::InflatedRoi),
            "OPTIMISTIC_ROI" => Ok(FlagCode::OptimisticRoi),
            "RATE_PRICE_GAP" => Ok(FlagCode::RatePriceGap),
            "MISSING_DATA" => Ok(FlagCode::MissingData),
            // Older pipeline runs emitted PRICE_CAP for the same condition.
            "RATE_ADJUSTED" | "PRICE_CAP" => Ok(FlagCode::RateAdjusted),
            other => Err(format!("unknown flag code '{other}'")),
        }
    }
}

/// An advisory flag shown in badges and tooltips.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Flag {
    pub code: FlagCode,
    pub level: FlagLevel,
    pub label: String,
    pub detail: String,
}

/// Thresholds for flag detection and severity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlagPolicy {
    pub short_lease_years: i64,
    pub budget_per_bedroom_usd: f64,
    /// Claimed gross ROI (percent) above local norms.
    pub optimistic_roi_pct: f64,
    pub inflated_roi_pct: f64,
    /// Claims at or above this are `danger` instead of `warning`.
    pub inflated_danger_roi_pct: f64,
    pub rate_gap_price_ceiling_usd: f64,
    /// Nightly USD per $100k of asking price that counts as disproportionate.
    pub rate_gap_nightly_per_100k: f64,
    /// Deviation (percent) from the area baseline that counts as an adjustment.
    pub rate_adjusted_pct: f64,
    /// Claimed gross ROI counted as a high-ROI alert in the summary.
    pub high_roi_alert_pct: f64,
}

impl Default for FlagPolicy {
    fn default() -> Self {
        Self {
            short_lease_years: 15,
            budget_per_bedroom_usd: 50_000.0,
            optimistic_roi_pct: 15.0,
            inflated_roi_pct: 25.0,
            inflated_danger_roi_pct: 50.0,
            rate_gap_price_ceiling_usd: 350_000.0,
            rate_gap_nightly_per_100k: 120.0,
            rate_adjusted_pct: 25.0,
            high_roi_alert_pct: 25.0,
        }
    }
}

/// Everything the flag engine looks at for one listing.
pub struct FlagInputs<'a> {
    pub listing: &'a Listing,
    pub yields: &'a YieldResult,
    pub rate: &'a RateEstimate,
    pub price_usd: f64,
    pub occupancy_pct: f64,
    /// Bedrooms used by the rate estimate (stated or assumed).
    pub bedrooms: i64,
}

/// Gross ROI the listing claims: the pipeline's `projected_roi`, else the
/// agent's nightly rate at our occupancy.
pub fn claimed_gross_yield(listing: &Listing, price_usd: f64, occupancy_pct: f64) -> Option<f64> {
    if let Some(roi) = listing.projected_roi.filter(|r| r.is_finite()) {
        return Some(roi);
    }
    let rate = listing
        .agent_claimed_rate
        .filter(|r| r.is_finite() && *r > 0.0)?;
    if price_usd <= 0.0 {
        return None;
    }
    Some(rate * 365.0 * occupancy_pct / 100.0 / price_usd * 100.0)
}

fn price_tier(price_usd: f64) -> &'static str {
    match price_usd {
        p if p < 150_000.0 => "budget",
        p if p < 350_000.0 => "mid-range",
        p if p < 750_000.0 => "upper",
        _ => "luxury",
    }
}

fn nightly_per_100k(rate: f64, price_usd: f64) -> f64 {
    if price_usd > 0.0 {
        rate / (price_usd / 100_000.0)
    } else {
        0.0
    }
}

/// Local detection for listings the pipeline never enriched. Uses the same
/// thresholds the pipeline is configured with.
pub fn detect_codes(inputs: &FlagInputs<'_>, policy: &FlagPolicy) -> Vec<FlagCode> {
    let FlagInputs {
        listing,
        yields,
        rate,
        price_usd,
        occupancy_pct,
        ..
    } = *inputs;
    let mut codes = Vec::new();

    if let Tenure::Leasehold { years } = yields.tenure {
        if years < policy.short_lease_years {
            codes.push(FlagCode::ShortLease);
        }
    }

    if let Some(bedrooms) = listing.known_bedrooms() {
        if price_usd > 0.0 && price_usd / (bedrooms as f64) < policy.budget_per_bedroom_usd {
            codes.push(FlagCode::BudgetVilla);
        }
    }

    if let Some(claimed) = claimed_gross_yield(listing, price_usd, occupancy_pct) {
        if claimed > policy.inflated_roi_pct {
            codes.push(FlagCode::InflatedRoi);
        } else if claimed > policy.optimistic_roi_pct {
            codes.push(FlagCode::OptimisticRoi);
        }
    }

    if price_usd > 0.0
        && price_usd < policy.rate_gap_price_ceiling_usd
        && nightly_per_100k(rate.nightly_rate, price_usd) > policy.rate_gap_nightly_per_100k
    {
        codes.push(FlagCode::RatePriceGap);
    }

    if listing.is_missing_lease() || listing.is_missing_bedrooms() {
        codes.push(FlagCode::MissingData);
    }

    if rate.source == RateSource::Model
        && (rate.cap_binding || rate.deviation_pct().abs() > policy.rate_adjusted_pct)
    {
        codes.push(FlagCode::RateAdjusted);
    }

    codes
}

fn short_lease_detail(y: &YieldResult) -> String {
    match y.tenure {
        Tenure::Leasehold { years } => {
            let coverage = if y.covers_depreciation() {
                "is covered"
            } else {
                "is NOT covered"
            };
            format!(
                "{years} years remaining. Lease depreciation of {}/yr ({} of price) {coverage} by estimated rental cash flow of {}/yr.",
                format_usd(y.lease_depreciation_abs),
                format_pct(y.lease_depreciation_pct),
                format_usd(y.net_revenue),
            )
        }
        Tenure::Unknown { .. } => "Lease term not disclosed. Remaining years and annual depreciation cannot be calculated; confirm the lease before relying on net yield.".to_string(),
        Tenure::Freehold => "Flagged as a short lease, but the listing reads as freehold. Verify the title certificate.".to_string(),
    }
}

fn roi_detail(claimed: Option<f64>, y: &YieldResult, norm: &str) -> String {
    match claimed {
        Some(c) => format!(
            "Listing claims {} gross{norm}. Our estimate: {} gross, {} net after expenses and lease depreciation.",
            format_pct(c),
            format_pct(y.gross_yield),
            format_pct(y.net_yield),
        ),
        None => format!(
            "Listing ROI claim exceeds what comparable villas achieve{norm}. Our estimate: {} gross, {} net.",
            format_pct(y.gross_yield),
            format_pct(y.net_yield),
        ),
    }
}

fn missing_data_detail(listing: &Listing, bedrooms: i64) -> String {
    let mut parts = Vec::new();
    if let Tenure::Unknown { stated_leasehold } = listing.tenure() {
        let what = if stated_leasehold {
            "Listing says leasehold but gives no term"
        } else {
            "Lease term not listed"
        };
        parts.push(format!(
            "{what}: treated as leasehold of unknown length, so no depreciation could be deducted and net yield may be overstated."
        ));
    }
    if listing.is_missing_bedrooms() {
        let plural = if bedrooms == 1 { "" } else { "s" };
        parts.push(format!(
            "Bedroom count not listed: rate estimated on {bedrooms} bedroom{plural} instead of guessing up, so the projection is not inflated."
        ));
    }
    if parts.is_empty() {
        "Source listing omitted data; the pipeline filled it with conservative defaults.".to_string()
    } else {
        parts.join(" ")
    }
}

fn rate_adjusted_detail(rate: &RateEstimate, max_gross_yield_pct: f64) -> String {
    let base = format_usd(rate.baseline.nightly);
    let now = format_usd(rate.nightly_rate);
    let dev = rate.deviation_pct();
    match rate.source {
        RateSource::Upstream => format!(
            "Pipeline rate of {now}/night vs area baseline of {base}/night ({dev:+.0}%)."
        ),
        RateSource::Model if rate.cap_binding => format!(
            "Area baseline {base}/night adjusted to {now}/night ({dev:+.0}%). Capped by price so gross yield cannot exceed {max_gross_yield_pct:.0}% (uncapped: {}/night).",
            format_usd(rate.adjusted_rate),
        ),
        RateSource::Model => format!(
            "Area baseline {base}/night adjusted to {now}/night ({dev:+.0}%) by the price-based adjustment (x{:.2}).",
            rate.multiplier,
        ),
    }
}

fn build_flag(
    code: FlagCode,
    inputs: &FlagInputs<'_>,
    policy: &FlagPolicy,
    max_gross_yield_pct: f64,
) -> Flag {
    let y = inputs.yields;
    let claimed = claimed_gross_yield(inputs.listing, inputs.price_usd, inputs.occupancy_pct);

    let (level, detail) = match code {
        FlagCode::ShortLease => (FlagLevel::Danger, short_lease_detail(y)),
        FlagCode::BudgetVilla => {
            let per_room = inputs.price_usd / inputs.bedrooms.max(1) as f64;
            (
                FlagLevel::Warning,
                format!(
                    "{}/bedroom is below the {} per-bedroom floor. Budget builds rarely reach area nightly rates.",
                    format_usd(per_room),
                    format_usd(policy.budget_per_bedroom_usd),
                ),
            )
        }
        FlagCode::InflatedRoi => {
            let level = match claimed {
                Some(c) if c >= policy.inflated_danger_roi_pct => FlagLevel::Danger,
                _ => FlagLevel::Warning,
            };
            (level, roi_detail(claimed, y, ""))
        }
        FlagCode::OptimisticRoi => {
            let norm = format!(
                ", above the {} local norm",
                format_pct(policy.optimistic_roi_pct)
            );
            (FlagLevel::Warning, roi_detail(claimed, y, &norm))
        }
        FlagCode::RatePriceGap => (
            FlagLevel::Warning,
            format!(
                "{}/night on a {} asking price of {} ({}/night per $100k).",
                format_usd(inputs.rate.nightly_rate),
                price_tier(inputs.price_usd),
                format_usd(inputs.price_usd),
                format_usd(nightly_per_100k(inputs.rate.nightly_rate, inputs.price_usd)),
            ),
        ),
        FlagCode::MissingData => (
            FlagLevel::Assumed,
            missing_data_detail(inputs.listing, inputs.bedrooms),
        ),
        FlagCode::RateAdjusted => (
            FlagLevel::Assumed,
            rate_adjusted_detail(inputs.rate, max_gross_yield_pct),
        ),
    };

    Flag {
        code,
        level,
        label: code.label().to_string(),
        detail,
    }
}

/// Derives the advisory flags for a listing.
///
/// Upstream codes are authoritative whenever the listing carries the field;
/// only never-enriched listings fall back to [`detect_codes`]. Flags are
/// additive and come back ordered danger, warning, assumed.
pub fn derive_flags(
    inputs: &FlagInputs<'_>,
    policy: &FlagPolicy,
    max_gross_yield_pct: f64,
) -> Vec<Flag> {
    let codes = match inputs.listing.pipeline_codes() {
        Some(raw) => raw
            .iter()
            .filter_map(|c| match c.parse::<FlagCode>() {
                Ok(code) => Some(code),
                Err(e) => {
                    tracing::debug!(listing_id = inputs.listing.id, "{e}");
                    None
                }
            })
            .collect(),
        None => detect_codes(inputs, policy),
    };

    let mut seen = Vec::with_capacity(codes.len());
    let mut flags: Vec<Flag> = codes
        .into_iter()
        .filter(|c| {
            if seen.contains(c) {
                false
            } else {
                seen.push(*c);
                true
            }
        })
        .map(|code| build_flag(code, inputs, policy, max_gross_yield_pct))
        .collect();

    flags.sort_by(|a, b| b.level.cmp(&a.level));
    flags
}

/// Highest severity present, for badge display.
pub fn top_level(flags: &[Flag]) -> Option<FlagLevel> {
    flags.iter().map(|f| f.level).max()
}
