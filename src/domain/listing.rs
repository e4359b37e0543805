// src/domain/listing.rs

use serde::{Deserialize, Serialize};

/// Lease term the pipeline uses to mark freehold titles.
pub const FREEHOLD_SENTINEL: i64 = 999;

const FREEHOLD_MARKERS: [&str; 2] = ["freehold", "hak milik"];
const LEASEHOLD_MARKERS: [&str; 2] = ["leasehold", "hak sewa"];

/// A villa listing as exported from the `listings_tracker` table.
///
/// Every column except `id` is optional: scraped rows are dirty and the
/// audit falls back to named defaults instead of rejecting them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: i64,
    #[serde(default, alias = "villaName")]
    pub villa_name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub location: Option<String>,

    // Price
    #[serde(default, alias = "priceDescription")]
    pub price_description: Option<String>,
    #[serde(default, alias = "lastPrice")]
    pub last_price: Option<f64>,

    // Specs
    #[serde(default)]
    pub bedrooms: Option<i64>,
    #[serde(default)]
    pub bathrooms: Option<i64>,
    #[serde(default, alias = "landSize")]
    pub land_size: Option<f64>,
    #[serde(default, alias = "buildingSize")]
    pub building_size: Option<f64>,

    // Tenure
    #[serde(default, alias = "leaseYears")]
    pub lease_years: Option<i64>,
    #[serde(default, alias = "featuresText")]
    pub features: Option<String>,

    // Upstream enrichment
    #[serde(default, alias = "estimatedNightlyRate")]
    pub est_nightly_rate: Option<f64>,
    /// Carried through for reference only. Rates and yields use the
    /// assumption occupancy so the price cap holds for every row.
    #[serde(default, alias = "estimatedOccupancy")]
    pub est_occupancy: Option<f64>,
    #[serde(default, alias = "agentClaimedRate")]
    pub agent_claimed_rate: Option<f64>,
    #[serde(default, alias = "projectedRoi")]
    pub projected_roi: Option<f64>,
    #[serde(default, alias = "pipelineFlags")]
    pub flags: Option<String>,
    #[serde(default, alias = "rateFactors")]
    pub rate_factors: Option<String>,
}

/// Ownership model of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Tenure {
    Freehold,
    Leasehold { years: i64 },
    /// No usable lease term. Treated as leasehold, but nothing can be
    /// depreciated. `stated_leasehold` records whether the features text said so.
    Unknown { stated_leasehold: bool },
}

impl Tenure {
    pub fn is_freehold(&self) -> bool {
        matches!(self, Tenure::Freehold)
    }

    pub fn label(&self) -> String {
        match self {
            Tenure::Freehold => "Freehold".to_string(),
            Tenure::Leasehold { years } => format!("{years} Yrs Lease"),
            Tenure::Unknown { .. } => "Lease Unknown".to_string(),
        }
    }
}

impl Listing {
    /// Derives tenure from `lease_years` and the features text.
    ///
    /// Freehold wins when either signal says so; a known positive term is a
    /// leasehold; anything else is unknown tenure.
    pub fn tenure(&self) -> Tenure {
        let features = self
            .features
            .as_deref()
            .unwrap_or_default()
            .to_lowercase();
        let mentions = |markers: &[&str]| markers.iter().any(|m| features.contains(m));

        match self.lease_years {
            Some(FREEHOLD_SENTINEL) => Tenure::Freehold,
            _ if mentions(&FREEHOLD_MARKERS) => Tenure::Freehold,
            Some(years) if years > 0 => Tenure::Leasehold { years },
            _ => Tenure::Unknown {
                stated_leasehold: mentions(&LEASEHOLD_MARKERS),
            },
        }
    }

    /// Bedroom count if the listing actually states one.
    pub fn known_bedrooms(&self) -> Option<i64> {
        self.bedrooms.filter(|b| *b > 0)
    }

    pub fn is_missing_lease(&self) -> bool {
        matches!(self.tenure(), Tenure::Unknown { .. })
    }

    pub fn is_missing_bedrooms(&self) -> bool {
        self.known_bedrooms().is_none()
    }

    /// Only rows the pipeline marked `audited` are shown.
    pub fn is_audited(&self) -> bool {
        self.status
            .as_deref()
            .is_some_and(|s| s.eq_ignore_ascii_case("audited"))
    }

    /// Upstream nightly rate, when the enrichment pipeline produced one.
    pub fn upstream_nightly_rate(&self) -> Option<f64> {
        self.est_nightly_rate.filter(|r| r.is_finite() && *r > 0.0)
    }

    /// Upstream flag codes, or `None` when the listing was never enriched.
    /// An empty string means the pipeline ran and found nothing.
    pub fn pipeline_codes(&self) -> Option<Vec<String>> {
        self.flags.as_ref().map(|raw| {
            raw.split(',')
                .map(|c| c.trim().to_ascii_uppercase())
                .filter(|c| !c.is_empty())
                .collect()
        })
    }

    /// Rate calculation breakdown for the ROI tooltip.
    pub fn rate_factors(&self) -> Vec<String> {
        self.rate_factors
            .as_deref()
            .map(|s| {
                s.split(" | ")
                    .map(str::trim)
                    .filter(|f| !f.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn display_name(&self) -> String {
        self.villa_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("Listing #{}", self.id))
    }
}
