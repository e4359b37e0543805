// src/domain/assumptions.rs

use serde::{Deserialize, Serialize};

pub const MULTIPLIER_RANGE: (f64, f64) = (0.5, 2.0);
pub const OCCUPANCY_RANGE: (f64, f64) = (20.0, 95.0);
pub const EXPENSE_RANGE: (f64, f64) = (20.0, 60.0);

/// User-adjustable inputs to the yield model. The main table uses the
/// defaults; the compare panel passes slider values. Both go through the
/// same calculation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Assumptions {
    /// Scales the estimated nightly rate.
    pub nightly_multiplier: f64,
    pub occupancy_pct: f64,
    /// Share of gross revenue lost to management, maintenance, OTA fees and tax.
    pub expense_pct: f64,
}

impl Default for Assumptions {
    fn default() -> Self {
        Self {
            nightly_multiplier: 1.0,
            occupancy_pct: 58.0,
            expense_pct: 40.0,
        }
    }
}

fn clamp_or(value: f64, (lo, hi): (f64, f64), fallback: f64) -> f64 {
    if value.is_finite() {
        value.clamp(lo, hi)
    } else {
        fallback
    }
}

impl Assumptions {
    pub fn new(nightly_multiplier: f64, occupancy_pct: f64, expense_pct: f64) -> Self {
        Self {
            nightly_multiplier,
            occupancy_pct,
            expense_pct,
        }
        .clamped()
    }

    /// Pins every field into its slider range; NaN falls back to the default.
    pub fn clamped(self) -> Self {
        let d = Self::default();
        Self {
            nightly_multiplier: clamp_or(
                self.nightly_multiplier,
                MULTIPLIER_RANGE,
                d.nightly_multiplier,
            ),
            occupancy_pct: clamp_or(self.occupancy_pct, OCCUPANCY_RANGE, d.occupancy_pct),
            expense_pct: clamp_or(self.expense_pct, EXPENSE_RANGE, d.expense_pct),
        }
    }

    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}
