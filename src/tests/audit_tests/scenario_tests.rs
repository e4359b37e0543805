// src/tests/audit_tests/scenario_tests.rs

use crate::domain::flags::{FlagCode, FlagLevel};
use crate::domain::rate::RateSource;
use crate::domain::{audit_listing, Assumptions, Listing};
use crate::tests::utils::{approx, flat_area, leasehold, Fixture};

#[test]
fn twenty_year_lease_at_150_a_night() {
    let fx = Fixture::new();
    let listing = leasehold(1, 300_000.0, 20, 150.0);

    let audit = audit_listing(&listing, &fx.ctx(), &Assumptions::default());
    let y = &audit.yields;

    approx(y.gross_revenue, 31_755.0, 1e-6);
    approx(y.net_revenue, 19_053.0, 1e-6);
    approx(y.cash_flow_yield, 6.351, 1e-9);
    approx(y.lease_depreciation_abs, 15_000.0, 1e-9);
    approx(y.lease_depreciation_pct, 5.0, 1e-9);
    approx(y.net_yield, 1.351, 1e-9);
    assert_eq!(audit.rate_estimate.source, RateSource::Upstream);
    assert!(audit.flags.is_empty(), "unexpected flags: {:?}", audit.flags);
}

#[test]
fn ten_year_lease_is_a_danger() {
    let fx = Fixture::new();
    let listing = leasehold(2, 300_000.0, 10, 150.0);

    let audit = audit_listing(&listing, &fx.ctx(), &Assumptions::default());

    approx(audit.yields.lease_depreciation_pct, 10.0, 1e-9);
    approx(audit.yields.net_yield, -3.649, 1e-9);

    let short = audit
        .flags
        .iter()
        .find(|f| f.code == FlagCode::ShortLease)
        .expect("short lease flag");
    assert_eq!(short.level, FlagLevel::Danger);
    assert!(short.detail.contains("10 years remaining"), "{}", short.detail);
    assert!(short.detail.contains("$30,000/yr"), "{}", short.detail);
    assert!(short.detail.contains("is NOT covered"), "{}", short.detail);
    assert_eq!(audit.top_level, Some(FlagLevel::Danger));
}

#[test]
fn cheap_villa_rate_is_capped_by_price() {
    let fx = Fixture::with_areas(flat_area("Testarea", 200.0, 100_000.0));
    let listing = Listing {
        id: 3,
        status: Some("audited".to_string()),
        location: Some("Testarea".to_string()),
        last_price: Some(100_000.0),
        bedrooms: Some(2),
        lease_years: Some(25),
        ..Default::default()
    };

    let audit = audit_listing(&listing, &fx.ctx(), &Assumptions::default());
    let rate = &audit.rate_estimate;

    approx(rate.adjusted_rate, 200.0, 1e-9);
    assert!(rate.cap_binding);
    assert_eq!(Some(rate.nightly_rate), rate.cap);
    approx(rate.nightly_rate, 118.09, 0.01);
    assert_eq!(rate.display_rate(), 118.0);
    approx(audit.yields.gross_yield, 25.0, 1e-9);

    let codes: Vec<FlagCode> = audit.flags.iter().map(|f| f.code).collect();
    assert_eq!(codes, vec![FlagCode::RateAdjusted]);
    assert!(audit.flags[0].detail.contains("Capped by price"));
}

#[test]
fn pipeline_flags_replace_local_detection() {
    let fx = Fixture::new();

    // Enriched with nothing found: a ten-year lease stays unflagged.
    let mut clean = leasehold(4, 300_000.0, 10, 150.0);
    clean.flags = Some(String::new());
    let audit = audit_listing(&clean, &fx.ctx(), &Assumptions::default());
    assert!(audit.flags.is_empty());

    let mut legacy = leasehold(5, 300_000.0, 20, 150.0);
    legacy.flags = Some("price_cap, BUDGET_VILLA,BOGUS".to_string());
    let audit = audit_listing(&legacy, &fx.ctx(), &Assumptions::default());
    let codes: Vec<FlagCode> = audit.flags.iter().map(|f| f.code).collect();
    assert_eq!(codes, vec![FlagCode::BudgetVilla, FlagCode::RateAdjusted]);
}

#[test]
fn every_flag_survives_a_danger() {
    let fx = Fixture::new();
    let listing = Listing {
        id: 6,
        status: Some("audited".to_string()),
        location: Some("Canggu".to_string()),
        last_price: Some(90_000.0),
        bedrooms: Some(3),
        lease_years: Some(8),
        projected_roi: Some(60.0),
        est_nightly_rate: Some(180.0),
        ..Default::default()
    };

    let audit = audit_listing(&listing, &fx.ctx(), &Assumptions::default());
    let codes: Vec<FlagCode> = audit.flags.iter().map(|f| f.code).collect();

    assert_eq!(
        codes,
        vec![
            FlagCode::ShortLease,
            FlagCode::InflatedRoi,
            FlagCode::BudgetVilla,
            FlagCode::RatePriceGap,
        ]
    );
    assert_eq!(audit.flags[1].level, FlagLevel::Danger);
    assert!(audit.flags[2..].iter().all(|f| f.level == FlagLevel::Warning));
}

#[test]
fn missing_bedrooms_are_assumed_low() {
    let fx = Fixture::new();
    let listing = Listing {
        id: 7,
        status: Some("audited".to_string()),
        location: Some("Canggu".to_string()),
        price_description: Some("USD 250,000".to_string()),
        features: Some("Leasehold, pool".to_string()),
        ..Default::default()
    };

    let audit = audit_listing(&listing, &fx.ctx(), &Assumptions::default());

    assert!(audit.rate_estimate.assumed_bedrooms);
    assert_eq!(
        audit.rate_estimate.baseline.nightly,
        fx.areas.baseline(Some("Canggu"), 1).nightly
    );
    let missing = audit
        .flags
        .iter()
        .find(|f| f.code == FlagCode::MissingData)
        .expect("missing data flag");
    assert_eq!(missing.level, FlagLevel::Assumed);
    assert_eq!(audit.yields.lease_depreciation_pct, 0.0);
}
