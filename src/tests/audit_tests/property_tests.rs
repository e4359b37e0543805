// src/tests/audit_tests/property_tests.rs

use crate::domain::rate::estimate_nightly_rate;
use crate::domain::yields::{compute_yield, GROSS_YIELD_CEILING};
use crate::domain::{audit_listing, Assumptions, Listing};
use crate::tests::utils::{approx, flat_area, leasehold, Fixture};

#[test]
fn auditing_twice_gives_the_same_result() {
    let fx = Fixture::new();
    let listing = leasehold(1, 420_000.0, 27, 210.0);
    let assumptions = Assumptions::new(1.2, 65.0, 35.0);

    let first = audit_listing(&listing, &fx.ctx(), &assumptions);
    let second = audit_listing(&listing, &fx.ctx(), &assumptions);
    assert_eq!(first, second);
}

#[test]
fn freehold_never_depreciates() {
    let fx = Fixture::new();
    let by_sentinel = leasehold(1, 500_000.0, 999, 300.0);
    let by_text = Listing {
        lease_years: Some(12),
        features: Some("Title: Hak Milik (SHM)".to_string()),
        ..leasehold(2, 500_000.0, 12, 300.0)
    };

    for listing in [by_sentinel, by_text] {
        for assumptions in [Assumptions::default(), Assumptions::new(0.5, 20.0, 60.0)] {
            let y = audit_listing(&listing, &fx.ctx(), &assumptions).yields;
            assert!(y.is_freehold);
            assert_eq!(y.lease_depreciation_pct, 0.0);
            assert_eq!(y.lease_depreciation_abs, 0.0);
            assert_eq!(y.net_yield, y.cash_flow_yield);
        }
    }
}

#[test]
fn one_dollar_villa_hits_the_gross_ceiling() {
    let fx = Fixture::new();
    let listing = leasehold(1, 1.0, 30, 10_000.0);

    let audit = audit_listing(&listing, &fx.ctx(), &Assumptions::default());
    assert_eq!(audit.yields.gross_yield, GROSS_YIELD_CEILING);
    assert_eq!(audit.yields.gross_yield, 80.0);
}

#[test]
fn modeled_rate_never_exceeds_the_cap() {
    let fx = Fixture::new();
    let policy = &fx.rate_policy;

    for (location, bedrooms, price) in [
        (Some("Nowhere Regency"), 5, 60_000.0),
        (Some("Seminyak"), 4, 90_000.0),
        (Some("Ubud"), 2, 45_000.0),
        (None, 3, 70_000.0),
    ] {
        let listing = Listing {
            id: 1,
            location: location.map(str::to_string),
            bedrooms: Some(bedrooms),
            ..Default::default()
        };
        let rate = estimate_nightly_rate(
            &listing,
            &fx.areas,
            price,
            &Assumptions::default(),
            policy,
        );
        let cap = policy.price_cap(price, 58.0).unwrap();

        assert!(rate.adjusted_rate > cap, "{location:?} should bind");
        assert!(rate.cap_binding);
        assert_eq!(rate.nightly_rate, cap);
    }
}

#[test]
fn audited_gross_yield_respects_the_cap() {
    // $200/night at a $100k median: uncapped this is ~42% gross.
    let fx = Fixture::with_areas(flat_area("Testarea", 200.0, 100_000.0));
    let max = fx.rate_policy.max_gross_yield_pct;

    for est_occupancy in [None, Some(0.30), Some(0.9), Some(45.0)] {
        for assumptions in [
            Assumptions::default(),
            Assumptions::new(2.0, 58.0, 40.0),
            Assumptions::new(2.0, 20.0, 40.0),
            Assumptions::new(0.5, 95.0, 60.0),
            Assumptions::new(1.6, 80.0, 20.0),
        ] {
            let listing = Listing {
                id: 1,
                status: Some("audited".to_string()),
                location: Some("Testarea".to_string()),
                last_price: Some(100_000.0),
                bedrooms: Some(2),
                lease_years: Some(25),
                est_occupancy,
                ..Default::default()
            };

            let audit = audit_listing(&listing, &fx.ctx(), &assumptions);
            assert!(audit.rate_estimate.cap_binding);
            assert!(
                audit.yields.gross_yield <= max + 1e-9,
                "{est_occupancy:?} {assumptions:?}: {}",
                audit.yields.gross_yield
            );
            assert_eq!(audit.yields.nightly_rate, audit.rate_estimate.nightly_rate);
        }
    }
}

#[test]
fn upstream_rates_are_scaled_but_not_capped() {
    let fx = Fixture::new();
    let listing = leasehold(1, 100_000.0, 25, 200.0);

    let audit = audit_listing(&listing, &fx.ctx(), &Assumptions::new(2.0, 58.0, 40.0));
    assert_eq!(audit.yields.nightly_rate, 400.0);
    assert!(audit.yields.gross_yield > fx.rate_policy.max_gross_yield_pct);
}

#[test]
fn higher_expenses_always_lower_net_yield() {
    let listing = leasehold(1, 300_000.0, 20, 150.0);

    let nets: Vec<f64> = (20..=60)
        .step_by(5)
        .map(|expense| {
            let a = Assumptions::new(1.0, 58.0, expense as f64);
            compute_yield(&listing, 150.0, 300_000.0, &a).net_yield
        })
        .collect();

    for pair in nets.windows(2) {
        assert!(pair[1] < pair[0], "{nets:?}");
    }
}

#[test]
fn zero_price_gives_zero_yields() {
    let fx = Fixture::new();
    let listing = Listing {
        id: 9,
        status: Some("audited".to_string()),
        price_description: Some("Price on request".to_string()),
        ..Default::default()
    };

    let audit = audit_listing(&listing, &fx.ctx(), &Assumptions::default());
    assert_eq!(audit.price_usd(), 0.0);
    assert_eq!(audit.yields.gross_yield, 0.0);
    assert_eq!(audit.yields.net_yield, 0.0);
    assert_eq!(audit.claimed_gross_yield, None);
}

#[test]
fn idr_listing_is_displayed_in_rupiah() {
    let mut fx = Fixture::new();
    fx.display_currency = "IDR".to_string();
    let listing = Listing {
        id: 3,
        status: Some("audited".to_string()),
        last_price: Some(5_034_600_000.0),
        ..Default::default()
    };

    let audit = audit_listing(&listing, &fx.ctx(), &Assumptions::default());
    assert_eq!(audit.price.currency, "IDR");
    approx(audit.price_usd(), 300_000.0, 1e-6);
    assert_eq!(audit.display_price, "Rp 5,034,600,000");
}
