// src/tests/audit_tests/session_tests.rs

use crate::domain::{Assumptions, ComparisonSession};
use crate::errors::AppError;
use crate::tests::utils::{leasehold, Fixture};

#[test]
fn compare_uses_session_assumptions() {
    let fx = Fixture::new();
    let listings = vec![
        leasehold(1, 300_000.0, 20, 150.0),
        leasehold(2, 450_000.0, 30, 260.0),
    ];

    let mut session = ComparisonSession::new(Assumptions::default());
    session.toggle_favorite(1);
    session.toggle_favorite(2);
    let baseline = session.compare(&listings, &fx.ctx()).unwrap();

    session.set_assumptions(Assumptions::new(1.0, 80.0, 40.0));
    let busier = session.compare(&listings, &fx.ctx()).unwrap();

    assert_eq!(baseline.len(), 2);
    for (before, after) in baseline.iter().zip(&busier) {
        assert_eq!(before.id, after.id);
        assert!(after.yields.net_yield > before.yields.net_yield);
        assert_eq!(after.assumptions.occupancy_pct, 80.0);
    }
}

#[test]
fn removed_favorite_drops_out_of_compare() {
    let fx = Fixture::new();
    let listings = vec![leasehold(1, 300_000.0, 20, 150.0)];

    let mut session = ComparisonSession::default();
    session.toggle_favorite(1);
    session.toggle_favorite(1);
    assert!(session.compare(&listings, &fx.ctx()).unwrap().is_empty());
}

#[test]
fn favorite_missing_from_listings_is_an_error() {
    let fx = Fixture::new();
    let mut session = ComparisonSession::default();
    session.toggle_favorite(42);

    let err = session.compare(&[], &fx.ctx()).unwrap_err();
    assert!(matches!(err, AppError::MissingListing(42)));
}
