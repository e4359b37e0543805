// src/tests/audit_tests/report_tests.rs

use crate::domain::{Assumptions, Listing, ListingFilter};
use crate::report::{build_report, write_json, write_xlsx, AuditReport};
use crate::tests::utils::{approx, leasehold, Fixture};
use std::fs;

fn listings() -> Vec<Listing> {
    let inflated = Listing {
        projected_roi: Some(30.0),
        ..leasehold(3, 300_000.0, 20, 150.0)
    };
    let draft = Listing {
        status: Some("draft".to_string()),
        ..leasehold(4, 300_000.0, 20, 150.0)
    };
    vec![
        leasehold(1, 300_000.0, 20, 150.0),
        leasehold(2, 300_000.0, 10, 150.0),
        inflated,
        draft,
    ]
}

fn report(filter: &ListingFilter, compare: &[i64]) -> AuditReport {
    let fx = Fixture::new();
    build_report(&listings(), &fx.ctx(), Assumptions::default(), filter, compare).unwrap()
}

#[test]
fn report_skips_unaudited_rows_and_sorts_by_net_yield() {
    let report = report(&ListingFilter::default(), &[]);

    let ids: Vec<i64> = report.listings.iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![1, 3, 2]);
    assert!(report.comparison.is_empty());
}

#[test]
fn summary_counts_flags_and_alerts() {
    let s = report(&ListingFilter::default(), &[]).summary;

    assert_eq!(s.audited, 3);
    assert_eq!(s.flagged, 2);
    assert_eq!(s.danger, 1);
    assert_eq!(s.high_roi_alerts, 1);
    approx(s.average_net_yield, (1.351 * 2.0 - 3.649) / 3.0, 1e-9);
}

#[test]
fn filters_narrow_the_table() {
    let positive = ListingFilter {
        min_net_yield: Some(0.0),
        ..Default::default()
    };
    let ids: Vec<i64> = report(&positive, &[]).listings.iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![1, 3]);

    let everywhere = ListingFilter {
        location: Some("All".to_string()),
        ..Default::default()
    };
    assert_eq!(report(&everywhere, &[]).listings.len(), 3);

    for filter in [
        ListingFilter {
            location: Some("seminyak".to_string()),
            ..Default::default()
        },
        ListingFilter {
            max_price_usd: Some(250_000.0),
            ..Default::default()
        },
        ListingFilter {
            min_land_size: Some(400.0),
            ..Default::default()
        },
    ] {
        let r = report(&filter, &[]);
        assert!(r.listings.is_empty(), "{filter:?}");
    }
}

#[test]
fn summary_ignores_filters() {
    let unfiltered = report(&ListingFilter::default(), &[]).summary;
    let narrowed = ListingFilter {
        min_net_yield: Some(0.0),
        max_price_usd: Some(250_000.0),
        ..Default::default()
    };
    let r = report(&narrowed, &[]);

    assert!(r.listings.is_empty());
    assert_eq!(r.summary, unfiltered);
    assert_eq!(r.summary.audited, 3);
    assert_eq!(r.summary.high_roi_alerts, 1);
}

#[test]
fn compare_panel_is_ranked() {
    let report = report(&ListingFilter::default(), &[2, 1]);
    let ids: Vec<i64> = report.comparison.iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![1, 2]);
}

#[test]
fn unknown_compare_id_is_an_error() {
    let fx = Fixture::new();
    let err = build_report(
        &listings(),
        &fx.ctx(),
        Assumptions::default(),
        &ListingFilter::default(),
        &[1, 99],
    )
    .unwrap_err();
    assert_eq!(err.to_string(), "Listing 99 not found");
}

#[test]
fn json_report_uses_flat_camel_case_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("audit.json");
    write_json(&report(&ListingFilter::default(), &[]), &path).unwrap();

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    let first = &json["listings"][0];

    assert!(json["generatedAt"].is_string());
    assert_eq!(json["summary"]["highRoiAlerts"], 1);
    assert_eq!(first["id"], 1);
    assert!((first["netYield"].as_f64().unwrap() - 1.351).abs() < 1e-9);
    assert_eq!(first["tenure"]["kind"], "leasehold");
    assert_eq!(first["tenure"]["years"], 20);
    assert_eq!(first["rateEstimate"]["source"], "upstream");
    assert_eq!(first["displayPrice"], "$300,000");

    let danger = &json["listings"][2]["flags"][0];
    assert_eq!(danger["code"], "SHORT_LEASE");
    assert_eq!(danger["level"], "danger");
}

#[test]
fn xlsx_report_is_a_workbook() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("audit.xlsx");
    write_xlsx(&report(&ListingFilter::default(), &[]), &path).unwrap();

    let bytes = fs::read(&path).unwrap();
    assert!(bytes.starts_with(b"PK"));
}
