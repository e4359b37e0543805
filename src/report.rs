// report.rs
use crate::cli::AuditArgs;
use crate::config::Config;
use crate::domain::currency::{format_pct, format_usd};
use crate::domain::{
    audit_all, AreaRateTable, Assumptions, AuditContext, AuditSummary, ComparisonSession,
    FlagLevel, Listing, ListingAudit, ListingFilter,
};
use crate::errors::{AppError, AppResult};
use crate::loader::{load_listings, load_rates};
use crate::spreadsheets::export_audits_xlsx;
use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Everything one audit run produces.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditReport {
    pub generated_at: DateTime<Utc>,
    pub display_currency: String,
    pub assumptions: Assumptions,
    /// Counts over every audited listing, before filters.
    pub summary: AuditSummary,
    /// Listings that passed the filters, best net yield first.
    pub listings: Vec<ListingAudit>,
    /// Compare panel, empty unless ids were requested.
    pub comparison: Vec<ListingAudit>,
}

/// Config assumptions with command-line overrides applied, clamped.
pub fn assumptions_from(args: &AuditArgs, config: &Config) -> Assumptions {
    let base = config.assumptions;
    Assumptions::new(
        args.multiplier.unwrap_or(base.nightly_multiplier),
        args.occupancy.unwrap_or(base.occupancy_pct),
        args.expenses.unwrap_or(base.expense_pct),
    )
}

pub fn filter_from(args: &AuditArgs) -> ListingFilter {
    ListingFilter {
        location: args.location.clone(),
        max_price_usd: args.max_price,
        min_net_yield: args.min_yield,
        min_land_size: args.min_land,
    }
}

/// Audits, summarizes and filters. The summary badges count every audited
/// listing; filters only narrow the table. The compare panel runs the same
/// audit under the session's copy of the assumptions.
pub fn build_report(
    listings: &[Listing],
    ctx: &AuditContext<'_>,
    assumptions: Assumptions,
    filter: &ListingFilter,
    compare_ids: &[i64],
) -> AppResult<AuditReport> {
    let audits = audit_all(listings, ctx, &assumptions);
    let summary = AuditSummary::from_audits(&audits, ctx.flag_policy);

    let mut visible: Vec<ListingAudit> = audits
        .into_iter()
        .filter(|a| filter.matches(a))
        .collect();
    visible.sort_by(|a, b| b.yields.net_yield.total_cmp(&a.yields.net_yield));

    let mut session = ComparisonSession::new(assumptions);
    for id in compare_ids {
        if !session.is_favorite(*id) {
            session.toggle_favorite(*id);
        }
    }
    let comparison = session.compare(listings, ctx)?;

    Ok(AuditReport {
        generated_at: Utc::now(),
        display_currency: ctx.display_currency.to_string(),
        assumptions,
        summary,
        listings: visible,
        comparison,
    })
}

pub fn write_json(report: &AuditReport, path: &Path) -> AppResult<()> {
    let json = serde_json::to_string_pretty(report)
        .map_err(|e| AppError::ReportError(format!("Failed to serialize report: {e}")))?;
    fs::write(path, json).map_err(|e| AppError::io(path, e))
}

pub fn write_xlsx(report: &AuditReport, path: &Path) -> AppResult<()> {
    let rows: Vec<&ListingAudit> = report.listings.iter().collect();
    let buffer = export_audits_xlsx(&rows)?;
    fs::write(path, buffer).map_err(|e| AppError::io(path, e))
}

fn badge(audit: &ListingAudit) -> &'static str {
    match audit.top_level {
        Some(FlagLevel::Danger) => "DANGER",
        Some(FlagLevel::Warning) => "WARN",
        Some(FlagLevel::Assumed) => "ASSUMED",
        None => "",
    }
}

fn print_rows(audits: &[ListingAudit]) {
    println!(
        "  {:<6} {:<28} {:<14} {:>16} {:>9} {:>8} {:>8} {:<14} {}",
        "ID", "Villa", "Location", "Price", "Nightly", "Gross", "Net", "Tenure", "Flags"
    );
    for a in audits {
        let name: String = a.villa_name.chars().take(28).collect();
        let location: String = a
            .location
            .as_deref()
            .unwrap_or("-")
            .chars()
            .take(14)
            .collect();
        println!(
            "  {:<6} {:<28} {:<14} {:>16} {:>9} {:>8} {:>8} {:<14} {} {}",
            a.id,
            name,
            location,
            a.display_price,
            format_usd(a.rate_estimate.display_rate()),
            format_pct(a.yields.gross_yield),
            format_pct(a.yields.net_yield),
            a.yields.tenure.label(),
            badge(a),
            a.flags
                .iter()
                .map(|f| f.code.as_str())
                .collect::<Vec<_>>()
                .join(","),
        );
    }
}

pub fn print_report(report: &AuditReport) {
    let s = &report.summary;
    println!();
    println!(
        "  {} villas audited | {} flagged ({} danger) | {} high-ROI alerts | avg net yield {}",
        s.audited,
        s.flagged,
        s.danger,
        s.high_roi_alerts,
        format_pct(s.average_net_yield)
    );
    println!(
        "  assumptions: x{:.2} nightly, {:.0}% occupancy, {:.0}% expenses{}",
        report.assumptions.nightly_multiplier,
        report.assumptions.occupancy_pct,
        report.assumptions.expense_pct,
        if report.assumptions.is_default() { " (defaults)" } else { "" }
    );
    println!();
    print_rows(&report.listings);

    if !report.comparison.is_empty() {
        println!();
        println!("  Compare");
        print_rows(&report.comparison);
        for a in &report.comparison {
            for f in &a.flags {
                println!("    #{} {}: {}", a.id, f.label, f.detail);
            }
        }
    }
}

pub fn print_areas(table: &AreaRateTable) {
    println!(
        "  {:<12} {:>8} {:>8} {:>8} {:>8} {:>8}",
        "Area", "1BR", "2BR", "3BR", "4BR", "5BR+"
    );
    for area in table.areas() {
        let cells: Vec<String> = area
            .nightly
            .iter()
            .map(|r| format!("{:>8}", format_usd(*r)))
            .collect();
        println!("  {:<12} {}", area.name, cells.join(" "));
    }
}

/// The `audit` command.
pub fn run(args: &AuditArgs, config: &Config) -> anyhow::Result<()> {
    let listings = load_listings(&args.listings).context("loading listings")?;
    let rates = load_rates(args.rates.as_deref(), config.fallback_rates());
    let areas = AreaRateTable::bali();
    let display_currency = args
        .currency
        .clone()
        .unwrap_or_else(|| config.currency.display.clone())
        .to_ascii_uppercase();
    if rates.rate(&display_currency).is_none() {
        let known: Vec<&str> = rates.codes().collect();
        tracing::warn!(
            currency = %display_currency,
            known = %known.join(","),
            "no rate for display currency, showing USD"
        );
    }

    let ctx = AuditContext {
        areas: &areas,
        rates: &rates,
        rate_policy: &config.rate,
        flag_policy: &config.flags,
        display_currency: &display_currency,
    };
    let assumptions = assumptions_from(args, config);
    let filter = filter_from(args);
    if !filter.is_empty() {
        tracing::info!(?filter, "applying filters");
    }

    let report = build_report(&listings, &ctx, assumptions, &filter, &args.compare)
        .context("building audit report")?;
    tracing::info!(
        audited = report.summary.audited,
        flagged = report.summary.flagged,
        "audit complete"
    );

    print_report(&report);

    if let Some(path) = &args.json {
        write_json(&report, path).context("writing JSON report")?;
        tracing::info!(path = %path.display(), "wrote JSON report");
    }
    if let Some(path) = &args.xlsx {
        write_xlsx(&report, path).context("writing XLSX report")?;
        tracing::info!(path = %path.display(), "wrote XLSX report");
    }

    Ok(())
}
