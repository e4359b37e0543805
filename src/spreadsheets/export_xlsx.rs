use crate::domain::rate::RateSource;
use crate::domain::{FlagLevel, ListingAudit};
use crate::errors::AppError;
use rust_xlsxwriter::{Workbook, XlsxError};

fn xlsx_err(what: &'static str) -> impl Fn(XlsxError) -> AppError {
    move |e| AppError::XlsxError(format!("Failed to write {what}: {e}"))
}

/// Builds the audit workbook: one row per listing on "Audit", one row per
/// flag on "Flags".
pub fn export_audits_xlsx(audits: &[&ListingAudit]) -> Result<Vec<u8>, AppError> {
    let mut workbook = Workbook::new();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Audit").map_err(xlsx_err("sheet name"))?;

    // Headers
    let headers = [
        "ID",
        "Villa",
        "Location",
        "Price (USD)",
        "Price",
        "Beds",
        "Land m²",
        "Tenure",
        "Nightly Rate",
        "Rate Source",
        "Gross Yield %",
        "Cash Flow Yield %",
        "Lease Depreciation %",
        "Net Yield %",
        "Claimed ROI %",
        "Flags",
        "Source URL",
    ];

    for (col, header) in headers.iter().enumerate() {
        worksheet
            .write_string(0, col as u16, *header)
            .map_err(|e| {
                AppError::XlsxError(format!("Failed to write header '{}': {}", header, e))
            })?;
    }

    // Rows
    for (i, audit) in audits.iter().enumerate() {
        let r = (i + 1) as u32;
        let y = &audit.yields;

        worksheet
            .write_number(r, 0, audit.id as f64)
            .map_err(xlsx_err("id"))?;
        worksheet
            .write_string(r, 1, &audit.villa_name)
            .map_err(xlsx_err("villa name"))?;
        worksheet
            .write_string(r, 2, audit.location.as_deref().unwrap_or(""))
            .map_err(xlsx_err("location"))?;
        worksheet
            .write_number(r, 3, audit.price_usd().round())
            .map_err(xlsx_err("price"))?;
        worksheet
            .write_string(r, 4, &audit.display_price)
            .map_err(xlsx_err("display price"))?;
        worksheet
            .write_number(r, 5, audit.bedrooms.unwrap_or(0) as f64)
            .map_err(xlsx_err("bedrooms"))?;
        worksheet
            .write_number(r, 6, audit.land_size.unwrap_or(0.0))
            .map_err(xlsx_err("land size"))?;
        worksheet
            .write_string(r, 7, y.tenure.label())
            .map_err(xlsx_err("tenure"))?;
        worksheet
            .write_number(r, 8, audit.rate_estimate.display_rate())
            .map_err(xlsx_err("nightly rate"))?;

        let source = match audit.rate_estimate.source {
            RateSource::Upstream => "Pipeline",
            RateSource::Model if audit.rate_estimate.cap_binding => "Model (capped)",
            RateSource::Model => "Model",
        };
        worksheet
            .write_string(r, 9, source)
            .map_err(xlsx_err("rate source"))?;

        let pct = |v: f64| (v * 10.0).round() / 10.0;
        worksheet
            .write_number(r, 10, pct(y.gross_yield))
            .map_err(xlsx_err("gross yield"))?;
        worksheet
            .write_number(r, 11, pct(y.cash_flow_yield))
            .map_err(xlsx_err("cash flow yield"))?;
        worksheet
            .write_number(r, 12, pct(y.lease_depreciation_pct))
            .map_err(xlsx_err("lease depreciation"))?;
        worksheet
            .write_number(r, 13, pct(y.net_yield))
            .map_err(xlsx_err("net yield"))?;

        if let Some(claimed) = audit.claimed_gross_yield {
            worksheet
                .write_number(r, 14, pct(claimed))
                .map_err(xlsx_err("claimed roi"))?;
        }

        let codes: Vec<&str> = audit.flags.iter().map(|f| f.code.as_str()).collect();
        worksheet
            .write_string(r, 15, codes.join(", "))
            .map_err(xlsx_err("flags"))?;
        worksheet
            .write_string(r, 16, audit.url.as_deref().unwrap_or(""))
            .map_err(xlsx_err("url"))?;
    }

    let flags_sheet = workbook.add_worksheet();
    flags_sheet.set_name("Flags").map_err(xlsx_err("sheet name"))?;

    for (col, header) in ["ID", "Villa", "Code", "Level", "Detail"].iter().enumerate() {
        flags_sheet
            .write_string(0, col as u16, *header)
            .map_err(xlsx_err("flag header"))?;
    }

    let mut r = 1u32;
    for audit in audits {
        for flag in &audit.flags {
            let level = match flag.level {
                FlagLevel::Danger => "danger",
                FlagLevel::Warning => "warning",
                FlagLevel::Assumed => "assumed",
            };
            flags_sheet
                .write_number(r, 0, audit.id as f64)
                .map_err(xlsx_err("flag id"))?;
            flags_sheet
                .write_string(r, 1, &audit.villa_name)
                .map_err(xlsx_err("flag villa"))?;
            flags_sheet
                .write_string(r, 2, flag.code.as_str())
                .map_err(xlsx_err("flag code"))?;
            flags_sheet
                .write_string(r, 3, level)
                .map_err(xlsx_err("flag level"))?;
            flags_sheet
                .write_string(r, 4, &flag.detail)
                .map_err(xlsx_err("flag detail"))?;
            r += 1;
        }
    }

    workbook
        .save_to_buffer()
        .map_err(|e| AppError::XlsxError(format!("Failed to save workbook: {}", e)))
}
