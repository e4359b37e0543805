use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Bali Villa Truth: independent yield audits for villa listings.
#[derive(Parser)]
#[command(name = "villa-truth", version, about)]
pub struct Cli {
    /// Policy config (TOML)
    #[arg(long, global = true, env = "VILLA_TRUTH_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Audit a listings export and write reports
    Audit(AuditArgs),

    /// Print the area rate table
    Areas,
}

#[derive(Args, Debug, Clone, Default)]
pub struct AuditArgs {
    /// Listings export (JSON array of listings_tracker rows)
    pub listings: PathBuf,

    /// Currency snapshot (JSON); the fallback table is used when absent
    #[arg(long)]
    pub rates: Option<PathBuf>,

    /// Display currency (overrides the config)
    #[arg(long)]
    pub currency: Option<String>,

    // Assumption overrides
    /// Nightly rate multiplier (0.5 - 2.0)
    #[arg(long)]
    pub multiplier: Option<f64>,

    /// Occupancy percent (20 - 95)
    #[arg(long)]
    pub occupancy: Option<f64>,

    /// Expense load percent (20 - 60)
    #[arg(long)]
    pub expenses: Option<f64>,

    // Filters
    /// Only listings in this area ("All" for every area)
    #[arg(long)]
    pub location: Option<String>,

    /// Maximum price in USD
    #[arg(long)]
    pub max_price: Option<f64>,

    /// Minimum net yield percent
    #[arg(long)]
    pub min_yield: Option<f64>,

    /// Minimum land size in m²
    #[arg(long)]
    pub min_land: Option<f64>,

    /// Listing ids to compare side by side (comma separated)
    #[arg(long, value_delimiter = ',')]
    pub compare: Vec<i64>,

    /// Write the audit report as JSON
    #[arg(long)]
    pub json: Option<PathBuf>,

    /// Write the audit report as XLSX
    #[arg(long)]
    pub xlsx: Option<PathBuf>,
}
