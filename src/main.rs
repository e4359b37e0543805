use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod config;
mod domain;
mod errors;
mod loader;
mod report;
mod spreadsheets;

#[cfg(test)]
mod tests;

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so the printed table can be piped
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::Cli::parse();
    let config = config::Config::load(cli.config.as_deref()).context("loading config")?;

    match cli.command {
        cli::Command::Audit(args) => report::run(&args, &config),
        cli::Command::Areas => {
            report::print_areas(&domain::AreaRateTable::bali());
            Ok(())
        }
    }
}
