use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tax_core::{ScheduleKind, TaxYearTables};
use tax_data::ScheduleLoader;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Check a rate-schedule CSV file and print the table set it produces.
///
/// The CSV file should have the following columns:
/// - tax_year: the year the financial year ends in (e.g., 2025)
/// - schedule: RES, NONRES, MLS-I, MLS-F or HELP
/// - threshold: the income at which the bracket starts
/// - rate: the bracket rate as a decimal (e.g., 0.16)
///
/// All five schedules must be present for the year.
#[derive(Parser, Debug)]
#[command(name = "tax-schedule-check")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the CSV file containing rate schedules
    #[arg(short, long)]
    file: PathBuf,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::from("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .without_time()
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    init_tracing();

    let args = Args::parse();

    let file = File::open(&args.file)
        .with_context(|| format!("Failed to open: {}", args.file.display()))?;

    let records = ScheduleLoader::parse(file)
        .with_context(|| format!("Failed to parse CSV: {}", args.file.display()))?;
    debug!("parsed {} records", records.len());

    let base = TaxYearTables::fy2024_25();
    let tables = ScheduleLoader::build(&records, &base)
        .with_context(|| format!("Invalid schedules in: {}", args.file.display()))?;

    println!("Schedules for {} are valid.", tables.tax_year());
    for kind in ScheduleKind::ALL {
        let schedule = tables.schedule(kind);
        println!("  {:<7} {} brackets ({kind})", kind.as_str(), schedule.len());
        for bracket in schedule.brackets() {
            println!("          from {:>10}  rate {}", bracket.threshold, bracket.rate);
        }
    }

    Ok(())
}
