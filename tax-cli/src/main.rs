use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tax_core::TaxYearTables;
use tax_core::calculations::{DeductionClaim, TaxEstimator};
use tax_data::ScheduleLoader;
use tracing::{debug, info};

use tax_cli::csv_loader;
use tax_cli::form::{EstimateForm, PayFrequency};
use tax_cli::logging::{self, LogOptions};
use tax_cli::report::{self, BatchRow};

/// Estimate Australian income tax, levies, offsets and take-home pay.
#[derive(Parser, Debug)]
#[command(name = "tax-estimator")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Rate-schedule CSV replacing the built-in 2024-25 schedules
    #[arg(long, global = true)]
    schedules: Option<PathBuf>,

    /// Log filter, e.g. "debug" or "tax_core=trace"
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Append log output to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Hide log output on the terminal
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Estimate tax for one taxpayer
    Estimate(EstimateArgs),
    /// Estimate tax for every row of an input CSV and print CSV results
    Batch {
        /// Path to the input CSV
        #[arg(short, long)]
        file: PathBuf,
    },
}

/// Money values accept `$` and thousands separators; empty means zero.
#[derive(Args, Debug)]
struct EstimateArgs {
    /// Salary amount, quoted per --frequency
    #[arg(long, default_value = "")]
    salary: String,

    #[arg(long, value_enum, default_value_t = PayFrequency::Annual)]
    frequency: PayFrequency,

    /// Hours worked per week, for an hourly salary
    #[arg(long = "hours", default_value = "")]
    hours_per_week: String,

    /// Super guarantee rate in percent [default: 11]
    #[arg(long, default_value = "")]
    super_rate: String,

    /// The salary is a package that already includes super
    #[arg(long)]
    includes_super: bool,

    #[arg(long, default_value = "")]
    other_income: String,

    /// Reportable fringe benefits
    #[arg(long, default_value = "")]
    fringe_benefits: String,

    #[arg(long, default_value = "")]
    deductions: String,

    /// Itemised deductions as TOML, added to --deductions
    #[arg(long)]
    claim: Option<PathBuf>,

    /// Tax already withheld by employers
    #[arg(long = "withheld", default_value = "")]
    tax_withheld: String,

    #[arg(long)]
    non_resident: bool,

    /// Assess Medicare thresholds as a family
    #[arg(long)]
    family: bool,

    #[arg(long, default_value = "")]
    dependents: String,

    /// Holds an appropriate level of private hospital cover
    #[arg(long)]
    private_health: bool,

    /// Annual private health insurance premium
    #[arg(long, default_value = "")]
    premium: String,

    #[arg(long, default_value = "")]
    age: String,

    /// Living overseas, for HELP repayment purposes
    #[arg(long)]
    overseas: bool,

    /// Outstanding HELP debt
    #[arg(long, default_value = "")]
    help_balance: String,

    /// Also print weekly, fortnightly and monthly figures
    #[arg(long)]
    breakdown: bool,
}

impl EstimateArgs {
    fn form(&self) -> EstimateForm {
        EstimateForm {
            salary: self.salary.clone(),
            frequency: self.frequency,
            hours_per_week: self.hours_per_week.clone(),
            super_rate: self.super_rate.clone(),
            salary_includes_super: self.includes_super,
            other_income: self.other_income.clone(),
            fringe_benefits: self.fringe_benefits.clone(),
            deductions: self.deductions.clone(),
            tax_withheld: self.tax_withheld.clone(),
            non_resident: self.non_resident,
            family: self.family,
            dependents: self.dependents.clone(),
            private_health: self.private_health,
            premium: self.premium.clone(),
            age: self.age.clone(),
            overseas: self.overseas,
            help_balance: self.help_balance.clone(),
        }
    }
}

fn load_tables(path: Option<&Path>) -> Result<TaxYearTables> {
    let base = TaxYearTables::fy2024_25();
    let Some(path) = path else {
        return Ok(base);
    };

    let file =
        File::open(path).with_context(|| format!("Failed to open: {}", path.display()))?;
    let tables = ScheduleLoader::load(file, &base)
        .with_context(|| format!("Invalid schedules in: {}", path.display()))?;
    info!(tax_year = %tables.tax_year(), path = %path.display(), "using loaded schedules");
    Ok(tables)
}

fn load_claim(path: &Path) -> Result<DeductionClaim> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read claim: {}", path.display()))?;
    let claim: DeductionClaim = toml::from_str(&text)
        .with_context(|| format!("Invalid claim file: {}", path.display()))?;
    claim
        .validate()
        .with_context(|| format!("Invalid claim in: {}", path.display()))?;
    debug!(total = %claim.total(), "loaded deduction claim");
    Ok(claim)
}

fn run_estimate(
    tables: &TaxYearTables,
    args: &EstimateArgs,
) -> Result<()> {
    let mut input = args.form().to_input().context("Invalid estimate input")?;
    if let Some(path) = &args.claim {
        input.deductions = input
            .deductions
            .checked_add(load_claim(path)?.total())
            .context("Deductions are too large")?;
    }

    let result = TaxEstimator::new(tables)
        .estimate(&input)
        .context("Invalid estimate input")?;

    print!("{}", report::render_estimate(tables.tax_year(), &result));
    if args.breakdown {
        println!();
        print!("{}", report::render_breakdown(&report::breakdown_for(&result)));
    }
    Ok(())
}

fn run_batch(
    tables: &TaxYearTables,
    file: &Path,
) -> Result<()> {
    let inputs = csv_loader::load_from_file(file)
        .with_context(|| format!("Failed to load batch: {}", file.display()))?;
    let estimator = TaxEstimator::new(tables);

    let mut results = Vec::with_capacity(inputs.len());
    for batch_input in &inputs {
        let result = estimator
            .estimate(&batch_input.input)
            .with_context(|| format!("Row '{}' is invalid", batch_input.label))?;
        results.push((batch_input.label.as_str(), result));
    }

    let rows: Vec<BatchRow<'_>> = results
        .iter()
        .map(|(label, result)| BatchRow::new(label, result))
        .collect();
    report::write_batch(io::stdout().lock(), &rows).context("Failed to write results")?;

    info!(count = rows.len(), "batch complete");
    Ok(())
}

fn run(cli: &Cli) -> Result<()> {
    let tables = load_tables(cli.schedules.as_deref())?;

    match &cli.command {
        Command::Estimate(args) => run_estimate(&tables, args),
        Command::Batch { file } => run_batch(&tables, file),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init_logging(&LogOptions {
        level: cli.log_level.clone(),
        file: cli.log_file.clone(),
        quiet: cli.quiet,
    })?;

    run(&cli)
}
