//! CSV loader for batch calculation inputs.
//!
//! ## CSV Format
//!
//! Column order does **not** matter (headers are matched by name). All
//! header names are case-sensitive and must match exactly. Empty optional
//! cells take the default shown.
//!
//! | Column | Required | Type | Default |
//! |--------------------------|----------|---------|------------|
//! | `label` | no | string | `row N` |
//! | `annual_income` | yes | decimal | |
//! | `other_income` | no | decimal | 0 |
//! | `fringe_benefits` | no | decimal | 0 |
//! | `super_contributions` | no | decimal | 0 |
//! | `deductions` | no | decimal | 0 |
//! | `tax_withheld` | no | decimal | 0 |
//! | `residency` | no | string | `resident` |
//! | `family` | no | bool | `false` |
//! | `dependents` | no | integer | 0 |
//! | `private_health` | no | bool | `false` |
//! | `premium` | no | decimal | 0 |
//! | `age` | no | integer | 30 |
//! | `overseas` | no | bool | `false` |
//! | `help_balance` | no | decimal | 0 |
//!
//! ### Residency Codes
//!
//! | Code | Meaning |
//! |------------------------------|--------------|
//! | `resident`, `R` | Resident |
//! | `non_resident`, `NR` | Non-resident |
//!
//! ### Minimal example
//!
//! ```csv
//! annual_income
//! 50000
//! ```
//!
//! ### Full example
//!
//! ```csv
//! label,annual_income,deductions,tax_withheld,residency,private_health,premium,help_balance
//! alex,85000.00,2500.00,17000.00,R,true,1800.00,12000.00
//! sam,200000.00,,60000.00,NR,,,
//! ```
use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;
use tax_core::{Residency, TaxCalculationInput};

// ---------------------------------------------------------------------------
// Serde-compatible row that mirrors the CSV layout exactly
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct CsvRow {
    label: Option<String>,
    annual_income: Decimal,
    other_income: Option<Decimal>,
    fringe_benefits: Option<Decimal>,
    super_contributions: Option<Decimal>,
    deductions: Option<Decimal>,
    tax_withheld: Option<Decimal>,
    residency: Option<String>,
    family: Option<bool>,
    dependents: Option<u32>,
    private_health: Option<bool>,
    premium: Option<Decimal>,
    age: Option<u32>,
    overseas: Option<bool>,
    help_balance: Option<Decimal>,
}

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Errors that can occur while loading or converting CSV data.
#[derive(Debug, thiserror::Error)]
pub enum CsvLoadError {
    /// The file could not be read.
    #[error("cannot read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The underlying CSV deserialisation failed (bad structure, missing
    /// required column, type mismatch, etc.).
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    /// A `residency` cell held an unrecognised code. `row` is 1-based
    /// (header = row 0).
    #[error("unrecognised residency '{value}' on row {row}")]
    InvalidResidency { value: String, row: usize },
}

/// One input row with the label used to identify it in reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchInput {
    pub label: String,
    pub input: TaxCalculationInput,
}

// ---------------------------------------------------------------------------
// Core loader
// ---------------------------------------------------------------------------

fn parse_residency(
    value: Option<String>,
    row_number: usize,
) -> Result<Residency, CsvLoadError> {
    let Some(value) = value.filter(|v| !v.is_empty()) else {
        return Ok(Residency::Resident);
    };
    match value.to_ascii_lowercase().as_str() {
        "resident" | "r" => Ok(Residency::Resident),
        "non_resident" | "non-resident" | "nr" => Ok(Residency::NonResident),
        _ => Err(CsvLoadError::InvalidResidency {
            value,
            row: row_number,
        }),
    }
}

/// Convert a single CSV row into a [`BatchInput`].
///
/// row_number is 1-based (for error messages).
fn convert_row(
    row: CsvRow,
    row_number: usize,
) -> Result<BatchInput, CsvLoadError> {
    let defaults = TaxCalculationInput::default();
    let residency = parse_residency(row.residency, row_number)?;

    Ok(BatchInput {
        label: row
            .label
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| format!("row {row_number}")),
        input: TaxCalculationInput {
            annual_income: row.annual_income,
            other_income: row.other_income.unwrap_or_default(),
            fringe_benefits: row.fringe_benefits.unwrap_or_default(),
            super_contributions: row.super_contributions.unwrap_or_default(),
            deductions: row.deductions.unwrap_or_default(),
            tax_withheld: row.tax_withheld.unwrap_or_default(),
            residency,
            is_family: row.family.unwrap_or_default(),
            dependents: row.dependents.unwrap_or_default(),
            has_private_health: row.private_health.unwrap_or_default(),
            private_health_premium: row.premium.unwrap_or_default(),
            age: row.age.unwrap_or(defaults.age),
            is_overseas: row.overseas.unwrap_or_default(),
            help_balance: row.help_balance.unwrap_or_default(),
        },
    })
}

/// Parse CSV text and return the inputs in file order.
///
/// # Errors
///
/// * [CsvLoadError::Parse] – if the CSV is structurally invalid or a
///   field cannot be deserialised.
/// * [CsvLoadError::InvalidResidency] – if any row contains an unrecognised
///   residency code.
pub fn load_from_str(input: &str) -> Result<Vec<BatchInput>, CsvLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All) // tolerate whitespace around values
        .flexible(false) // strict column count
        .from_reader(input.as_bytes());

    reader
        .deserialize::<CsvRow>()
        .enumerate()
        .map(|(idx, result)| {
            let row = result?;
            let row_number = idx + 1; // 1-based for user-facing messages
            convert_row(row, row_number)
        })
        .collect()
}

/// Read a file from disk and delegate to [load_from_str].
pub fn load_from_file(path: &Path) -> Result<Vec<BatchInput>, CsvLoadError> {
    let contents = std::fs::read_to_string(path).map_err(|source| CsvLoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    load_from_str(&contents)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
