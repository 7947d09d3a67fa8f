use std::collections::{BTreeMap, BTreeSet};
use std::io::Read;

use rust_decimal::Decimal;
use serde::Deserialize;
use tax_core::{
    BracketSchedule, ScheduleKind, ScheduleSet, TablesError, TaxBracket, TaxYear, TaxYearTables,
};
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur when loading rate schedules.
#[derive(Debug, Error)]
pub enum ScheduleLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("Invalid schedule: {0}")]
    InvalidSchedule(String),

    #[error("No schedule rows found")]
    NoRecords,

    #[error("Schedule file mixes tax years: {0:?}")]
    MixedTaxYears(Vec<i32>),

    #[error("Tax year {tax_year} is missing the {schedule} schedule")]
    MissingSchedule {
        tax_year: TaxYear,
        schedule: ScheduleKind,
    },

    #[error("Invalid tables: {0}")]
    InvalidTables(#[from] TablesError),
}

impl From<csv::Error> for ScheduleLoaderError {
    fn from(err: csv::Error) -> Self {
        ScheduleLoaderError::CsvParse(err.to_string())
    }
}

/// Maps schedule codes to the schedule they replace.
///
/// - RES → resident income tax
/// - NONRES → non-resident income tax
/// - MLS-I / MLS-F → Medicare levy surcharge, individual / family
/// - HELP → HELP repayment
fn schedule_kind(code: &str) -> Result<ScheduleKind, ScheduleLoaderError> {
    ScheduleKind::parse(code.trim())
        .ok_or_else(|| ScheduleLoaderError::InvalidSchedule(code.to_string()))
}

/// A single record from a rate-schedule CSV file.
///
/// - `tax_year`: the year the financial year ends in (e.g. 2025 for 2024-25)
/// - `schedule`: the schedule code (RES, NONRES, MLS-I, MLS-F, HELP)
/// - `threshold`: the income at which the bracket starts
/// - `rate`: the bracket rate as a fraction (e.g. 0.16 for 16%)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ScheduleRecord {
    pub tax_year: i32,
    pub schedule: String,
    pub threshold: Decimal,
    pub rate: Decimal,
}

/// Loader for rate schedules from CSV files.
///
/// A file describes one financial year and must carry all five schedules.
/// Loading never patches an existing table set: [`ScheduleLoader::build`]
/// returns a complete replacement whose scalar parameters (Medicare levy
/// cut-offs, rebate factors, HELP rules, offset parameters) are taken from
/// a base set.
pub struct ScheduleLoader;

impl ScheduleLoader {
    /// Parse schedule records from a CSV reader.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<ScheduleRecord>, ScheduleLoaderError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: ScheduleRecord = result?;
            records.push(record);
        }

        debug!(count = records.len(), "parsed schedule records");
        Ok(records)
    }

    /// Build a validated table set from parsed records.
    ///
    /// Rows keep their file order within each schedule; thresholds must
    /// already be ascending.
    pub fn build(
        records: &[ScheduleRecord],
        base: &TaxYearTables,
    ) -> Result<TaxYearTables, ScheduleLoaderError> {
        let years: BTreeSet<i32> = records.iter().map(|r| r.tax_year).collect();
        let tax_year = match years.len() {
            0 => return Err(ScheduleLoaderError::NoRecords),
            1 => TaxYear(*years.iter().next().ok_or(ScheduleLoaderError::NoRecords)?),
            _ => return Err(ScheduleLoaderError::MixedTaxYears(years.into_iter().collect())),
        };

        let mut groups: BTreeMap<ScheduleKind, Vec<TaxBracket>> = BTreeMap::new();
        for record in records {
            let kind = schedule_kind(&record.schedule)?;
            groups
                .entry(kind)
                .or_default()
                .push(TaxBracket::new(record.threshold, record.rate));
        }

        let mut take = |kind: ScheduleKind| -> Result<BracketSchedule, ScheduleLoaderError> {
            let brackets = groups.remove(&kind).ok_or(ScheduleLoaderError::MissingSchedule {
                tax_year,
                schedule: kind,
            })?;
            Ok(BracketSchedule::new(kind, brackets)?)
        };

        let schedules = ScheduleSet {
            resident: take(ScheduleKind::Resident)?,
            non_resident: take(ScheduleKind::NonResident)?,
            surcharge_individual: take(ScheduleKind::SurchargeIndividual)?,
            surcharge_family: take(ScheduleKind::SurchargeFamily)?,
            help_repayment: take(ScheduleKind::HelpRepayment)?,
        };

        let tables = base.with_schedules(tax_year, schedules)?;
        info!(%tax_year, rows = records.len(), "built rate tables from schedule file");
        Ok(tables)
    }

    /// Parse and build in one step.
    pub fn load<R: Read>(
        reader: R,
        base: &TaxYearTables,
    ) -> Result<TaxYearTables, ScheduleLoaderError> {
        let records = Self::parse(reader)?;
        Self::build(&records, base)
    }
}
