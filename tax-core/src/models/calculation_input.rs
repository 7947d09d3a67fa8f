use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Oldest age accepted on an input.
pub const MAX_AGE: u32 = 130;

/// Largest money amount accepted on an input: one trillion dollars.
///
/// Every sum and product the engine forms stays far inside [`Decimal`]'s
/// range when all amounts are at most this.
pub const MAX_AMOUNT: Decimal = dec!(1000000000000);

/// Errors raised when a calculation input is outside the engine's domain.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("{field} must not be negative (got {value})")]
    NegativeAmount { field: &'static str, value: Decimal },

    #[error("{field} exceeds the largest accepted amount {MAX_AMOUNT} (got {value})")]
    AmountTooLarge { field: &'static str, value: Decimal },

    #[error("{field} must be a percentage between 0 and 100 (got {value})")]
    PercentOutOfRange { field: &'static str, value: Decimal },

    #[error("{0} days worked is more than a year")]
    DaysOutOfRange(u32),

    #[error("age {0} is outside 0..={MAX_AGE}")]
    AgeOutOfRange(u32),
}

/// Checks that every amount lies in `0..=MAX_AMOUNT`, reporting the first
/// that does not.
pub(crate) fn check_amounts(amounts: &[(&'static str, Decimal)]) -> Result<(), InputError> {
    for &(field, value) in amounts {
        if value < Decimal::ZERO {
            return Err(InputError::NegativeAmount { field, value });
        }
        if value > MAX_AMOUNT {
            return Err(InputError::AmountTooLarge { field, value });
        }
    }
    Ok(())
}

pub(crate) fn check_percent(
    field: &'static str,
    value: Decimal,
) -> Result<(), InputError> {
    if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
        return Err(InputError::PercentOutOfRange { field, value });
    }
    Ok(())
}

/// Residency status for tax purposes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Residency {
    #[default]
    Resident,
    NonResident,
}

impl Residency {
    pub fn is_resident(&self) -> bool {
        matches!(self, Self::Resident)
    }
}

/// Everything a single estimate needs to know about the taxpayer.
///
/// Money fields are annual amounts in dollars. A fresh value from
/// [`Default`] describes a resident individual aged 30 with no income.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxCalculationInput {
    pub annual_income: Decimal,
    pub other_income: Decimal,
    /// Reportable fringe benefits, added to gross income.
    pub fringe_benefits: Decimal,
    /// Super contributions. Reported alongside the estimate but not taxed here.
    pub super_contributions: Decimal,
    pub deductions: Decimal,
    pub tax_withheld: Decimal,
    pub residency: Residency,
    pub is_family: bool,
    pub dependents: u32,
    pub has_private_health: bool,
    /// Annual premium paid, used to turn the rebate percentage into dollars.
    pub private_health_premium: Decimal,
    pub age: u32,
    pub is_overseas: bool,
    pub help_balance: Decimal,
}

impl Default for TaxCalculationInput {
    fn default() -> Self {
        Self {
            annual_income: Decimal::ZERO,
            other_income: Decimal::ZERO,
            fringe_benefits: Decimal::ZERO,
            super_contributions: Decimal::ZERO,
            deductions: Decimal::ZERO,
            tax_withheld: Decimal::ZERO,
            residency: Residency::Resident,
            is_family: false,
            dependents: 0,
            has_private_health: false,
            private_health_premium: Decimal::ZERO,
            age: 30,
            is_overseas: false,
            help_balance: Decimal::ZERO,
        }
    }
}

impl TaxCalculationInput {
    /// Rejects negative or oversized money amounts and implausible ages.
    pub fn validate(&self) -> Result<(), InputError> {
        check_amounts(&[
            ("annual_income", self.annual_income),
            ("other_income", self.other_income),
            ("fringe_benefits", self.fringe_benefits),
            ("super_contributions", self.super_contributions),
            ("deductions", self.deductions),
            ("tax_withheld", self.tax_withheld),
            ("private_health_premium", self.private_health_premium),
            ("help_balance", self.help_balance),
        ])?;

        if self.age > MAX_AGE {
            return Err(InputError::AgeOutOfRange(self.age));
        }

        Ok(())
    }

    /// Income from every source before deductions.
    pub fn gross_income(&self) -> Decimal {
        self.annual_income + self.other_income + self.fringe_benefits
    }
}
