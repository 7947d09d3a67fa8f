use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::common::round_half_up;

/// Compulsory HELP repayment for the year plus the voluntary-payment figures
/// shown alongside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelpRepayment {
    pub compulsory_amount: Decimal,
    pub voluntary_bonus: Decimal,
    /// Whole years to clear the balance at the current compulsory amount.
    /// `None` when nothing is being repaid, so the balance never clears.
    /// Projections longer than `u32::MAX` years saturate at `u32::MAX`.
    pub projected_years_to_repay: Option<u32>,
}

impl HelpRepayment {
    /// The record for a taxpayer with no outstanding balance.
    pub fn none() -> Self {
        Self {
            compulsory_amount: Decimal::ZERO,
            voluntary_bonus: Decimal::ZERO,
            projected_years_to_repay: Some(0),
        }
    }
}

/// Whether tax withheld covers the liability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "amount", rename_all = "snake_case")]
pub enum TaxOutcome {
    Refund(Decimal),
    Debt(Decimal),
}

impl TaxOutcome {
    /// Builds an outcome from `withheld - total`; a zero balance is a zero refund.
    pub fn from_balance(balance: Decimal) -> Self {
        if balance < Decimal::ZERO {
            Self::Debt(-balance)
        } else {
            Self::Refund(balance)
        }
    }

    pub fn amount(&self) -> Decimal {
        match self {
            Self::Refund(amount) | Self::Debt(amount) => *amount,
        }
    }

    pub fn is_refund(&self) -> bool {
        matches!(self, Self::Refund(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxCalculationResult {
    pub gross_income: Decimal,
    pub deductions: Decimal,
    pub taxable_income: Decimal,
    pub base_tax: Decimal,
    pub medicare_levy: Decimal,
    pub medicare_levy_surcharge: Decimal,
    pub low_income_offset: Decimal,
    /// Rebate as a percentage of premiums, e.g. `24.608`.
    pub private_health_rebate_percent: Decimal,
    pub private_health_rebate_amount: Decimal,
    pub help: HelpRepayment,
    pub super_contributions: Decimal,
    pub total_tax: Decimal,
    pub take_home_pay: Decimal,
    pub outcome: TaxOutcome,
    /// Total tax as a percentage of gross income. `None` for zero income.
    pub effective_rate: Option<Decimal>,
}

impl TaxCalculationResult {
    /// Effective rate formatted for display, `"0.00%"` when undefined.
    pub fn effective_rate_display(&self) -> String {
        let rate = self.effective_rate.unwrap_or(Decimal::ZERO);
        format!("{:.2}%", round_half_up(rate))
    }
}
