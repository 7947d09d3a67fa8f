//! Combines the individual tax components into a full estimate.
//!
//! # Estimate Structure
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Gross income (salary + other income + fringe benefits) |
//! | 2    | Taxable income (gross - deductions, minimum 0) |
//! | 3    | Base income tax (resident or non-resident marginal schedule) |
//! | 4    | Medicare levy (residents only) |
//! | 5    | Medicare levy surcharge (residents without cover) |
//! | 6    | Low Income Tax Offset (residents only) |
//! | 7    | Private health rebate (residents only; percentage, then dollars against premium) |
//! | 8    | HELP compulsory repayment |
//! | 9    | Total tax (3 + 4 + 5 - 6 - 7 + 8, minimum 0) |
//! | 10   | Take-home pay, refund or debt, effective rate |
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use tax_core::calculations::TaxEstimator;
//! use tax_core::{TaxCalculationInput, TaxYearTables};
//!
//! let tables = TaxYearTables::fy2024_25();
//! let input = TaxCalculationInput {
//!     annual_income: dec!(50000),
//!     ..Default::default()
//! };
//!
//! let result = TaxEstimator::new(&tables).estimate(&input).unwrap();
//!
//! assert_eq!(result.total_tax, dec!(6538));
//! assert_eq!(result.take_home_pay, dec!(43462));
//! assert_eq!(result.effective_rate_display(), "13.08%");
//! ```

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::calculations::brackets::base_tax;
use crate::calculations::common::{non_negative, ratio_percent, round_half_up};
use crate::calculations::help::help_repayment;
use crate::calculations::medicare::{medicare_levy, medicare_levy_surcharge};
use crate::calculations::offsets::low_income_tax_offset;
use crate::calculations::rebate::{private_health_rebate, rebate_amount};
use crate::{
    HelpRepayment, InputError, TaxCalculationInput, TaxCalculationResult, TaxOutcome,
    TaxYearTables,
};

/// Runs a complete estimate against one table set.
#[derive(Debug, Clone, Copy)]
pub struct TaxEstimator<'a> {
    tables: &'a TaxYearTables,
}

impl<'a> TaxEstimator<'a> {
    pub fn new(tables: &'a TaxYearTables) -> Self {
        Self { tables }
    }

    pub fn tables(&self) -> &'a TaxYearTables {
        self.tables
    }

    /// Validates the input and computes every component.
    ///
    /// # Errors
    ///
    /// Returns [`InputError`] for negative amounts, amounts above
    /// [`crate::MAX_AMOUNT`] or an out-of-range age.
    pub fn estimate(
        &self,
        input: &TaxCalculationInput,
    ) -> Result<TaxCalculationResult, InputError> {
        if let Err(err) = input.validate() {
            warn!(error = %err, "rejected calculation input");
            return Err(err);
        }

        let gross_income = round_half_up(input.gross_income());
        let deductions = round_half_up(input.deductions);
        let taxable_income = self.taxable_income(gross_income, deductions);
        let resident = input.residency.is_resident();

        let base_tax = base_tax(self.tables, taxable_income, input.residency);
        let medicare_levy = self.medicare_levy(taxable_income, input, resident);
        let medicare_levy_surcharge = self.surcharge(taxable_income, input, resident);
        let low_income_offset = self.low_income_offset(taxable_income, resident);

        let rebate_percent = self.rebate_percent(taxable_income, input, resident);
        let rebate = self.rebate_amount(input, rebate_percent);

        let help = self.help(taxable_income, input);

        let total_tax = self.total_tax(
            base_tax,
            medicare_levy,
            medicare_levy_surcharge,
            low_income_offset,
            rebate,
            help.compulsory_amount,
        );

        debug!(
            tax_year = %self.tables.tax_year(),
            %taxable_income,
            %base_tax,
            %medicare_levy,
            %medicare_levy_surcharge,
            %low_income_offset,
            %rebate,
            help = %help.compulsory_amount,
            %total_tax,
            "estimate complete"
        );

        Ok(TaxCalculationResult {
            gross_income,
            deductions,
            taxable_income,
            base_tax,
            medicare_levy,
            medicare_levy_surcharge,
            low_income_offset,
            private_health_rebate_percent: rebate_percent,
            private_health_rebate_amount: rebate,
            help,
            super_contributions: round_half_up(input.super_contributions),
            total_tax,
            take_home_pay: gross_income - total_tax,
            outcome: TaxOutcome::from_balance(round_half_up(input.tax_withheld) - total_tax),
            effective_rate: ratio_percent(total_tax, gross_income),
        })
    }

    fn taxable_income(
        &self,
        gross_income: Decimal,
        deductions: Decimal,
    ) -> Decimal {
        non_negative(gross_income - deductions)
    }

    /// Non-residents are outside the Medicare system.
    fn medicare_levy(
        &self,
        taxable_income: Decimal,
        input: &TaxCalculationInput,
        resident: bool,
    ) -> Decimal {
        if !resident {
            return Decimal::ZERO;
        }
        medicare_levy(self.tables, taxable_income, input.dependents, input.is_family)
    }

    fn surcharge(
        &self,
        taxable_income: Decimal,
        input: &TaxCalculationInput,
        resident: bool,
    ) -> Decimal {
        if !resident {
            return Decimal::ZERO;
        }
        medicare_levy_surcharge(
            self.tables,
            taxable_income,
            input.has_private_health,
            input.is_family,
        )
    }

    fn low_income_offset(
        &self,
        taxable_income: Decimal,
        resident: bool,
    ) -> Decimal {
        if !resident {
            return Decimal::ZERO;
        }
        low_income_tax_offset(self.tables, taxable_income)
    }

    /// The rebate is tied to Medicare eligibility, like the levy.
    fn rebate_percent(
        &self,
        taxable_income: Decimal,
        input: &TaxCalculationInput,
        resident: bool,
    ) -> Decimal {
        if !resident {
            return Decimal::ZERO;
        }
        private_health_rebate(self.tables, taxable_income, input.age, input.is_family)
    }

    /// Only a taxpayer holding cover receives the rebate.
    fn rebate_amount(
        &self,
        input: &TaxCalculationInput,
        rebate_percent: Decimal,
    ) -> Decimal {
        if !input.has_private_health {
            return Decimal::ZERO;
        }
        rebate_amount(input.private_health_premium, rebate_percent)
    }

    fn help(
        &self,
        taxable_income: Decimal,
        input: &TaxCalculationInput,
    ) -> HelpRepayment {
        help_repayment(
            self.tables,
            taxable_income,
            input.help_balance,
            input.is_overseas,
        )
    }

    fn total_tax(
        &self,
        base_tax: Decimal,
        medicare_levy: Decimal,
        surcharge: Decimal,
        offset: Decimal,
        rebate: Decimal,
        help: Decimal,
    ) -> Decimal {
        non_negative(round_half_up(
            base_tax + medicare_levy + surcharge - offset - rebate + help,
        ))
    }
}
