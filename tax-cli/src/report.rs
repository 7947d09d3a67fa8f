//! Plain-text and CSV rendering of estimate results.

use std::fmt::Write as _;
use std::io;

use rust_decimal::Decimal;
use serde::Serialize;
use tax_core::calculations::{PayBreakdown, PayRow};
use tax_core::{TaxCalculationResult, TaxOutcome, TaxYear};

use crate::utils::format_currency;

const LABEL_WIDTH: usize = 34;
const AMOUNT_WIDTH: usize = 14;

fn line(
    out: &mut String,
    label: &str,
    value: &str,
) {
    let _ = writeln!(out, "  {label:<LABEL_WIDTH$}{value:>AMOUNT_WIDTH$}");
}

fn money(
    out: &mut String,
    label: &str,
    amount: Decimal,
) {
    line(out, label, &format_currency(amount));
}

fn credit(
    out: &mut String,
    label: &str,
    amount: Decimal,
) {
    line(out, label, &format_currency(-amount));
}

/// Renders the full estimate for one taxpayer.
pub fn render_estimate(
    tax_year: TaxYear,
    result: &TaxCalculationResult,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Tax estimate for {tax_year}");
    let _ = writeln!(out);

    money(&mut out, "Gross income", result.gross_income);
    money(&mut out, "Deductions", result.deductions);
    money(&mut out, "Taxable income", result.taxable_income);
    let _ = writeln!(out);

    money(&mut out, "Income tax", result.base_tax);
    money(&mut out, "Medicare levy", result.medicare_levy);
    money(&mut out, "Medicare levy surcharge", result.medicare_levy_surcharge);
    credit(&mut out, "Low income tax offset", result.low_income_offset);
    credit(
        &mut out,
        &format!(
            "Private health rebate ({}%)",
            result.private_health_rebate_percent.normalize()
        ),
        result.private_health_rebate_amount,
    );
    money(&mut out, "HELP repayment", result.help.compulsory_amount);
    money(&mut out, "Total tax", result.total_tax);
    let _ = writeln!(out);

    money(&mut out, "Take-home pay", result.take_home_pay);
    money(&mut out, "Super contributions", result.super_contributions);
    match result.outcome {
        TaxOutcome::Refund(amount) => money(&mut out, "Estimated refund", amount),
        TaxOutcome::Debt(amount) => money(&mut out, "Estimated amount owing", amount),
    }
    line(&mut out, "Effective tax rate", &result.effective_rate_display());

    if !result.help.compulsory_amount.is_zero() || result.help.projected_years_to_repay != Some(0)
    {
        let _ = writeln!(out);
        let years = match result.help.projected_years_to_repay {
            Some(years) => years.to_string(),
            None => "never at this income".to_string(),
        };
        line(&mut out, "HELP years to repay", &years);
        money(&mut out, "HELP voluntary payment bonus", result.help.voluntary_bonus);
    }

    out
}

fn pay_row(
    out: &mut String,
    period: &str,
    row: &PayRow,
) {
    let _ = writeln!(
        out,
        "  {period:<12}{:>AMOUNT_WIDTH$}{:>AMOUNT_WIDTH$}{:>AMOUNT_WIDTH$}{:>AMOUNT_WIDTH$}",
        format_currency(row.gross),
        format_currency(row.super_amount),
        format_currency(row.tax),
        format_currency(row.take_home),
    );
}

/// Renders the per-period pay table.
pub fn render_breakdown(breakdown: &PayBreakdown) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "  {:<12}{:>AMOUNT_WIDTH$}{:>AMOUNT_WIDTH$}{:>AMOUNT_WIDTH$}{:>AMOUNT_WIDTH$}",
        "Period", "Gross", "Super", "Tax", "Take-home"
    );
    pay_row(&mut out, "Weekly", &breakdown.weekly);
    pay_row(&mut out, "Fortnightly", &breakdown.fortnightly);
    pay_row(&mut out, "Monthly", &breakdown.monthly);
    pay_row(&mut out, "Annual", &breakdown.annual);
    out
}

/// Pay table for an estimate: gross, super, total tax and take-home.
pub fn breakdown_for(result: &TaxCalculationResult) -> PayBreakdown {
    PayBreakdown::from_annual(
        result.gross_income,
        result.super_contributions,
        result.total_tax,
        result.take_home_pay,
    )
}

/// One CSV output row in batch mode.
#[derive(Debug, Serialize)]
pub struct BatchRow<'a> {
    pub label: &'a str,
    pub taxable_income: Decimal,
    pub base_tax: Decimal,
    pub medicare_levy: Decimal,
    pub medicare_levy_surcharge: Decimal,
    pub low_income_offset: Decimal,
    pub private_health_rebate: Decimal,
    pub help_repayment: Decimal,
    pub total_tax: Decimal,
    pub take_home_pay: Decimal,
    pub refund: Decimal,
    pub effective_rate: String,
}

impl<'a> BatchRow<'a> {
    pub fn new(
        label: &'a str,
        result: &TaxCalculationResult,
    ) -> Self {
        // Debts are shown as negative refunds so the column sorts sensibly.
        let refund = match result.outcome {
            TaxOutcome::Refund(amount) => amount,
            TaxOutcome::Debt(amount) => -amount,
        };
        Self {
            label,
            taxable_income: result.taxable_income,
            base_tax: result.base_tax,
            medicare_levy: result.medicare_levy,
            medicare_levy_surcharge: result.medicare_levy_surcharge,
            low_income_offset: result.low_income_offset,
            private_health_rebate: result.private_health_rebate_amount,
            help_repayment: result.help.compulsory_amount,
            total_tax: result.total_tax,
            take_home_pay: result.take_home_pay,
            refund,
            effective_rate: result.effective_rate_display(),
        }
    }
}

/// Writes batch rows as CSV with a header line.
pub fn write_batch<W: io::Write>(
    writer: W,
    rows: &[BatchRow<'_>],
) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use tax_core::calculations::TaxEstimator;
    use tax_core::{TaxCalculationInput, TaxYearTables};

    use super::*;

    fn estimate(input: TaxCalculationInput) -> TaxCalculationResult {
        let tables = TaxYearTables::fy2024_25();
        TaxEstimator::new(&tables).estimate(&input).unwrap()
    }

    fn resident(income: Decimal) -> TaxCalculationInput {
        TaxCalculationInput {
            annual_income: income,
            ..Default::default()
        }
    }

    #[test]
    fn estimate_report_shows_key_figures() {
        let result = estimate(resident(dec!(50000)));

        let report = render_estimate(TaxYear(2025), &result);

        assert!(report.starts_with("Tax estimate for 2024-25\n"));
        assert!(report.contains("$5,788.00"));
        assert!(report.contains("-$250.00"));
        assert!(report.contains("$43,462.00"));
        assert!(report.contains("13.08%"));
        assert!(!report.contains("HELP years to repay"));
    }

    #[test]
    fn estimate_report_labels_debt() {
        let result = estimate(TaxCalculationInput {
            tax_withheld: dec!(6000),
            ..resident(dec!(50000))
        });

        let report = render_estimate(TaxYear(2025), &result);

        assert!(report.contains("Estimated amount owing"));
        assert!(report.contains("$538.00"));
    }

    #[test]
    fn estimate_report_includes_help_projection() {
        let result = estimate(TaxCalculationInput {
            help_balance: dec!(20000),
            ..resident(dec!(80000))
        });

        let report = render_estimate(TaxYear(2025), &result);

        assert!(report.contains("HELP years to repay"));
    }

    #[test]
    fn breakdown_table_has_four_periods() {
        let result = estimate(resident(dec!(52000)));

        let table = render_breakdown(&breakdown_for(&result));

        assert_eq!(table.lines().count(), 5);
        assert!(table.contains("$1,000.00")); // weekly gross
    }

    #[test]
    fn batch_csv_has_header_and_negative_refund_for_debt() {
        let result = estimate(TaxCalculationInput {
            tax_withheld: dec!(6000),
            ..resident(dec!(50000))
        });
        let rows = vec![BatchRow::new("alex", &result)];
        let mut buf = Vec::new();

        write_batch(&mut buf, &rows).unwrap();

        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some(
                "label,taxable_income,base_tax,medicare_levy,medicare_levy_surcharge,\
low_income_offset,private_health_rebate,help_repayment,total_tax,take_home_pay,refund,effective_rate"
            )
        );
        let fields: Vec<&str> = lines.next().unwrap().split(',').collect();
        let amount = |i: usize| fields[i].parse::<Decimal>().unwrap();
        assert_eq!(fields[0], "alex");
        assert_eq!(amount(1), dec!(50000));
        assert_eq!(amount(2), dec!(5788));
        assert_eq!(amount(5), dec!(250));
        assert_eq!(amount(10), dec!(-538));
        assert_eq!(fields[11], "13.08%");
    }
}
