//! Low Income Tax Offset.

use rust_decimal::Decimal;

use crate::TaxYearTables;
use crate::calculations::common::{non_negative, round_half_up};

/// Low Income Tax Offset for a taxable income.
///
/// The full offset applies up to the first threshold. It then shrinks by
/// the first rate until the second threshold, and by the second rate after
/// that. No offset is available from the cut-off up. Never negative.
pub fn low_income_tax_offset(
    tables: &TaxYearTables,
    income: Decimal,
) -> Decimal {
    let p = tables.low_income_offset();

    if income >= p.cut_off {
        return Decimal::ZERO;
    }

    let offset = if income <= p.first_threshold {
        p.max_offset
    } else if income <= p.second_threshold {
        p.max_offset - (income - p.first_threshold) * p.first_rate
    } else {
        let at_second = p.max_offset - (p.second_threshold - p.first_threshold) * p.first_rate;
        at_second - (income - p.second_threshold) * p.second_rate
    };

    round_half_up(non_negative(offset))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn tables() -> TaxYearTables {
        TaxYearTables::fy2024_25()
    }

    #[test]
    fn full_offset_up_to_first_threshold() {
        let tables = tables();

        assert_eq!(low_income_tax_offset(&tables, dec!(0)), dec!(700));
        assert_eq!(low_income_tax_offset(&tables, dec!(37500)), dec!(700));
    }

    #[test]
    fn first_phase_out_reaches_325_at_second_threshold() {
        let tables = tables();

        assert_eq!(low_income_tax_offset(&tables, dec!(40000)), dec!(575.00));
        assert_eq!(low_income_tax_offset(&tables, dec!(45000)), dec!(325.00));
    }

    #[test]
    fn second_phase_out_at_50000() {
        let tables = tables();

        assert_eq!(low_income_tax_offset(&tables, dec!(50000)), dec!(250.00));
    }

    #[test]
    fn offset_is_zero_from_cut_off() {
        let tables = tables();

        assert_eq!(low_income_tax_offset(&tables, dec!(66667)), dec!(0));
        assert_eq!(low_income_tax_offset(&tables, dec!(120000)), dec!(0));
    }

    #[test]
    fn offset_just_below_cut_off_is_small_but_not_negative() {
        let tables = tables();

        let offset = low_income_tax_offset(&tables, dec!(66666));

        assert_eq!(offset, dec!(0.01)); // 325 - 21666 * 0.015
    }
}
