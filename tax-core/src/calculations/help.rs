//! HELP/HECS compulsory repayment.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::calculations::brackets::flat_tier_rate;
use crate::calculations::common::{non_negative, round_half_up};
use crate::{HelpRepayment, ScheduleKind, TaxYearTables};

/// Compulsory repayment, voluntary bonus and projected payoff time for an
/// outstanding HELP balance.
///
/// The selected repayment rate applies to the whole income. Overseas
/// taxpayers have the rate scaled by the table set's overseas multiplier.
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::TaxYearTables;
/// use tax_core::calculations::help_repayment;
///
/// let tables = TaxYearTables::fy2024_25();
/// let help = help_repayment(&tables, dec!(100000), dec!(20000), false);
///
/// assert_eq!(help.compulsory_amount, dec!(6000));
/// assert_eq!(help.voluntary_bonus, dec!(500));
/// assert_eq!(help.projected_years_to_repay, Some(4));
/// ```
pub fn help_repayment(
    tables: &TaxYearTables,
    income: Decimal,
    balance: Decimal,
    is_overseas: bool,
) -> HelpRepayment {
    if balance <= Decimal::ZERO {
        return HelpRepayment::none();
    }

    let rules = tables.help();
    let income = non_negative(income);

    let mut rate = flat_tier_rate(tables.schedule(ScheduleKind::HelpRepayment), income);
    if is_overseas {
        rate *= rules.overseas_multiplier;
    }

    let compulsory_amount = round_half_up(income * rate);
    let voluntary_bonus =
        round_half_up((balance * rules.voluntary_bonus_rate).min(rules.voluntary_bonus_cap));

    HelpRepayment {
        compulsory_amount,
        voluntary_bonus,
        projected_years_to_repay: years_to_repay(balance, compulsory_amount),
    }
}

fn years_to_repay(
    balance: Decimal,
    yearly: Decimal,
) -> Option<u32> {
    if yearly <= Decimal::ZERO {
        return None;
    }
    let years = balance
        .checked_div(yearly)
        .and_then(|years| years.ceil().to_u32())
        .unwrap_or(u32::MAX);
    Some(years)
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
    fn zero_balance_repays_nothing() {
        let tables = tables();

        for income in [dec!(0), dec!(60000), dec!(250000)] {
            let help = help_repayment(&tables, income, dec!(0), false);

            assert_eq!(help, HelpRepayment::none());
        }
    }

    #[test]
    fn income_below_first_threshold_never_repays() {
        let tables = tables();

        let help = help_repayment(&tables, dec!(40000), dec!(15000), false);

        assert_eq!(help.compulsory_amount, dec!(0));
        assert_eq!(help.voluntary_bonus, dec!(500));
        assert_eq!(help.projected_years_to_repay, None);
    }

    #[test]
    fn repayment_at_100000_uses_six_percent() {
        let tables = tables();

        let help = help_repayment(&tables, dec!(100000), dec!(20000), false);

        assert_eq!(
            help,
            HelpRepayment {
                compulsory_amount: dec!(6000.00),
                voluntary_bonus: dec!(500.00),
                projected_years_to_repay: Some(4),
            }
        );
    }

    #[test]
    fn overseas_multiplier_scales_rate() {
        let tables = tables();

        let help = help_repayment(&tables, dec!(100000), dec!(20000), true);

        assert_eq!(help.compulsory_amount, dec!(7500.00)); // 100000 * 0.06 * 1.25
        assert_eq!(help.projected_years_to_repay, Some(3));
    }

    #[test]
    fn voluntary_bonus_below_cap() {
        let tables = tables();

        let help = help_repayment(&tables, dec!(60000), dec!(4000), false);

        assert_eq!(help.voluntary_bonus, dec!(200.00));
    }

    #[test]
    fn years_saturate_instead_of_reading_as_never() {
        // 1e12 / 0.01 = 1e14 years
        assert_eq!(years_to_repay(dec!(1000000000000), dec!(0.01)), Some(u32::MAX));
        assert_eq!(years_to_repay(Decimal::MAX, dec!(0.0001)), Some(u32::MAX));
        assert_eq!(years_to_repay(dec!(1000), dec!(0)), None);
    }

    #[test]
    fn years_round_up_partial_year() {
        let tables = tables();

        // 2% at 60000 = 1200 per year; 2500 / 1200 = 2.08
        let help = help_repayment(&tables, dec!(60000), dec!(2500), false);

        assert_eq!(help.compulsory_amount, dec!(1200.00));
        assert_eq!(help.projected_years_to_repay, Some(3));
    }
}
