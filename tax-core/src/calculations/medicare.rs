//! Medicare levy and Medicare levy surcharge.

use rust_decimal::Decimal;

use crate::calculations::brackets::flat_tier_rate;
use crate::calculations::common::{non_negative, round_half_up};
use crate::{ScheduleKind, TaxYearTables};

/// Medicare levy on taxable income.
///
/// Nothing is payable at or below the lower cut-off. Inside the phase-in
/// band only the reduced rate applies to the excess over the lower cut-off.
/// From the upper cut-off the full rate applies to the whole income. Family
/// cut-offs move up by the per-dependent allowance.
pub fn medicare_levy(
    tables: &TaxYearTables,
    income: Decimal,
    dependents: u32,
    is_family: bool,
) -> Decimal {
    let medicare = tables.medicare();
    let band = medicare.band_for(dependents, is_family);
    let income = non_negative(income);

    let levy = if income <= band.lower {
        Decimal::ZERO
    } else if income >= band.upper {
        income * medicare.rate
    } else {
        (income - band.lower) * medicare.rate * medicare.phase_in_factor
    };

    round_half_up(levy)
}

/// Medicare levy surcharge for taxpayers without private hospital cover.
///
/// The selected tier's rate applies to the whole income.
pub fn medicare_levy_surcharge(
    tables: &TaxYearTables,
    income: Decimal,
    has_private_health: bool,
    is_family: bool,
) -> Decimal {
    if has_private_health {
        return Decimal::ZERO;
    }

    let schedule = tables.schedule(surcharge_schedule(is_family));
    let income = non_negative(income);

    round_half_up(income * flat_tier_rate(schedule, income))
}

pub(crate) fn surcharge_schedule(is_family: bool) -> ScheduleKind {
    if is_family {
        ScheduleKind::SurchargeFamily
    } else {
        ScheduleKind::SurchargeIndividual
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn tables() -> TaxYearTables {
        TaxYearTables::fy2024_25()
    }

    // =========================================================================
    // medicare_levy tests
    // =========================================================================

    #[test]
    fn levy_is_zero_at_or_below_lower_threshold() {
        let tables = tables();

        assert_eq!(medicare_levy(&tables, dec!(0), 0, false), dec!(0));
        assert_eq!(medicare_levy(&tables, dec!(24276), 0, false), dec!(0));
    }

    #[test]
    fn levy_is_full_rate_from_upper_threshold() {
        let tables = tables();

        assert_eq!(medicare_levy(&tables, dec!(30345), 0, false), dec!(606.90));
        assert_eq!(medicare_levy(&tables, dec!(50000), 0, false), dec!(1000.00));
    }

    #[test]
    fn levy_phases_in_between_thresholds() {
        let tables = tables();

        let levy = medicare_levy(&tables, dec!(27276), 0, false);

        assert_eq!(levy, dec!(6.00)); // 3000 * 0.02 * 0.10
    }

    #[test]
    fn levy_family_thresholds_shift_with_dependents() {
        let tables = tables();

        // Family lower cut-off with two dependents is 48632.
        assert_eq!(medicare_levy(&tables, dec!(48632), 2, true), dec!(0));
        assert_eq!(medicare_levy(&tables, dec!(48632), 0, true), dec!(15.04)); // 7520 * 0.002
    }

    #[test]
    fn levy_is_non_decreasing_in_income() {
        let tables = tables();

        for (dependents, is_family) in [(0, false), (0, true), (3, true)] {
            let mut previous = Decimal::ZERO;
            let mut income = dec!(20000);
            while income <= dec!(70000) {
                let levy = medicare_levy(&tables, income, dependents, is_family);
                assert!(levy >= previous, "levy fell at {income}");
                previous = levy;
                income += dec!(250);
            }
        }
    }

    // =========================================================================
    // medicare_levy_surcharge tests
    // =========================================================================

    #[test]
    fn surcharge_is_zero_with_private_cover() {
        let tables = tables();

        for income in [dec!(50000), dec!(150000), dec!(1000000)] {
            assert_eq!(medicare_levy_surcharge(&tables, income, true, false), dec!(0));
            assert_eq!(medicare_levy_surcharge(&tables, income, true, true), dec!(0));
        }
    }

    #[test]
    fn surcharge_is_zero_below_first_tier() {
        let tables = tables();

        assert_eq!(medicare_levy_surcharge(&tables, dec!(92999), false, false), dec!(0));
    }

    #[test]
    fn surcharge_applies_tier_rate_to_whole_income() {
        let tables = tables();

        assert_eq!(medicare_levy_surcharge(&tables, dec!(93000), false, false), dec!(930.00));
        assert_eq!(medicare_levy_surcharge(&tables, dec!(120000), false, false), dec!(1500.00));
        assert_eq!(medicare_levy_surcharge(&tables, dec!(200000), false, false), dec!(3000.00));
    }

    #[test]
    fn surcharge_uses_family_tiers() {
        let tables = tables();

        assert_eq!(medicare_levy_surcharge(&tables, dec!(120000), false, true), dec!(0));
        assert_eq!(medicare_levy_surcharge(&tables, dec!(200000), false, true), dec!(2000.00));
    }
}
