//! Bracket schedule evaluation.
//!
//! Income tax is marginal: each rate applies only to the slice of income
//! inside its bracket. The surcharge and HELP schedules are flat tiers: one
//! tier is selected and its rate applies to the whole income. The two
//! strategies are deliberately separate functions.

use rust_decimal::Decimal;

use crate::calculations::common::{non_negative, round_half_up};
use crate::{BracketSchedule, Residency, ScheduleKind, TaxYearTables};

/// Progressive tax on `income` under a marginal schedule.
///
/// Walks the brackets from the highest threshold down, taxing the part of
/// the remaining income above each threshold and then clamping the
/// remainder to it. Income at or below the lowest threshold yields zero.
/// Negative income is treated as zero.
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::marginal_tax;
/// use tax_core::{ScheduleKind, TaxYearTables};
///
/// let tables = TaxYearTables::fy2024_25();
/// let tax = marginal_tax(tables.schedule(ScheduleKind::Resident), dec!(50000));
///
/// assert_eq!(tax, dec!(5788));
/// ```
pub fn marginal_tax(
    schedule: &BracketSchedule,
    income: Decimal,
) -> Decimal {
    let mut remaining = non_negative(income);
    let mut tax = Decimal::ZERO;

    for bracket in schedule.brackets().iter().rev() {
        if remaining > bracket.threshold {
            tax += (remaining - bracket.threshold) * bracket.rate;
            remaining = bracket.threshold;
        }
    }

    tax
}

/// Same result as [`marginal_tax`], computed by summing each bracket's own
/// slice from the bottom up.
pub fn marginal_tax_bottom_up(
    schedule: &BracketSchedule,
    income: Decimal,
) -> Decimal {
    let income = non_negative(income);
    let brackets = schedule.brackets();

    brackets
        .iter()
        .enumerate()
        .map(|(i, bracket)| {
            let ceiling = brackets
                .get(i + 1)
                .map_or(income, |next| next.threshold.min(income));
            non_negative(ceiling - bracket.threshold) * bracket.rate
        })
        .sum()
}

/// Index of the tier whose threshold is the highest one not exceeding
/// `income`, or `None` when income is below every threshold.
pub fn flat_tier_index(
    schedule: &BracketSchedule,
    income: Decimal,
) -> Option<usize> {
    schedule
        .brackets()
        .iter()
        .rposition(|bracket| bracket.threshold <= income)
}

/// Rate of the tier selected by [`flat_tier_index`]; zero when no tier
/// applies.
pub fn flat_tier_rate(
    schedule: &BracketSchedule,
    income: Decimal,
) -> Decimal {
    flat_tier_index(schedule, income)
        .map_or(Decimal::ZERO, |i| schedule.brackets()[i].rate)
}

/// Income tax on taxable income for the given residency, rounded to cents.
pub fn base_tax(
    tables: &TaxYearTables,
    taxable_income: Decimal,
    residency: Residency,
) -> Decimal {
    let kind = match residency {
        Residency::Resident => ScheduleKind::Resident,
        Residency::NonResident => ScheduleKind::NonResident,
    };
    round_half_up(marginal_tax(tables.schedule(kind), taxable_income))
}
