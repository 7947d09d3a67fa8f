//! Private health insurance rebate.

use rust_decimal::Decimal;

use crate::TaxYearTables;
use crate::calculations::brackets::flat_tier_index;
use crate::calculations::common::round_half_up;
use crate::calculations::medicare::surcharge_schedule;

/// Rebate entitlement as a percentage of premiums.
///
/// The age band picks the base percentage; the income tier (the same tier
/// selection the surcharge uses) scales it down, reaching zero at the top
/// tier. Rounded to three decimal places, the precision rebate
/// percentages are published at.
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::TaxYearTables;
/// use tax_core::calculations::private_health_rebate;
///
/// let tables = TaxYearTables::fy2024_25();
///
/// assert_eq!(private_health_rebate(&tables, dec!(60000), 40, false), dec!(24.608));
/// assert_eq!(private_health_rebate(&tables, dec!(60000), 72, false), dec!(32.812));
/// ```
pub fn private_health_rebate(
    tables: &TaxYearTables,
    income: Decimal,
    age: u32,
    is_family: bool,
) -> Decimal {
    let rebate = tables.rebate();
    let base = match age {
        70.. => rebate.age.age_70_plus,
        65..=69 => rebate.age.age_65_to_69,
        _ => rebate.age.under_65,
    };

    let schedule = tables.schedule(surcharge_schedule(is_family));
    let tier = flat_tier_index(schedule, income).unwrap_or(0);

    (base * rebate.tiers.for_tier(tier)).round_dp(3)
}

/// Dollar value of a rebate percentage against the premium paid.
pub fn rebate_amount(
    premium: Decimal,
    rebate_percent: Decimal,
) -> Decimal {
    round_half_up(premium * rebate_percent / Decimal::ONE_HUNDRED)
}
