//! Shared helpers for the tax calculations.
//!
//! Every component amount passes through [`round_half_up`] before it is
//! combined with others, so totals are sums of cent values.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds to whole cents, with half a cent going away from zero.
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::round_half_up;
///
/// // 2% levy on $24,300.25
/// assert_eq!(round_half_up(dec!(486.005)), dec!(486.01));
/// assert_eq!(round_half_up(dec!(486.004)), dec!(486.00));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Clamps a value at zero.
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::non_negative;
///
/// assert_eq!(non_negative(dec!(-5)), dec!(0));
/// assert_eq!(non_negative(dec!(5)), dec!(5));
/// ```
pub fn non_negative(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO)
}

/// `part` as a percentage of `whole`, or `None` when `whole` is zero.
pub fn ratio_percent(
    part: Decimal,
    whole: Decimal,
) -> Option<Decimal> {
    if whole.is_zero() {
        return None;
    }
    part.checked_div(whole)
        .map(|ratio| ratio * Decimal::ONE_HUNDRED)
}
