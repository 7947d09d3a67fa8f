//! Pay-period conversion and superannuation split.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::calculations::common::{non_negative, round_half_up};

/// Superannuation guarantee rate used when none is supplied, in percent.
pub const DEFAULT_SUPER_RATE: Decimal = dec!(11.0);

const WEEKS_PER_YEAR: Decimal = dec!(52);
const FORTNIGHTS_PER_YEAR: Decimal = dec!(26);
const MONTHS_PER_YEAR: Decimal = dec!(12);

/// How often a quoted pay amount is earned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "period", rename_all = "snake_case")]
pub enum PayPeriod {
    Hourly { hours_per_week: Decimal },
    Weekly,
    Fortnightly,
    Monthly,
    Annual,
}

/// Converts a pay amount quoted per `period` into an annual figure.
///
/// Returns `None` when the annual figure does not fit in a [`Decimal`].
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::{PayPeriod, annualise};
///
/// assert_eq!(annualise(dec!(1000), PayPeriod::Weekly), Some(dec!(52000)));
/// assert_eq!(
///     annualise(dec!(40), PayPeriod::Hourly { hours_per_week: dec!(38) }),
///     Some(dec!(79040))
/// );
/// ```
pub fn annualise(
    amount: Decimal,
    period: PayPeriod,
) -> Option<Decimal> {
    match period {
        PayPeriod::Hourly { hours_per_week } => amount
            .checked_mul(hours_per_week)?
            .checked_mul(WEEKS_PER_YEAR),
        PayPeriod::Weekly => amount.checked_mul(WEEKS_PER_YEAR),
        PayPeriod::Fortnightly => amount.checked_mul(FORTNIGHTS_PER_YEAR),
        PayPeriod::Monthly => amount.checked_mul(MONTHS_PER_YEAR),
        PayPeriod::Annual => Some(amount),
    }
}

/// Salary and super portions of an annual package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuperSplit {
    pub salary: Decimal,
    pub super_amount: Decimal,
}

/// Separates super from a package.
///
/// When the package already includes super, the super portion is backed
/// out (`annual * rate / (100 + rate)`) and salary is the remainder.
/// Otherwise super is paid on top and the whole amount is salary.
/// Returns `None` when the super amount does not fit in a [`Decimal`].
pub fn split_super(
    annual: Decimal,
    rate_percent: Decimal,
    package_includes_super: bool,
) -> Option<SuperSplit> {
    let rate = non_negative(rate_percent);
    let scaled = annual.checked_mul(rate)?;

    let split = if package_includes_super {
        let super_amount =
            round_half_up(scaled.checked_div(Decimal::ONE_HUNDRED.checked_add(rate)?)?);
        SuperSplit {
            salary: annual - super_amount,
            super_amount,
        }
    } else {
        SuperSplit {
            salary: annual,
            super_amount: round_half_up(scaled / Decimal::ONE_HUNDRED),
        }
    };
    Some(split)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayRow {
    pub gross: Decimal,
    pub super_amount: Decimal,
    pub tax: Decimal,
    pub take_home: Decimal,
}

impl PayRow {
    fn per(
        annual: &PayRow,
        periods: Decimal,
    ) -> Self {
        Self {
            gross: round_half_up(annual.gross / periods),
            super_amount: round_half_up(annual.super_amount / periods),
            tax: round_half_up(annual.tax / periods),
            take_home: round_half_up(annual.take_home / periods),
        }
    }
}

/// Annual figures restated per week, fortnight and month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayBreakdown {
    pub weekly: PayRow,
    pub fortnightly: PayRow,
    pub monthly: PayRow,
    pub annual: PayRow,
}

impl PayBreakdown {
    pub fn from_annual(
        gross: Decimal,
        super_amount: Decimal,
        tax: Decimal,
        take_home: Decimal,
    ) -> Self {
        let annual = PayRow {
            gross,
            super_amount,
            tax,
            take_home,
        };
        Self {
            weekly: PayRow::per(&annual, WEEKS_PER_YEAR),
            fortnightly: PayRow::per(&annual, FORTNIGHTS_PER_YEAR),
            monthly: PayRow::per(&annual, MONTHS_PER_YEAR),
            annual,
        }
    }
}
