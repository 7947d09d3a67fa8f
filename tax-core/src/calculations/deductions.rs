//! Work-related deduction calculators.
//!
//! These produce the single `deductions` figure fed into
//! [`crate::TaxCalculationInput`]. Every function returns an amount rounded
//! to cents.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::InputError;
use crate::calculations::common::{non_negative, round_half_up};
use crate::models::{check_amounts, check_percent};

/// Share of internet costs treated as work use.
const INTERNET_WORK_SHARE: Decimal = dec!(0.5);
const EQUIPMENT_DEPRECIATION_RATE: Decimal = dec!(0.4);
const FURNITURE_DEPRECIATION_RATE: Decimal = dec!(0.2);
const DAYS_PER_YEAR: Decimal = dec!(365);
const MAX_DAYS_WORKED: u32 = 366;

pub const FIXED_RATE_PER_HOUR: Decimal = dec!(0.52);
pub const SHORTCUT_RATE_PER_HOUR: Decimal = dec!(0.80);
pub const CENTS_PER_KM_RATE: Decimal = dec!(0.725);
pub const CENTS_PER_KM_CAP: Decimal = dec!(5000);

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HomeOfficeExpenses {
    pub electricity: Decimal,
    pub gas: Decimal,
    pub water: Decimal,
    pub internet: Decimal,
    pub phone: Decimal,
    pub office_equipment: Decimal,
    pub furniture: Decimal,
    pub repairs: Decimal,
    pub cleaning: Decimal,
    pub rent: Decimal,
    pub mortgage_interest: Decimal,
    pub insurance: Decimal,
    pub council_rates: Decimal,
}

impl HomeOfficeExpenses {
    fn amounts(&self) -> [(&'static str, Decimal); 13] {
        [
            ("home_office.electricity", self.electricity),
            ("home_office.gas", self.gas),
            ("home_office.water", self.water),
            ("home_office.internet", self.internet),
            ("home_office.phone", self.phone),
            ("home_office.office_equipment", self.office_equipment),
            ("home_office.furniture", self.furniture),
            ("home_office.repairs", self.repairs),
            ("home_office.cleaning", self.cleaning),
            ("home_office.rent", self.rent),
            ("home_office.mortgage_interest", self.mortgage_interest),
            ("home_office.insurance", self.insurance),
            ("home_office.council_rates", self.council_rates),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleExpenses {
    pub fuel: Decimal,
    pub registration: Decimal,
    pub insurance: Decimal,
    pub repairs: Decimal,
    pub depreciation: Decimal,
    pub lease: Decimal,
    pub tolls: Decimal,
    pub parking: Decimal,
}

impl VehicleExpenses {
    fn amounts(&self) -> [(&'static str, Decimal); 8] {
        [
            ("vehicle.fuel", self.fuel),
            ("vehicle.registration", self.registration),
            ("vehicle.insurance", self.insurance),
            ("vehicle.repairs", self.repairs),
            ("vehicle.depreciation", self.depreciation),
            ("vehicle.lease", self.lease),
            ("vehicle.tolls", self.tolls),
            ("vehicle.parking", self.parking),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HourlyMethod {
    FixedRate,
    Shortcut,
}

impl HourlyMethod {
    pub fn rate(&self) -> Decimal {
        match self {
            Self::FixedRate => FIXED_RATE_PER_HOUR,
            Self::Shortcut => SHORTCUT_RATE_PER_HOUR,
        }
    }
}

/// Home office claim using actual costs.
///
/// Running, occupancy and maintenance costs are apportioned by the share of
/// the year worked from home and the share of the home used for work.
/// Equipment and furniture are depreciated in full at their own rates.
pub fn home_office_actual(
    expenses: &HomeOfficeExpenses,
    work_use_percent: Decimal,
    days_worked: u32,
) -> Decimal {
    let apportion = Decimal::from(days_worked) / DAYS_PER_YEAR * work_use_percent
        / Decimal::ONE_HUNDRED;

    let running = expenses.electricity
        + expenses.gas
        + expenses.water
        + expenses.internet * INTERNET_WORK_SHARE
        + expenses.phone;
    let occupancy =
        expenses.rent + expenses.mortgage_interest + expenses.insurance + expenses.council_rates;
    let maintenance = expenses.repairs + expenses.cleaning;
    let depreciation = expenses.office_equipment * EQUIPMENT_DEPRECIATION_RATE
        + expenses.furniture * FURNITURE_DEPRECIATION_RATE;

    round_half_up((running + occupancy + maintenance) * apportion + depreciation)
}

/// Home office claim at a flat rate per hour worked from home.
pub fn home_office_hourly(
    hours: Decimal,
    method: HourlyMethod,
) -> Decimal {
    round_half_up(non_negative(hours) * method.rate())
}

/// Vehicle claim using actual costs. Tolls and parking are claimed in full.
pub fn vehicle_actual(
    expenses: &VehicleExpenses,
    work_use_percent: Decimal,
) -> Decimal {
    let share = work_use_percent / Decimal::ONE_HUNDRED;
    let running = expenses.fuel
        + expenses.registration
        + expenses.insurance
        + expenses.repairs
        + expenses.lease;

    round_half_up((running + expenses.depreciation) * share + expenses.tolls + expenses.parking)
}

/// Vehicle claim at the per-kilometre rate, capped at 5,000 km.
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::vehicle_cents_per_km;
///
/// assert_eq!(vehicle_cents_per_km(dec!(1000)), dec!(725));
/// assert_eq!(vehicle_cents_per_km(dec!(8000)), dec!(3625));
/// ```
pub fn vehicle_cents_per_km(km: Decimal) -> Decimal {
    round_half_up(non_negative(km).min(CENTS_PER_KM_CAP) * CENTS_PER_KM_RATE)
}

/// Sum of industry-specific deductions (tools, uniforms, licences and so on).
pub fn industry_total(items: &[Decimal]) -> Decimal {
    round_half_up(items.iter().copied().sum())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum HomeOfficeClaim {
    Actual {
        expenses: HomeOfficeExpenses,
        work_use_percent: Decimal,
        days_worked: u32,
    },
    Hourly {
        hours: Decimal,
        rate: HourlyMethod,
    },
}

impl HomeOfficeClaim {
    pub fn amount(&self) -> Decimal {
        match self {
            Self::Actual {
                expenses,
                work_use_percent,
                days_worked,
            } => home_office_actual(expenses, *work_use_percent, *days_worked),
            Self::Hourly { hours, rate } => home_office_hourly(*hours, *rate),
        }
    }

    fn validate(&self) -> Result<(), InputError> {
        match self {
            Self::Actual {
                expenses,
                work_use_percent,
                days_worked,
            } => {
                check_amounts(&expenses.amounts())?;
                check_percent("home_office.work_use_percent", *work_use_percent)?;
                if *days_worked > MAX_DAYS_WORKED {
                    return Err(InputError::DaysOutOfRange(*days_worked));
                }
                Ok(())
            }
            Self::Hourly { hours, .. } => check_amounts(&[("home_office.hours", *hours)]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum VehicleClaim {
    Actual {
        expenses: VehicleExpenses,
        work_use_percent: Decimal,
    },
    CentsPerKm {
        km: Decimal,
    },
}

impl VehicleClaim {
    pub fn amount(&self) -> Decimal {
        match self {
            Self::Actual {
                expenses,
                work_use_percent,
            } => vehicle_actual(expenses, *work_use_percent),
            Self::CentsPerKm { km } => vehicle_cents_per_km(*km),
        }
    }

    fn validate(&self) -> Result<(), InputError> {
        match self {
            Self::Actual {
                expenses,
                work_use_percent,
            } => {
                check_amounts(&expenses.amounts())?;
                check_percent("vehicle.work_use_percent", *work_use_percent)
            }
            Self::CentsPerKm { km } => check_amounts(&[("vehicle.km", *km)]),
        }
    }
}

/// Every deduction a taxpayer claims, collapsed into one total by
/// [`DeductionClaim::total`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeductionClaim {
    pub home_office: Option<HomeOfficeClaim>,
    pub vehicle: Option<VehicleClaim>,
    pub industry: Vec<Decimal>,
    /// Other deductions claimed as plain amounts (donations, tax agent fees).
    pub other: Vec<Decimal>,
}

impl DeductionClaim {
    /// Rejects negative or oversized amounts, work-use percentages outside
    /// 0..=100 and more days worked than a year holds.
    pub fn validate(&self) -> Result<(), InputError> {
        if let Some(home_office) = &self.home_office {
            home_office.validate()?;
        }
        if let Some(vehicle) = &self.vehicle {
            vehicle.validate()?;
        }
        for &item in &self.industry {
            check_amounts(&[("industry", item)])?;
        }
        for &item in &self.other {
            check_amounts(&[("other", item)])?;
        }
        Ok(())
    }

    pub fn total(&self) -> Decimal {
        let home_office = self
            .home_office
            .as_ref()
            .map_or(Decimal::ZERO, HomeOfficeClaim::amount);
        let vehicle = self
            .vehicle
            .as_ref()
            .map_or(Decimal::ZERO, VehicleClaim::amount);

        round_half_up(
            home_office + vehicle + industry_total(&self.industry) + industry_total(&self.other),
        )
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    // =========================================================================
    // home office tests
    // =========================================================================

    #[test]
    fn home_office_actual_full_year_full_use() {
        let expenses = HomeOfficeExpenses {
            electricity: dec!(1000),
            internet: dec!(800),
            office_equipment: dec!(2000),
            furniture: dec!(500),
            ..Default::default()
        };

        let amount = home_office_actual(&expenses, dec!(100), 365);

        // 1000 + 400 running, 800 + 100 depreciation
        assert_eq!(amount, dec!(2300));
    }

    #[test]
    fn home_office_actual_apportions_running_costs() {
        let expenses = HomeOfficeExpenses {
            electricity: dec!(730),
            ..Default::default()
        };

        let amount = home_office_actual(&expenses, dec!(50), 73);

        assert_eq!(amount, dec!(73.00)); // 730 * 0.2 * 0.5
    }

    #[test]
    fn home_office_actual_depreciation_ignores_apportioning() {
        let expenses = HomeOfficeExpenses {
            furniture: dec!(1000),
            ..Default::default()
        };

        assert_eq!(home_office_actual(&expenses, dec!(0), 0), dec!(200));
    }

    #[test]
    fn home_office_hourly_rates() {
        assert_eq!(home_office_hourly(dec!(100), HourlyMethod::FixedRate), dec!(52.00));
        assert_eq!(home_office_hourly(dec!(100), HourlyMethod::Shortcut), dec!(80.00));
    }

    // =========================================================================
    // vehicle tests
    // =========================================================================

    #[test]
    fn vehicle_actual_scales_running_costs_only() {
        let expenses = VehicleExpenses {
            fuel: dec!(3000),
            registration: dec!(800),
            depreciation: dec!(1200),
            tolls: dec!(150),
            parking: dec!(50),
            ..Default::default()
        };

        let amount = vehicle_actual(&expenses, dec!(25));

        assert_eq!(amount, dec!(1450.00)); // 5000 * 0.25 + 200
    }

    #[test]
    fn vehicle_cents_per_km_caps_distance() {
        assert_eq!(vehicle_cents_per_km(dec!(5000)), dec!(3625));
        assert_eq!(vehicle_cents_per_km(dec!(12000)), dec!(3625));
        assert_eq!(vehicle_cents_per_km(dec!(-10)), dec!(0));
    }

    // =========================================================================
    // totals
    // =========================================================================

    #[test]
    fn industry_total_sums_items() {
        assert_eq!(industry_total(&[dec!(120.50), dec!(79.50), dec!(300)]), dec!(500));
        assert_eq!(industry_total(&[]), dec!(0));
    }

    #[test]
    fn claim_total_combines_all_methods() {
        let claim = DeductionClaim {
            home_office: Some(HomeOfficeClaim::Hourly {
                hours: dec!(500),
                rate: HourlyMethod::Shortcut,
            }),
            vehicle: Some(VehicleClaim::CentsPerKm { km: dec!(2000) }),
            industry: vec![dec!(250)],
            other: vec![dec!(100), dec!(50)],
        };

        assert_eq!(claim.total(), dec!(2250)); // 400 + 1450 + 250 + 150
    }

    #[test]
    fn empty_claim_is_zero() {
        assert_eq!(DeductionClaim::default().total(), dec!(0));
    }

    // =========================================================================
    // claim validation
    // =========================================================================

    #[test]
    fn well_formed_claim_validates() {
        let claim = DeductionClaim {
            home_office: Some(HomeOfficeClaim::Actual {
                expenses: HomeOfficeExpenses {
                    electricity: dec!(900),
                    ..Default::default()
                },
                work_use_percent: dec!(100),
                days_worked: 365,
            }),
            vehicle: Some(VehicleClaim::Actual {
                expenses: VehicleExpenses {
                    fuel: dec!(1000),
                    ..Default::default()
                },
                work_use_percent: dec!(0),
            }),
            industry: vec![dec!(0)],
            other: vec![dec!(75)],
        };

        assert_eq!(claim.validate(), Ok(()));
    }

    #[test]
    fn negative_work_use_is_rejected() {
        let claim = DeductionClaim {
            vehicle: Some(VehicleClaim::Actual {
                expenses: VehicleExpenses {
                    fuel: dec!(1000),
                    ..Default::default()
                },
                work_use_percent: dec!(-300),
            }),
            other: vec![dec!(-2000)],
            ..Default::default()
        };

        assert_eq!(
            claim.validate(),
            Err(InputError::PercentOutOfRange {
                field: "vehicle.work_use_percent",
                value: dec!(-300),
            })
        );
    }

    #[test]
    fn work_use_above_hundred_is_rejected() {
        let claim = DeductionClaim {
            home_office: Some(HomeOfficeClaim::Actual {
                expenses: HomeOfficeExpenses::default(),
                work_use_percent: dec!(150),
                days_worked: 200,
            }),
            ..Default::default()
        };

        assert!(matches!(
            claim.validate(),
            Err(InputError::PercentOutOfRange { field: "home_office.work_use_percent", .. })
        ));
    }

    #[test]
    fn negative_items_are_rejected() {
        let claim = DeductionClaim {
            industry: vec![dec!(120), dec!(-5)],
            ..Default::default()
        };

        assert_eq!(
            claim.validate(),
            Err(InputError::NegativeAmount {
                field: "industry",
                value: dec!(-5),
            })
        );

        let claim = DeductionClaim {
            other: vec![dec!(-2000)],
            ..Default::default()
        };

        assert!(matches!(
            claim.validate(),
            Err(InputError::NegativeAmount { field: "other", .. })
        ));
    }

    #[test]
    fn negative_expense_is_rejected() {
        let claim = DeductionClaim {
            home_office: Some(HomeOfficeClaim::Actual {
                expenses: HomeOfficeExpenses {
                    rent: dec!(-10),
                    ..Default::default()
                },
                work_use_percent: dec!(20),
                days_worked: 100,
            }),
            ..Default::default()
        };

        assert!(matches!(
            claim.validate(),
            Err(InputError::NegativeAmount { field: "home_office.rent", .. })
        ));
    }

    #[test]
    fn more_days_than_a_year_is_rejected() {
        let claim = DeductionClaim {
            home_office: Some(HomeOfficeClaim::Actual {
                expenses: HomeOfficeExpenses::default(),
                work_use_percent: dec!(50),
                days_worked: 400,
            }),
            ..Default::default()
        };

        assert_eq!(claim.validate(), Err(InputError::DaysOutOfRange(400)));
    }

    #[test]
    fn oversized_distance_is_rejected() {
        let claim = DeductionClaim {
            vehicle: Some(VehicleClaim::CentsPerKm { km: Decimal::MAX }),
            ..Default::default()
        };

        assert!(matches!(
            claim.validate(),
            Err(InputError::AmountTooLarge { field: "vehicle.km", .. })
        ));
    }
}
