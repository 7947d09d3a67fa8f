//! Tax calculation modules.
//!
//! Each component (income tax, Medicare levy, surcharge, rebate, HELP and
//! the low income offset) is a pure function over a [`crate::TaxYearTables`].
//! [`TaxEstimator`] combines them into a full estimate.

pub mod brackets;
pub mod common;
pub mod deductions;
pub mod estimator;
pub mod help;
pub mod medicare;
pub mod offsets;
pub mod pay;
pub mod rebate;

pub use brackets::{base_tax, flat_tier_index, flat_tier_rate, marginal_tax, marginal_tax_bottom_up};
pub use deductions::{
    DeductionClaim, HomeOfficeClaim, HomeOfficeExpenses, HourlyMethod, VehicleClaim,
    VehicleExpenses, home_office_actual, home_office_hourly, industry_total, vehicle_actual,
    vehicle_cents_per_km,
};
pub use estimator::TaxEstimator;
pub use help::help_repayment;
pub use medicare::{medicare_levy, medicare_levy_surcharge};
pub use offsets::low_income_tax_offset;
pub use pay::{DEFAULT_SUPER_RATE, PayBreakdown, PayPeriod, PayRow, SuperSplit, annualise, split_super};
pub use rebate::{private_health_rebate, rebate_amount};
