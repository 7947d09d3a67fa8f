//! Raw form values and their conversion into a [`TaxCalculationInput`].
//!
//! Every money and count field arrives as text, exactly as a user typed it.
//! Empty fields mean zero; anything else that does not parse is an error
//! naming the field, never a silent zero.

use rust_decimal::Decimal;
use tax_core::calculations::{
    DEFAULT_SUPER_RATE, PayPeriod, SuperSplit, annualise, split_super,
};
use tax_core::{MAX_AMOUNT, Residency, TaxCalculationInput};
use thiserror::Error;

use crate::utils::{ParseCountError, ParseDecimalError, parse_count, parse_decimal};

#[derive(Debug, Error)]
pub enum FormError {
    #[error("{field}: {source}")]
    Decimal {
        field: &'static str,
        #[source]
        source: ParseDecimalError,
    },

    #[error("{field}: {source}")]
    Count {
        field: &'static str,
        #[source]
        source: ParseCountError,
    },

    #[error("{field}: amount is too large")]
    TooLarge { field: &'static str },
}

/// How often the quoted salary is paid, before hours are known.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum PayFrequency {
    Hourly,
    Weekly,
    Fortnightly,
    Monthly,
    #[default]
    Annual,
}

/// One submission of the estimator form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EstimateForm {
    pub salary: String,
    pub frequency: PayFrequency,
    pub hours_per_week: String,
    /// Super guarantee rate in percent; empty means the default rate.
    pub super_rate: String,
    pub salary_includes_super: bool,
    pub other_income: String,
    pub fringe_benefits: String,
    pub deductions: String,
    pub tax_withheld: String,
    pub non_resident: bool,
    pub family: bool,
    pub dependents: String,
    pub private_health: bool,
    pub premium: String,
    pub age: String,
    pub overseas: bool,
    pub help_balance: String,
}

impl EstimateForm {
    /// Parses every field and builds the engine input.
    ///
    /// The salary is annualised by its pay frequency, then split into
    /// salary and super: a package that includes super has the super
    /// portion backed out of taxable salary.
    pub fn to_input(&self) -> Result<TaxCalculationInput, FormError> {
        let salary = decimal("salary", &self.salary)?;
        let period = match self.frequency {
            PayFrequency::Hourly => PayPeriod::Hourly {
                hours_per_week: decimal("hours_per_week", &self.hours_per_week)?,
            },
            PayFrequency::Weekly => PayPeriod::Weekly,
            PayFrequency::Fortnightly => PayPeriod::Fortnightly,
            PayFrequency::Monthly => PayPeriod::Monthly,
            PayFrequency::Annual => PayPeriod::Annual,
        };

        let super_rate = if self.super_rate.trim().is_empty() {
            DEFAULT_SUPER_RATE
        } else {
            decimal("super_rate", &self.super_rate)?
        };
        let annual = annualise(salary, period)
            .filter(|annual| *annual <= MAX_AMOUNT)
            .ok_or(FormError::TooLarge { field: "salary" })?;
        let SuperSplit {
            salary: annual_income,
            super_amount,
        } = split_super(annual, super_rate, self.salary_includes_super)
            .ok_or(FormError::TooLarge { field: "super_rate" })?;

        Ok(TaxCalculationInput {
            annual_income,
            other_income: decimal("other_income", &self.other_income)?,
            fringe_benefits: decimal("fringe_benefits", &self.fringe_benefits)?,
            super_contributions: super_amount,
            deductions: decimal("deductions", &self.deductions)?,
            tax_withheld: decimal("tax_withheld", &self.tax_withheld)?,
            residency: if self.non_resident {
                Residency::NonResident
            } else {
                Residency::Resident
            },
            is_family: self.family,
            dependents: count("dependents", &self.dependents)?,
            has_private_health: self.private_health,
            private_health_premium: decimal("premium", &self.premium)?,
            age: if self.age.trim().is_empty() {
                TaxCalculationInput::default().age
            } else {
                count("age", &self.age)?
            },
            is_overseas: self.overseas,
            help_balance: decimal("help_balance", &self.help_balance)?,
        })
    }
}

fn decimal(
    field: &'static str,
    raw: &str,
) -> Result<Decimal, FormError> {
    parse_decimal(raw).map_err(|source| FormError::Decimal { field, source })
}

fn count(
    field: &'static str,
    raw: &str,
) -> Result<u32, FormError> {
    parse_count(raw).map_err(|source| FormError::Count { field, source })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn form(salary: &str) -> EstimateForm {
        EstimateForm {
            salary: salary.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn empty_form_is_zero_income_resident() {
        let input = EstimateForm::default().to_input().unwrap();

        assert_eq!(input.annual_income, dec!(0));
        assert_eq!(input.residency, Residency::Resident);
        assert_eq!(input.age, 30);
    }

    #[test]
    fn annual_salary_with_separators() {
        let input = form("50,000").to_input().unwrap();

        assert_eq!(input.annual_income, dec!(50000));
        assert_eq!(input.super_contributions, dec!(5500)); // 11% on top
    }

    #[test]
    fn hourly_salary_uses_hours_per_week() {
        let form = EstimateForm {
            salary: "40".to_string(),
            frequency: PayFrequency::Hourly,
            hours_per_week: "38".to_string(),
            super_rate: "0".to_string(),
            ..Default::default()
        };

        let input = form.to_input().unwrap();

        assert_eq!(input.annual_income, dec!(79040));
    }

    #[test]
    fn huge_weekly_salary_is_rejected_not_overflowed() {
        let form = EstimateForm {
            salary: "79228162514264337593543950335".to_string(),
            frequency: PayFrequency::Weekly,
            ..Default::default()
        };

        let err = form.to_input().unwrap_err();

        assert!(matches!(err, FormError::TooLarge { field: "salary" }));
    }

    #[test]
    fn huge_annual_salary_is_blamed_on_salary() {
        let err = form("79228162514264337593543950335").to_input().unwrap_err();

        assert!(matches!(err, FormError::TooLarge { field: "salary" }));
    }

    #[test]
    fn huge_super_rate_is_rejected_not_overflowed() {
        let form = EstimateForm {
            salary: "85000".to_string(),
            super_rate: "79228162514264337593543950335".to_string(),
            ..Default::default()
        };

        let err = form.to_input().unwrap_err();

        assert!(matches!(err, FormError::TooLarge { field: "super_rate" }));
    }

    #[test]
    fn package_including_super_backs_it_out() {
        let form = EstimateForm {
            salary: "111000".to_string(),
            salary_includes_super: true,
            ..Default::default()
        };

        let input = form.to_input().unwrap();

        assert_eq!(input.annual_income, dec!(100000));
        assert_eq!(input.super_contributions, dec!(11000));
    }

    #[test]
    fn flags_map_to_input() {
        let form = EstimateForm {
            salary: "90000".to_string(),
            non_resident: true,
            family: true,
            dependents: "2".to_string(),
            private_health: true,
            premium: "1,800".to_string(),
            age: "67".to_string(),
            overseas: true,
            help_balance: "12,500".to_string(),
            ..Default::default()
        };

        let input = form.to_input().unwrap();

        assert_eq!(input.residency, Residency::NonResident);
        assert!(input.is_family);
        assert_eq!(input.dependents, 2);
        assert!(input.has_private_health);
        assert_eq!(input.private_health_premium, dec!(1800));
        assert_eq!(input.age, 67);
        assert!(input.is_overseas);
        assert_eq!(input.help_balance, dec!(12500));
    }

    #[test]
    fn garbage_text_is_an_error_naming_the_field() {
        let form = EstimateForm {
            salary: "50000".to_string(),
            deductions: "lots".to_string(),
            ..Default::default()
        };

        let err = form.to_input().unwrap_err();

        assert!(matches!(err, FormError::Decimal { field: "deductions", .. }));
        assert!(err.to_string().starts_with("deductions:"));
    }

    #[test]
    fn fractional_dependents_is_an_error() {
        let form = EstimateForm {
            dependents: "1.5".to_string(),
            ..Default::default()
        };

        assert!(matches!(
            form.to_input(),
            Err(FormError::Count { field: "dependents", .. })
        ));
    }
}
