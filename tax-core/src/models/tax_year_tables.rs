//! Rate tables for one Australian financial year.
//!
//! A [`TaxYearTables`] value holds every schedule and scalar parameter the
//! engine reads. It is validated when built and never changes afterwards;
//! moving to new rates means building a whole new value, either from the
//! constructors here or through the `tax-data` schedule loader.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{BracketSchedule, ScheduleKind, TaxYear};

/// Errors raised when a table set breaks one of its invariants.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TablesError {
    #[error("{0} schedule has no brackets")]
    EmptySchedule(ScheduleKind),

    #[error("{schedule} schedule starts at negative threshold {threshold}")]
    NegativeThreshold {
        schedule: ScheduleKind,
        threshold: Decimal,
    },

    #[error("{schedule} schedule threshold {threshold} does not increase")]
    NonIncreasingThreshold {
        schedule: ScheduleKind,
        threshold: Decimal,
    },

    #[error("{schedule} schedule rate {rate} is outside 0..=1")]
    RateOutOfRange {
        schedule: ScheduleKind,
        rate: Decimal,
    },

    #[error("Medicare levy {band} band has lower {lower} above upper {upper}")]
    InvertedMedicareBand {
        band: &'static str,
        lower: Decimal,
        upper: Decimal,
    },

    #[error("private health rebate tier factors must not increase with income")]
    IncreasingRebateFactors,

    #[error("low income tax offset thresholds are out of order")]
    OffsetThresholdsOutOfOrder,

    #[error("invalid value {value} for {name}")]
    InvalidParameter { name: &'static str, value: Decimal },
}

/// Lower and upper income cut-offs for the Medicare levy phase-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevyBand {
    pub lower: Decimal,
    pub upper: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicareLevyThresholds {
    /// Standard levy rate applied to the whole income above the upper cut-off.
    pub rate: Decimal,
    /// Share of the standard rate charged on the excess inside the band.
    pub phase_in_factor: Decimal,
    pub individual: LevyBand,
    pub family: LevyBand,
    /// Added to both family cut-offs for every dependent child.
    pub per_dependent: Decimal,
}

impl MedicareLevyThresholds {
    /// The band that applies to a taxpayer, with family cut-offs shifted by
    /// the dependent allowance.
    pub fn band_for(
        &self,
        dependents: u32,
        is_family: bool,
    ) -> LevyBand {
        if !is_family {
            return self.individual;
        }
        let shift = Decimal::from(dependents) * self.per_dependent;
        LevyBand {
            lower: self.family.lower + shift,
            upper: self.family.upper + shift,
        }
    }
}

/// Base rebate percentages by age of the oldest person on the policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RebateAgeBands {
    pub under_65: Decimal,
    pub age_65_to_69: Decimal,
    pub age_70_plus: Decimal,
}

/// Multipliers applied to the base rebate as income moves up the
/// surcharge tiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RebateTierFactors {
    pub base: Decimal,
    pub tier1: Decimal,
    pub tier2: Decimal,
    pub tier3: Decimal,
}

impl RebateTierFactors {
    /// Factor for a surcharge tier index; anything past the third tier
    /// uses the top factor.
    pub fn for_tier(
        &self,
        tier: usize,
    ) -> Decimal {
        match tier {
            0 => self.base,
            1 => self.tier1,
            2 => self.tier2,
            _ => self.tier3,
        }
    }

    fn as_array(&self) -> [Decimal; 4] {
        [self.base, self.tier1, self.tier2, self.tier3]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivateHealthRebateTable {
    pub age: RebateAgeBands,
    pub tiers: RebateTierFactors,
}

/// Business rules around HELP repayment that sit outside the bracket
/// schedule itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelpRepaymentRules {
    /// Multiplier on the selected rate for taxpayers living overseas.
    pub overseas_multiplier: Decimal,
    /// Share of the balance offered as a bonus for a voluntary payment.
    pub voluntary_bonus_rate: Decimal,
    pub voluntary_bonus_cap: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LowIncomeOffsetParams {
    pub max_offset: Decimal,
    pub first_threshold: Decimal,
    pub first_rate: Decimal,
    pub second_threshold: Decimal,
    pub second_rate: Decimal,
    /// Income from which no offset is available.
    pub cut_off: Decimal,
}

/// The five bracket schedules of a table set. Always replaced together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSet {
    pub resident: BracketSchedule,
    pub non_resident: BracketSchedule,
    pub surcharge_individual: BracketSchedule,
    pub surcharge_family: BracketSchedule,
    pub help_repayment: BracketSchedule,
}

impl ScheduleSet {
    pub fn get(
        &self,
        kind: ScheduleKind,
    ) -> &BracketSchedule {
        match kind {
            ScheduleKind::Resident => &self.resident,
            ScheduleKind::NonResident => &self.non_resident,
            ScheduleKind::SurchargeIndividual => &self.surcharge_individual,
            ScheduleKind::SurchargeFamily => &self.surcharge_family,
            ScheduleKind::HelpRepayment => &self.help_repayment,
        }
    }

    pub fn validate(&self) -> Result<(), TablesError> {
        for kind in ScheduleKind::ALL {
            self.get(kind).validate(kind)?;
        }
        Ok(())
    }
}

/// Every rate and threshold needed to estimate tax for one financial year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxYearTables {
    tax_year: TaxYear,
    schedules: ScheduleSet,
    medicare: MedicareLevyThresholds,
    rebate: PrivateHealthRebateTable,
    help: HelpRepaymentRules,
    low_income_offset: LowIncomeOffsetParams,
}

impl TaxYearTables {
    /// Builds and validates a complete table set.
    pub fn new(
        tax_year: TaxYear,
        schedules: ScheduleSet,
        medicare: MedicareLevyThresholds,
        rebate: PrivateHealthRebateTable,
        help: HelpRepaymentRules,
        low_income_offset: LowIncomeOffsetParams,
    ) -> Result<Self, TablesError> {
        let tables = Self {
            tax_year,
            schedules,
            medicare,
            rebate,
            help,
            low_income_offset,
        };
        tables.validate()?;
        Ok(tables)
    }

    /// Builds a new table set for `tax_year` that takes its schedules from
    /// `schedules` and every scalar parameter from `self`.
    pub fn with_schedules(
        &self,
        tax_year: TaxYear,
        schedules: ScheduleSet,
    ) -> Result<Self, TablesError> {
        Self::new(
            tax_year,
            schedules,
            self.medicare.clone(),
            self.rebate.clone(),
            self.help.clone(),
            self.low_income_offset.clone(),
        )
    }

    /// 2024-25 rates: Stage 3 resident brackets, 2024-25 surcharge and
    /// HELP thresholds.
    pub fn fy2024_25() -> Self {
        Self {
            tax_year: TaxYear::FY2024_25,
            schedules: ScheduleSet {
                resident: BracketSchedule::from_pairs(&[
                    (dec!(0), dec!(0)),
                    (dec!(18200), dec!(0.16)),
                    (dec!(45000), dec!(0.30)),
                    (dec!(135000), dec!(0.37)),
                    (dec!(190000), dec!(0.45)),
                ]),
                non_resident: BracketSchedule::from_pairs(&[
                    (dec!(0), dec!(0.30)),
                    (dec!(135000), dec!(0.37)),
                    (dec!(190000), dec!(0.45)),
                ]),
                surcharge_individual: BracketSchedule::from_pairs(&[
                    (dec!(0), dec!(0)),
                    (dec!(93000), dec!(0.01)),
                    (dec!(108000), dec!(0.0125)),
                    (dec!(144000), dec!(0.015)),
                ]),
                surcharge_family: BracketSchedule::from_pairs(&[
                    (dec!(0), dec!(0)),
                    (dec!(186000), dec!(0.01)),
                    (dec!(216000), dec!(0.0125)),
                    (dec!(288000), dec!(0.015)),
                ]),
                help_repayment: BracketSchedule::from_pairs(&[
                    (dec!(0), dec!(0)),
                    (dec!(51550), dec!(0.01)),
                    (dec!(57154), dec!(0.02)),
                    (dec!(62738), dec!(0.025)),
                    (dec!(66502), dec!(0.03)),
                    (dec!(70717), dec!(0.035)),
                    (dec!(75956), dec!(0.04)),
                    (dec!(81808), dec!(0.045)),
                    (dec!(86768), dec!(0.05)),
                    (dec!(91647), dec!(0.055)),
                    (dec!(96709), dec!(0.06)),
                    (dec!(102013), dec!(0.065)),
                    (dec!(107762), dec!(0.07)),
                    (dec!(113720), dec!(0.075)),
                    (dec!(120193), dec!(0.08)),
                    (dec!(126968), dec!(0.085)),
                    (dec!(134096), dec!(0.09)),
                    (dec!(141533), dec!(0.095)),
                    (dec!(149420), dec!(0.10)),
                ]),
            },
            medicare: MedicareLevyThresholds {
                rate: dec!(0.02),
                phase_in_factor: dec!(0.10),
                individual: LevyBand {
                    lower: dec!(24276),
                    upper: dec!(30345),
                },
                family: LevyBand {
                    lower: dec!(41112),
                    upper: dec!(51094),
                },
                per_dependent: dec!(3760),
            },
            rebate: PrivateHealthRebateTable {
                age: RebateAgeBands {
                    under_65: dec!(24.608),
                    age_65_to_69: dec!(28.710),
                    age_70_plus: dec!(32.812),
                },
                tiers: RebateTierFactors {
                    base: dec!(1.0),
                    tier1: dec!(0.6567),
                    tier2: dec!(0.3278),
                    tier3: dec!(0),
                },
            },
            help: HelpRepaymentRules {
                overseas_multiplier: dec!(1.25),
                voluntary_bonus_rate: dec!(0.05),
                voluntary_bonus_cap: dec!(500),
            },
            low_income_offset: LowIncomeOffsetParams {
                max_offset: dec!(700),
                first_threshold: dec!(37500),
                first_rate: dec!(0.05),
                second_threshold: dec!(45000),
                second_rate: dec!(0.015),
                cut_off: dec!(66667),
            },
        }
    }

    pub fn tax_year(&self) -> TaxYear {
        self.tax_year
    }

    pub fn schedules(&self) -> &ScheduleSet {
        &self.schedules
    }

    pub fn schedule(
        &self,
        kind: ScheduleKind,
    ) -> &BracketSchedule {
        self.schedules.get(kind)
    }

    pub fn medicare(&self) -> &MedicareLevyThresholds {
        &self.medicare
    }

    pub fn rebate(&self) -> &PrivateHealthRebateTable {
        &self.rebate
    }

    pub fn help(&self) -> &HelpRepaymentRules {
        &self.help
    }

    pub fn low_income_offset(&self) -> &LowIncomeOffsetParams {
        &self.low_income_offset
    }

    /// Checks every schedule and scalar parameter.
    pub fn validate(&self) -> Result<(), TablesError> {
        self.schedules.validate()?;
        self.validate_medicare()?;
        self.validate_rebate()?;
        self.validate_help()?;
        self.validate_offset()
    }

    fn validate_medicare(&self) -> Result<(), TablesError> {
        let m = &self.medicare;
        check_fraction("medicare.rate", m.rate)?;
        check_fraction("medicare.phase_in_factor", m.phase_in_factor)?;
        check_non_negative("medicare.per_dependent", m.per_dependent)?;

        for (band, LevyBand { lower, upper }) in [("individual", m.individual), ("family", m.family)] {
            check_non_negative("medicare.lower", lower)?;
            if lower > upper {
                return Err(TablesError::InvertedMedicareBand { band, lower, upper });
            }
        }
        Ok(())
    }

    fn validate_rebate(&self) -> Result<(), TablesError> {
        let age = &self.rebate.age;
        for (name, value) in [
            ("rebate.under_65", age.under_65),
            ("rebate.age_65_to_69", age.age_65_to_69),
            ("rebate.age_70_plus", age.age_70_plus),
        ] {
            if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
                return Err(TablesError::InvalidParameter { name, value });
            }
        }

        let factors = self.rebate.tiers.as_array();
        for value in factors {
            check_fraction("rebate.tier_factor", value)?;
        }
        if factors.windows(2).any(|pair| pair[1] > pair[0]) {
            return Err(TablesError::IncreasingRebateFactors);
        }
        Ok(())
    }

    fn validate_help(&self) -> Result<(), TablesError> {
        let help = &self.help;
        if help.overseas_multiplier < Decimal::ONE {
            return Err(TablesError::InvalidParameter {
                name: "help.overseas_multiplier",
                value: help.overseas_multiplier,
            });
        }
        check_fraction("help.voluntary_bonus_rate", help.voluntary_bonus_rate)?;
        check_non_negative("help.voluntary_bonus_cap", help.voluntary_bonus_cap)
    }

    fn validate_offset(&self) -> Result<(), TablesError> {
        let p = &self.low_income_offset;
        check_non_negative("offset.max_offset", p.max_offset)?;
        check_non_negative("offset.first_rate", p.first_rate)?;
        check_non_negative("offset.second_rate", p.second_rate)?;
        check_non_negative("offset.first_threshold", p.first_threshold)?;
        if p.first_threshold > p.second_threshold || p.second_threshold > p.cut_off {
            return Err(TablesError::OffsetThresholdsOutOfOrder);
        }
        Ok(())
    }
}

fn check_fraction(
    name: &'static str,
    value: Decimal,
) -> Result<(), TablesError> {
    if value < Decimal::ZERO || value > Decimal::ONE {
        return Err(TablesError::InvalidParameter { name, value });
    }
    Ok(())
}

fn check_non_negative(
    name: &'static str,
    value: Decimal,
) -> Result<(), TablesError> {
    if value < Decimal::ZERO {
        return Err(TablesError::InvalidParameter { name, value });
    }
    Ok(())
}
