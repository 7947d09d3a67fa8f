use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies one bracket schedule inside a [`crate::TaxYearTables`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ScheduleKind {
    Resident,
    NonResident,
    SurchargeIndividual,
    SurchargeFamily,
    HelpRepayment,
}

impl ScheduleKind {
    pub const ALL: [ScheduleKind; 5] = [
        Self::Resident,
        Self::NonResident,
        Self::SurchargeIndividual,
        Self::SurchargeFamily,
        Self::HelpRepayment,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Resident => "RES",
            Self::NonResident => "NONRES",
            Self::SurchargeIndividual => "MLS-I",
            Self::SurchargeFamily => "MLS-F",
            Self::HelpRepayment => "HELP",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "RES" => Some(Self::Resident),
            "NONRES" => Some(Self::NonResident),
            "MLS-I" => Some(Self::SurchargeIndividual),
            "MLS-F" => Some(Self::SurchargeFamily),
            "HELP" => Some(Self::HelpRepayment),
            _ => None,
        }
    }

    /// Whether rates in this schedule are marginal (sliced) rather than
    /// applied flat to the whole income.
    pub fn is_marginal(&self) -> bool {
        matches!(self, Self::Resident | Self::NonResident)
    }
}

impl fmt::Display for ScheduleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Resident => "resident income tax",
            Self::NonResident => "non-resident income tax",
            Self::SurchargeIndividual => "Medicare levy surcharge (individual)",
            Self::SurchargeFamily => "Medicare levy surcharge (family)",
            Self::HelpRepayment => "HELP repayment",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn codes_round_trip_through_parse() {
        for kind in ScheduleKind::ALL {
            assert_eq!(ScheduleKind::parse(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn parse_rejects_unknown_code() {
        assert_eq!(ScheduleKind::parse("X"), None);
        assert_eq!(ScheduleKind::parse("res"), None);
    }

    #[test]
    fn only_income_tax_schedules_are_marginal() {
        assert!(ScheduleKind::Resident.is_marginal());
        assert!(ScheduleKind::NonResident.is_marginal());
        assert!(!ScheduleKind::SurchargeIndividual.is_marginal());
        assert!(!ScheduleKind::SurchargeFamily.is_marginal());
        assert!(!ScheduleKind::HelpRepayment.is_marginal());
    }
}
