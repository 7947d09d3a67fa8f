use std::fmt;

use serde::{Deserialize, Serialize};

/// Australian financial year, identified by the calendar year it ends in.
///
/// `TaxYear(2025)` is the 2024-25 year (1 July 2024 to 30 June 2025).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaxYear(pub i32);

impl TaxYear {
    pub const FY2024_25: TaxYear = TaxYear(2025);

    pub fn ending_year(&self) -> i32 {
        self.0
    }

    /// Accepts either the ending year (`2025`) or the `2024-25` form.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        match s.split_once('-') {
            None => s.parse().ok().map(TaxYear),
            Some((start, end)) => {
                let start: i32 = start.parse().ok()?;
                let end: i32 = end.parse().ok()?;
                let ending = start + 1;
                let matches = if end < 100 {
                    ending % 100 == end
                } else {
                    ending == end
                };
                matches.then_some(TaxYear(ending))
            }
        }
    }
}

impl fmt::Display for TaxYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.0 - 1, self.0.rem_euclid(100))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn display_uses_financial_year_form() {
        assert_eq!(TaxYear(2025).to_string(), "2024-25");
        assert_eq!(TaxYear(2000).to_string(), "1999-00");
    }

    #[test]
    fn parse_accepts_ending_year() {
        assert_eq!(TaxYear::parse("2025"), Some(TaxYear(2025)));
    }

    #[test]
    fn parse_accepts_short_and_long_ranges() {
        assert_eq!(TaxYear::parse("2024-25"), Some(TaxYear(2025)));
        assert_eq!(TaxYear::parse("2024-2025"), Some(TaxYear(2025)));
    }

    #[test]
    fn parse_rejects_non_consecutive_range() {
        assert_eq!(TaxYear::parse("2024-26"), None);
        assert_eq!(TaxYear::parse("FY25"), None);
    }
}
