use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{ScheduleKind, TablesError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub threshold: Decimal,
    pub rate: Decimal,
}

impl TaxBracket {
    pub fn new(
        threshold: Decimal,
        rate: Decimal,
    ) -> Self {
        Self { threshold, rate }
    }
}

/// An ordered list of brackets, ascending by threshold.
///
/// How the rates are applied (marginal slices or one flat tier) is decided
/// by the calculation that reads the schedule, not by the schedule itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BracketSchedule {
    brackets: Vec<TaxBracket>,
}

impl BracketSchedule {
    /// Builds a schedule and checks it against the rules for `kind`.
    pub fn new(
        kind: ScheduleKind,
        brackets: Vec<TaxBracket>,
    ) -> Result<Self, TablesError> {
        let schedule = Self { brackets };
        schedule.validate(kind)?;
        Ok(schedule)
    }

    /// Builds a schedule from `(threshold, rate)` pairs without validation.
    /// Used for the built-in tables, which are checked by tests.
    pub(crate) fn from_pairs(pairs: &[(Decimal, Decimal)]) -> Self {
        Self {
            brackets: pairs
                .iter()
                .map(|&(threshold, rate)| TaxBracket::new(threshold, rate))
                .collect(),
        }
    }

    pub fn brackets(&self) -> &[TaxBracket] {
        &self.brackets
    }

    pub fn len(&self) -> usize {
        self.brackets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.brackets.is_empty()
    }

    /// Checks the ordering and range invariants.
    ///
    /// * at least one bracket
    /// * the floor threshold is not negative
    /// * thresholds strictly increase
    /// * every rate lies in `[0, 1]`
    pub fn validate(
        &self,
        kind: ScheduleKind,
    ) -> Result<(), TablesError> {
        let first = self
            .brackets
            .first()
            .ok_or(TablesError::EmptySchedule(kind))?;

        if first.threshold < Decimal::ZERO {
            return Err(TablesError::NegativeThreshold {
                schedule: kind,
                threshold: first.threshold,
            });
        }

        for pair in self.brackets.windows(2) {
            if pair[1].threshold <= pair[0].threshold {
                return Err(TablesError::NonIncreasingThreshold {
                    schedule: kind,
                    threshold: pair[1].threshold,
                });
            }
        }

        if let Some(bad) = self
            .brackets
            .iter()
            .find(|b| b.rate < Decimal::ZERO || b.rate > Decimal::ONE)
        {
            return Err(TablesError::RateOutOfRange {
                schedule: kind,
                rate: bad.rate,
            });
        }

        Ok(())
    }
}
