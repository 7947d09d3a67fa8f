mod calculation_input;
mod calculation_result;
mod schedule_kind;
mod tax_bracket;
mod tax_year;
mod tax_year_tables;

pub use calculation_input::{InputError, MAX_AGE, MAX_AMOUNT, Residency, TaxCalculationInput};
pub(crate) use calculation_input::{check_amounts, check_percent};
pub use calculation_result::{HelpRepayment, TaxCalculationResult, TaxOutcome};
pub use schedule_kind::ScheduleKind;
pub use tax_bracket::{BracketSchedule, TaxBracket};
pub use tax_year::TaxYear;
pub use tax_year_tables::{
    HelpRepaymentRules, LevyBand, LowIncomeOffsetParams, MedicareLevyThresholds,
    PrivateHealthRebateTable, RebateAgeBands, RebateTierFactors, ScheduleSet, TablesError,
    TaxYearTables,
};
