//! Mortgage offset scenario and result models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

use super::AuditTrace;

/// Longest loan term accepted, in years.
pub const MAX_TERM_YEARS: u32 = 100;

/// Inputs for a mortgage offset scenario.
///
/// # Example
///
/// ```
/// use strategy_engine::models::OffsetScenario;
/// use rust_decimal::Decimal;
///
/// let scenario = OffsetScenario {
///     principal: Decimal::from(500000),
///     annual_rate: Decimal::new(6, 2),
///     term_years: 30,
///     current_offset_balance: Decimal::from(50000),
///     additional_contribution: Decimal::from(10000),
/// };
/// assert_eq!(scenario.new_offset_balance()?, Decimal::from(60000));
/// # Ok::<(), strategy_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffsetScenario {
    /// Outstanding loan principal.
    pub principal: Decimal,
    /// Annual interest rate as a fraction (0.06 for 6%).
    pub annual_rate: Decimal,
    /// Remaining loan term in whole years.
    pub term_years: u32,
    /// Balance already held in the offset account.
    pub current_offset_balance: Decimal,
    /// Extra amount to be deposited into the offset account.
    pub additional_contribution: Decimal,
}

impl OffsetScenario {
    /// Returns the offset balance after the additional contribution.
    ///
    /// # Errors
    ///
    /// Returns `InvariantViolation` if the sum overflows.
    pub fn new_offset_balance(&self) -> EngineResult<Decimal> {
        self.current_offset_balance
            .checked_add(self.additional_contribution)
            .ok_or_else(|| EngineError::overflow("new offset balance"))
    }

    /// Checks that every amount and rate is non-negative and the term is
    /// between one and [`MAX_TERM_YEARS`] years.
    pub fn validate(&self) -> EngineResult<()> {
        for (field, value) in [
            ("principal", self.principal),
            ("annual_rate", self.annual_rate),
            ("current_offset_balance", self.current_offset_balance),
            ("additional_contribution", self.additional_contribution),
        ] {
            if value < Decimal::ZERO {
                return Err(EngineError::invalid_input(
                    field,
                    format!("must not be negative, got {}", value),
                ));
            }
        }

        if self.term_years == 0 {
            return Err(EngineError::invalid_input(
                "term_years",
                "must be at least one year",
            ));
        }
        if self.term_years > MAX_TERM_YEARS {
            return Err(EngineError::invalid_input(
                "term_years",
                format!(
                    "must be at most {} years, got {}",
                    MAX_TERM_YEARS, self.term_years
                ),
            ));
        }

        Ok(())
    }
}

/// The outcome of a mortgage offset scenario.
///
/// Lifetime figures hold the offset balance constant for the whole term.
/// They are an estimate, not a month-by-month simulation; see
/// [`OffsetSimulation`] for that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffsetResult {
    /// Offset balance after the additional contribution.
    pub new_offset_balance: Decimal,
    /// Interest-bearing balance before the contribution.
    pub effective_balance_before: Decimal,
    /// Interest-bearing balance after the contribution.
    pub effective_balance_after: Decimal,
    /// Interest saved in the first year by the additional contribution.
    pub interest_saved_year1: Decimal,
    /// `interest_saved_year1 / 12`.
    pub monthly_interest_saving: Decimal,
    /// Cash flow freed up over a year; equal to `interest_saved_year1`.
    pub annual_cash_flow_improvement: Decimal,
    /// Scheduled monthly repayment on the full principal.
    pub monthly_repayment: Decimal,
    /// Lifetime interest on the full principal.
    pub total_interest_without_offset: Decimal,
    /// Lifetime interest on the balance left after the offset.
    pub total_interest_with_offset: Decimal,
    /// Lifetime interest saved, never negative.
    pub total_interest_saved: Decimal,
    /// Years cut from the loan term by keeping the original repayment.
    pub years_off_loan: Decimal,
    /// The offset balance covers the whole principal.
    pub fully_offset: bool,
    /// Steps and advisories behind this result.
    pub audit_trace: AuditTrace,
}

/// One year of a simulated loan schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleYear {
    /// Loan year, starting at 1.
    pub year: u32,
    /// Interest charged during the year.
    pub interest_paid: Decimal,
    /// Principal repaid during the year.
    pub principal_paid: Decimal,
    /// Loan balance at the end of the year.
    pub closing_balance: Decimal,
}

/// A month-by-month loan simulation with a constant offset balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffsetSimulation {
    /// Monthly repayment held fixed throughout (from the full principal).
    pub monthly_repayment: Decimal,
    /// Months until the loan balance no longer exceeds the offset balance.
    pub months_to_payoff: u32,
    /// Years cut from the original term.
    pub years_saved: Decimal,
    /// Interest charged over the simulated life of the loan.
    pub total_interest: Decimal,
    /// Interest saved compared with the loan without any offset.
    pub total_interest_saved: Decimal,
    /// Year-by-year schedule.
    pub schedule: Vec<ScheduleYear>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_test_scenario() -> OffsetScenario {
        OffsetScenario {
            principal: dec("500000"),
            annual_rate: dec("0.06"),
            term_years: 30,
            current_offset_balance: dec("50000"),
            additional_contribution: dec("10000"),
        }
    }

    #[test]
    fn test_new_offset_balance_adds_contribution() {
        assert_eq!(
            create_test_scenario().new_offset_balance().unwrap(),
            dec("60000")
        );
    }

    #[test]
    fn test_new_offset_balance_overflow_is_an_error() {
        let mut scenario = create_test_scenario();
        scenario.current_offset_balance = Decimal::MAX;
        scenario.additional_contribution = Decimal::MAX;

        let err = scenario.new_offset_balance().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Domain);
    }

    #[test]
    fn test_valid_scenario_passes() {
        assert!(create_test_scenario().validate().is_ok());
    }

    #[test]
    fn test_negative_fields_rejected() {
        let cases: [(&str, fn(&mut OffsetScenario)); 4] = [
            ("principal", |s| s.principal = dec("-1")),
            ("annual_rate", |s| s.annual_rate = dec("-0.01")),
            ("current_offset_balance", |s| {
                s.current_offset_balance = dec("-1")
            }),
            ("additional_contribution", |s| {
                s.additional_contribution = dec("-1")
            }),
        ];

        for (field, mutate) in cases {
            let mut scenario = create_test_scenario();
            mutate(&mut scenario);
            let err = scenario.validate().unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Validation);
            assert!(err.to_string().contains(field), "{}", err);
        }
    }

    #[test]
    fn test_zero_term_rejected() {
        let mut scenario = create_test_scenario();
        scenario.term_years = 0;

        let err = scenario.validate().unwrap_err();
        assert!(err.to_string().contains("term_years"));
    }

    #[test]
    fn test_term_above_limit_rejected() {
        let mut scenario = create_test_scenario();
        scenario.term_years = MAX_TERM_YEARS;
        assert!(scenario.validate().is_ok());

        scenario.term_years = 400_000_000;
        let err = scenario.validate().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(err.to_string().contains("term_years"), "{}", err);
    }
}
