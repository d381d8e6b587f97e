//! Mortgage offset account calculation.
//!
//! This module models the interest saved by holding savings in an offset
//! account against a home loan, the effect on lifetime interest, and how
//! much sooner the loan is repaid when the original repayment is kept.
//!
//! The loan maths uses the standard amortization formulas on monthly
//! compounding: repayment `P·r·(1+r)^n / ((1+r)^n − 1)` and total interest
//! `repayment·n − P`, with `r = annual_rate / 12` and `n = term_years · 12`.

use rust_decimal::{Decimal, MathematicalOps};
use tracing::{debug, info};

use crate::error::{EngineError, EngineResult};
use crate::models::{
    AuditTrace, OffsetResult, OffsetScenario, OffsetSimulation, ScheduleYear, WarningSeverity,
};

use super::{round_half_up, round_to_cents};

/// Warning code raised when the offset balance covers the whole loan.
pub const LOAN_FULLY_OFFSET: &str = "LOAN_FULLY_OFFSET";

const MONTHS_PER_YEAR: u32 = 12;

/// Evaluates mortgage offset scenarios.
///
/// Offset calculations do not depend on any tax-year rule set.
#[derive(Debug, Clone, Copy, Default)]
pub struct OffsetCalculator;

impl OffsetCalculator {
    /// Creates an offset calculator.
    pub fn new() -> Self {
        Self
    }

    /// Evaluates an offset scenario.
    ///
    /// Lifetime interest figures hold the offset balance constant for the
    /// whole term rather than simulating it month by month, which makes them
    /// a simplified estimate. [`OffsetCalculator::simulate`] runs the full
    /// schedule instead.
    ///
    /// Years off the loan keep the original repayment (computed on the full
    /// principal and term) and solve `n' = ln(1 + P'·r / repayment) / ln(1 + r)`
    /// for the reduced balance `P'`. The whole term is saved once the offset
    /// covers the principal, and nothing is saved with an empty offset.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for negative amounts or rates, or a term outside
    /// one to [`MAX_TERM_YEARS`](crate::models::MAX_TERM_YEARS) years, and
    /// `InvariantViolation` if the loan maths overflows.
    ///
    /// # Examples
    ///
    /// ```
    /// use strategy_engine::calculation::OffsetCalculator;
    /// use strategy_engine::models::OffsetScenario;
    /// use rust_decimal::Decimal;
    ///
    /// let result = OffsetCalculator::new().evaluate(&OffsetScenario {
    ///     principal: Decimal::from(500000),
    ///     annual_rate: Decimal::new(6, 2),
    ///     term_years: 30,
    ///     current_offset_balance: Decimal::from(50000),
    ///     additional_contribution: Decimal::from(10000),
    /// })?;
    ///
    /// assert_eq!(result.interest_saved_year1, Decimal::from(600));
    /// assert_eq!(result.monthly_interest_saving, Decimal::from(50));
    /// # Ok::<(), strategy_engine::error::EngineError>(())
    /// ```
    pub fn evaluate(&self, scenario: &OffsetScenario) -> EngineResult<OffsetResult> {
        scenario.validate()?;

        let mut trace = AuditTrace::default();
        let principal = scenario.principal;
        let annual_rate = scenario.annual_rate;
        let monthly_rate = annual_rate / Decimal::from(MONTHS_PER_YEAR);
        let payments = payment_count(scenario.term_years)?;

        let new_offset_balance = scenario.new_offset_balance()?;
        let effective_balance_before =
            (principal - scenario.current_offset_balance).max(Decimal::ZERO);
        let effective_balance_after = (principal - new_offset_balance).max(Decimal::ZERO);
        trace.record(
            "effective_balance",
            "Effective Loan Balance",
            serde_json::json!({
                "principal": principal.to_string(),
                "current_offset_balance": scenario.current_offset_balance.to_string(),
                "additional_contribution": scenario.additional_contribution.to_string()
            }),
            serde_json::json!({
                "new_offset_balance": new_offset_balance.to_string(),
                "effective_balance_before": effective_balance_before.to_string(),
                "effective_balance_after": effective_balance_after.to_string()
            }),
            format!(
                "Interest charged on ${} before and ${} after the contribution",
                effective_balance_before.normalize(),
                effective_balance_after.normalize()
            ),
        );

        let interest_saved_year1 = (effective_balance_before - effective_balance_after)
            .checked_mul(annual_rate)
            .ok_or_else(|| EngineError::overflow("first-year interest saving"))?;
        let monthly_interest_saving = interest_saved_year1 / Decimal::from(MONTHS_PER_YEAR);
        trace.record(
            "first_year_interest",
            "First-Year Interest Saving",
            serde_json::json!({
                "balance_reduction": (effective_balance_before - effective_balance_after).to_string(),
                "annual_rate": annual_rate.to_string()
            }),
            serde_json::json!({
                "interest_saved_year1": round_to_cents(interest_saved_year1).to_string(),
                "monthly_interest_saving": round_to_cents(monthly_interest_saving).to_string()
            }),
            format!(
                "${} x {} = ${}",
                (effective_balance_before - effective_balance_after).normalize(),
                annual_rate.normalize(),
                round_to_cents(interest_saved_year1)
            ),
        );

        let monthly_repayment = repayment(principal, monthly_rate, payments)?;
        let interest_without = total_interest(principal, monthly_rate, payments)?;
        let interest_with = total_interest(effective_balance_after, monthly_rate, payments)?;
        let interest_saved = (interest_without - interest_with).max(Decimal::ZERO);
        trace.record(
            "lifetime_interest",
            "Lifetime Interest (constant offset balance)",
            serde_json::json!({
                "principal": principal.to_string(),
                "effective_balance_after": effective_balance_after.to_string(),
                "monthly_rate": monthly_rate.to_string(),
                "payments": payments
            }),
            serde_json::json!({
                "monthly_repayment": round_to_cents(monthly_repayment).to_string(),
                "total_interest_without_offset": round_to_cents(interest_without).to_string(),
                "total_interest_with_offset": round_to_cents(interest_with).to_string(),
                "total_interest_saved": round_to_cents(interest_saved).to_string()
            }),
            format!(
                "${} - ${} = ${} saved over {} payments, offset held constant",
                round_to_cents(interest_without),
                round_to_cents(interest_with),
                round_to_cents(interest_saved),
                payments
            ),
        );

        let years_off_loan = years_saved_estimate(
            principal,
            monthly_rate,
            scenario.term_years,
            new_offset_balance,
        )?;
        trace.record(
            "years_off_loan",
            "Years Off Loan",
            serde_json::json!({
                "new_offset_balance": new_offset_balance.to_string(),
                "term_years": scenario.term_years
            }),
            serde_json::json!({ "years_off_loan": round_half_up(years_off_loan, 2).to_string() }),
            format!(
                "Keeping the ${} repayment clears the loan {} years early",
                round_to_cents(monthly_repayment),
                round_half_up(years_off_loan, 2)
            ),
        );

        let fully_offset = principal > Decimal::ZERO && new_offset_balance >= principal;
        if fully_offset {
            info!(
                principal = %principal,
                offset_balance = %new_offset_balance,
                "Offset balance covers the whole loan"
            );
            trace.warn(
                LOAN_FULLY_OFFSET,
                format!(
                    "Offset balance of ${} covers the ${} loan; no interest is charged",
                    new_offset_balance.normalize(),
                    principal.normalize()
                ),
                WarningSeverity::Info,
            );
        }

        debug!(
            principal = %principal,
            interest_saved_year1 = %interest_saved_year1,
            years_off_loan = %years_off_loan,
            "Evaluated offset scenario"
        );

        Ok(OffsetResult {
            new_offset_balance,
            effective_balance_before,
            effective_balance_after,
            interest_saved_year1: round_to_cents(interest_saved_year1),
            monthly_interest_saving: round_to_cents(monthly_interest_saving),
            annual_cash_flow_improvement: round_to_cents(interest_saved_year1),
            monthly_repayment: round_to_cents(monthly_repayment),
            total_interest_without_offset: round_to_cents(interest_without),
            total_interest_with_offset: round_to_cents(interest_with),
            total_interest_saved: round_to_cents(interest_saved),
            years_off_loan: round_half_up(years_off_loan, 2),
            fully_offset,
            audit_trace: trace,
        })
    }

    /// Simulates the loan month by month with the offset balance held constant.
    ///
    /// The original repayment is kept, interest is charged on the balance in
    /// excess of the offset, and the loan counts as cleared once its balance
    /// no longer exceeds the offset. Interest saved is measured against the
    /// same loan with no offset at all.
    ///
    /// # Errors
    ///
    /// Same as [`OffsetCalculator::evaluate`].
    pub fn simulate(&self, scenario: &OffsetScenario) -> EngineResult<OffsetSimulation> {
        scenario.validate()?;

        let monthly_rate = scenario.annual_rate / Decimal::from(MONTHS_PER_YEAR);
        let payments = payment_count(scenario.term_years)?;
        let offset = scenario.new_offset_balance()?;
        let monthly_repayment = repayment(scenario.principal, monthly_rate, payments)?;
        let baseline_interest = total_interest(scenario.principal, monthly_rate, payments)?;

        let mut balance = scenario.principal;
        let mut months = 0u32;
        let mut total = Decimal::ZERO;
        let mut year_interest = Decimal::ZERO;
        let mut year_principal = Decimal::ZERO;
        let mut schedule = Vec::new();

        while balance > offset && months < payments {
            months += 1;

            let interest = (balance - offset)
                .checked_mul(monthly_rate)
                .ok_or_else(|| EngineError::overflow("monthly interest"))?;
            let due = balance
                .checked_add(interest)
                .ok_or_else(|| EngineError::overflow("monthly interest"))?;
            let principal_paid = monthly_repayment.min(due) - interest;
            balance -= principal_paid;

            total = total
                .checked_add(interest)
                .ok_or_else(|| EngineError::overflow("simulated interest"))?;
            year_interest += interest;
            year_principal += principal_paid;

            let cleared = balance <= offset;
            if months % MONTHS_PER_YEAR == 0 || cleared || months == payments {
                schedule.push(ScheduleYear {
                    year: (months - 1) / MONTHS_PER_YEAR + 1,
                    interest_paid: round_to_cents(year_interest),
                    principal_paid: round_to_cents(year_principal),
                    closing_balance: round_to_cents(balance.max(Decimal::ZERO)),
                });
                year_interest = Decimal::ZERO;
                year_principal = Decimal::ZERO;
            }
        }

        let years_used = Decimal::from(months) / Decimal::from(MONTHS_PER_YEAR);
        let years_saved = (Decimal::from(scenario.term_years) - years_used).max(Decimal::ZERO);

        debug!(
            principal = %scenario.principal,
            offset_balance = %offset,
            months_to_payoff = months,
            "Simulated offset schedule"
        );

        Ok(OffsetSimulation {
            monthly_repayment: round_to_cents(monthly_repayment),
            months_to_payoff: months,
            years_saved: round_half_up(years_saved, 2),
            total_interest: round_to_cents(total),
            total_interest_saved: round_to_cents((baseline_interest - total).max(Decimal::ZERO)),
            schedule,
        })
    }
}

/// Number of monthly payments in a term; validated terms never overflow.
fn payment_count(term_years: u32) -> EngineResult<u32> {
    term_years
        .checked_mul(MONTHS_PER_YEAR)
        .ok_or_else(|| EngineError::overflow("payment count"))
}

/// Level monthly repayment for a loan.
///
/// Zero for a zero principal; straight-line `P / n` at a zero rate.
fn repayment(principal: Decimal, monthly_rate: Decimal, payments: u32) -> EngineResult<Decimal> {
    if principal <= Decimal::ZERO || payments == 0 {
        return Ok(Decimal::ZERO);
    }

    let count = Decimal::from(payments);
    if monthly_rate <= Decimal::ZERO {
        return Ok(principal / count);
    }

    let growth = (Decimal::ONE + monthly_rate)
        .checked_powi(i64::from(payments))
        .ok_or_else(|| EngineError::overflow("loan repayment"))?;
    let denominator = growth - Decimal::ONE;
    if denominator.is_zero() {
        return Ok(principal / count);
    }

    principal
        .checked_mul(monthly_rate)
        .and_then(|v| v.checked_mul(growth))
        .and_then(|v| v.checked_div(denominator))
        .ok_or_else(|| EngineError::overflow("loan repayment"))
}

/// Total interest over the full term: `repayment · n − P`.
///
/// Zero when the principal or the rate is not positive.
fn total_interest(principal: Decimal, monthly_rate: Decimal, payments: u32) -> EngineResult<Decimal> {
    if principal <= Decimal::ZERO || monthly_rate <= Decimal::ZERO {
        return Ok(Decimal::ZERO);
    }

    let payment = repayment(principal, monthly_rate, payments)?;
    payment
        .checked_mul(Decimal::from(payments))
        .map(|paid| paid - principal)
        .ok_or_else(|| EngineError::overflow("total interest"))
}

/// Closed-form estimate of the years saved by an offset balance.
fn years_saved_estimate(
    principal: Decimal,
    monthly_rate: Decimal,
    term_years: u32,
    offset_balance: Decimal,
) -> EngineResult<Decimal> {
    let term = Decimal::from(term_years);

    if offset_balance <= Decimal::ZERO {
        return Ok(Decimal::ZERO);
    }
    if offset_balance >= principal {
        return Ok(term);
    }

    let payments = payment_count(term_years)?;
    let effective_principal = principal - offset_balance;
    // Share of the loan still charged interest, always below one.
    let straight_line = effective_principal / principal * Decimal::from(payments);

    let remaining_months = if monthly_rate <= Decimal::ZERO {
        straight_line
    } else {
        let payment = repayment(principal, monthly_rate, payments)?;
        let rate_log = (Decimal::ONE + monthly_rate).ln();
        if payment.is_zero() || rate_log.is_zero() {
            straight_line
        } else {
            let ratio = effective_principal
                .checked_mul(monthly_rate)
                .and_then(|v| v.checked_div(payment))
                .and_then(|v| v.checked_add(Decimal::ONE))
                .ok_or_else(|| EngineError::overflow("years off loan"))?;
            ratio.ln() / rate_log
        }
    };

    Ok((term - remaining_months / Decimal::from(MONTHS_PER_YEAR)).max(Decimal::ZERO))
}
