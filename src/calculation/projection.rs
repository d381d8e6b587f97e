//! Multi-year balance projections.
//!
//! Each projected year adds the annual contribution first and then applies
//! growth for the year, so contributions earn a full year's return.

use rust_decimal::Decimal;

use crate::config::{InvestmentStrategy, RuleSet};
use crate::error::{EngineError, EngineResult};
use crate::models::ProjectionPoint;

use super::round_to_cents;

/// Compounds a balance with start-of-year contributions.
///
/// The result is unrounded, so `years = 0` returns `initial_balance`
/// exactly.
///
/// # Errors
///
/// Returns `InvariantViolation` if the balance overflows.
///
/// # Examples
///
/// ```
/// use strategy_engine::calculation::compound_growth;
/// use rust_decimal::Decimal;
///
/// let balance = compound_growth(Decimal::from(10000), Decimal::from(1000), Decimal::new(7, 2), 2)?;
/// assert_eq!(balance, Decimal::new(136639, 1));
/// # Ok::<(), strategy_engine::error::EngineError>(())
/// ```
pub fn compound_growth(
    initial_balance: Decimal,
    annual_contribution: Decimal,
    rate: Decimal,
    years: u32,
) -> EngineResult<Decimal> {
    let growth = growth_factor(rate)?;
    let mut balance = initial_balance;
    for _ in 0..years {
        balance = balance
            .checked_add(annual_contribution)
            .and_then(|b| b.checked_mul(growth))
            .ok_or_else(|| EngineError::overflow("compound growth"))?;
    }
    Ok(balance)
}

fn growth_factor(rate: Decimal) -> EngineResult<Decimal> {
    Decimal::ONE
        .checked_add(rate)
        .ok_or_else(|| EngineError::overflow("growth factor"))
}

/// Projects a superannuation balance, rounded to cents.
pub fn project_super_balance(
    balance: Decimal,
    annual_contribution: Decimal,
    rate: Decimal,
    years: u32,
) -> EngineResult<Decimal> {
    compound_growth(balance, annual_contribution, rate, years).map(round_to_cents)
}

/// Projects an offset account balance, rounded to cents.
pub fn project_offset_balance(
    balance: Decimal,
    annual_contribution: Decimal,
    rate: Decimal,
    years: u32,
) -> EngineResult<Decimal> {
    compound_growth(balance, annual_contribution, rate, years).map(round_to_cents)
}

/// Projects a balance at the rule set's return rate for an investment strategy.
pub fn project_with_strategy(
    balance: Decimal,
    annual_contribution: Decimal,
    strategy: InvestmentStrategy,
    years: u32,
    rules: &RuleSet,
) -> EngineResult<Decimal> {
    let rate = rules.investment_return(strategy);
    project_super_balance(balance, annual_contribution, rate, years)
}

/// Builds a year-by-year series for charting, starting with year 0.
pub fn growth_series(
    initial_balance: Decimal,
    annual_contribution: Decimal,
    rate: Decimal,
    years: u32,
) -> EngineResult<Vec<ProjectionPoint>> {
    let growth = growth_factor(rate)?;
    let mut balance = initial_balance;
    let mut contributions = Decimal::ZERO;
    let mut points = Vec::with_capacity(years as usize + 1);

    points.push(ProjectionPoint {
        year: 0,
        balance: round_to_cents(balance),
        total_contributions: Decimal::ZERO,
        total_growth: Decimal::ZERO,
    });

    for year in 1..=years {
        contributions = contributions
            .checked_add(annual_contribution)
            .ok_or_else(|| EngineError::overflow("growth series"))?;
        balance = balance
            .checked_add(annual_contribution)
            .and_then(|b| b.checked_mul(growth))
            .ok_or_else(|| EngineError::overflow("growth series"))?;

        let rounded = round_to_cents(balance);
        let growth_to_date = rounded
            .checked_sub(initial_balance)
            .and_then(|g| g.checked_sub(contributions))
            .ok_or_else(|| EngineError::overflow("growth series"))?;
        points.push(ProjectionPoint {
            year,
            balance: rounded,
            total_contributions: round_to_cents(contributions),
            total_growth: round_to_cents(growth_to_date),
        });
    }

    Ok(points)
}
