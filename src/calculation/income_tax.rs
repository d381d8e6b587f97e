//! Progressive income tax and secondary levy.
//!
//! This module provides the [`TaxEngine`], which applies a rule set's
//! bracket table and levy to an income. Every other calculator that needs
//! tax figures goes through it.

use rust_decimal::Decimal;

use crate::config::RuleSet;
use crate::error::{EngineError, EngineResult};
use crate::models::TaxResult;

use super::round_to_cents;

/// Computes income tax, levy and marginal rates under one rule set.
///
/// # Examples
///
/// ```no_run
/// use strategy_engine::calculation::TaxEngine;
/// use strategy_engine::config::RuleSetLoader;
/// use rust_decimal::Decimal;
///
/// let rules = RuleSetLoader::load("./config/au_2024_25.yaml")?;
/// let engine = TaxEngine::new(&rules);
///
/// assert_eq!(engine.income_tax(Decimal::from(30000)), Decimal::from(1888));
/// # Ok::<(), strategy_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TaxEngine<'a> {
    rules: &'a RuleSet,
}

impl<'a> TaxEngine<'a> {
    /// Creates a tax engine bound to a rule set.
    pub fn new(rules: &'a RuleSet) -> Self {
        Self { rules }
    }

    /// Returns the rule set this engine applies.
    pub fn rules(&self) -> &'a RuleSet {
        self.rules
    }

    /// Calculates progressive income tax.
    ///
    /// Walks the brackets in ascending order, taxing the part of `income`
    /// above the previous bracket's upper bound and up to this bracket's
    /// upper bound at this bracket's rate. Income exactly on a boundary stays
    /// in the lower bracket. The sum is rounded to cents once, at the end.
    ///
    /// Returns zero for zero or negative income.
    pub fn income_tax(&self, income: Decimal) -> Decimal {
        if income <= Decimal::ZERO {
            return Decimal::ZERO;
        }

        let mut tax = Decimal::ZERO;
        let mut floor = Decimal::ZERO;

        for bracket in self.rules.brackets() {
            let ceiling = match bracket.max {
                Some(max) => income.min(max),
                None => income,
            };

            if ceiling > floor {
                tax += (ceiling - floor) * bracket.rate;
            }

            match bracket.max {
                Some(max) if income > max => floor = max,
                _ => break,
            }
        }

        round_to_cents(tax)
    }

    /// Calculates the secondary levy.
    ///
    /// The levy is all-or-nothing: zero at or below the threshold, and the
    /// full rate on the whole income above it. There is no phase-in band.
    pub fn levy(&self, income: Decimal, include_levy: bool) -> Decimal {
        if !include_levy || income <= self.rules.levy_threshold() {
            return Decimal::ZERO;
        }
        round_to_cents(income * self.rules.levy_rate())
    }

    /// Returns the marginal rate at `income`.
    ///
    /// This is the rate of the bracket containing `income`, plus the levy
    /// rate when the levy is included and `income` is above its threshold.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if `income` is negative
    /// - `InvariantViolation` if no bracket contains `income`
    pub fn marginal_rate(&self, income: Decimal, include_levy: bool) -> EngineResult<Decimal> {
        if income < Decimal::ZERO {
            return Err(EngineError::invalid_input(
                "income",
                format!("must not be negative, got {}", income),
            ));
        }

        let bracket_rate = self.bracket_rate(income)?;

        if include_levy && income > self.rules.levy_threshold() {
            Ok(bracket_rate + self.rules.levy_rate())
        } else {
            Ok(bracket_rate)
        }
    }

    /// Calculates income tax and levy together.
    pub fn total_tax(&self, income: Decimal, include_levy: bool) -> TaxResult {
        TaxResult::new(self.income_tax(income), self.levy(income, include_levy))
    }

    /// Returns income less total tax, rounded to cents.
    pub fn take_home_pay(&self, income: Decimal, include_levy: bool) -> Decimal {
        round_to_cents(income - self.total_tax(income, include_levy).total_tax)
    }

    fn bracket_rate(&self, income: Decimal) -> EngineResult<Decimal> {
        let mut previous_max: Option<Decimal> = None;

        for bracket in self.rules.brackets() {
            let above_floor = match previous_max {
                Some(prev) => income > prev,
                None => income >= bracket.min,
            };

            if above_floor && bracket.covers_up_to(income) {
                return Ok(bracket.rate);
            }

            previous_max = bracket.max;
        }

        Err(EngineError::InvariantViolation {
            message: format!("no tax bracket contains income {}", income),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::reference_rule_set;
    use crate::error::ErrorKind;
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    /// IT-001: zero and negative income pay no tax
    #[test]
    fn test_zero_income_pays_no_tax() {
        let rules = reference_rule_set();
        let engine = TaxEngine::new(&rules);

        assert_eq!(engine.income_tax(dec("0")), dec("0"));
        assert_eq!(engine.income_tax(dec("-5000")), dec("0"));
    }

    /// IT-002: income up to the tax-free threshold pays no tax
    #[test]
    fn test_tax_free_threshold() {
        let rules = reference_rule_set();
        let engine = TaxEngine::new(&rules);

        assert_eq!(engine.income_tax(dec("10000")), dec("0"));
        assert_eq!(engine.income_tax(dec("18200")), dec("0"));
    }

    /// IT-003: second bracket
    #[test]
    fn test_second_bracket() {
        let rules = reference_rule_set();
        let engine = TaxEngine::new(&rules);

        // (30000 - 18200) * 0.16
        assert_eq!(engine.income_tax(dec("30000")), dec("1888"));
    }

    /// IT-004: third bracket
    #[test]
    fn test_third_bracket() {
        let rules = reference_rule_set();
        let engine = TaxEngine::new(&rules);

        // 26800 * 0.16 + 35000 * 0.30
        assert_eq!(engine.income_tax(dec("80000")), dec("14788"));
    }

    /// IT-005: top bracket
    #[test]
    fn test_top_bracket() {
        let rules = reference_rule_set();
        let engine = TaxEngine::new(&rules);

        // 4288 + 27000 + 20350 + 10000 * 0.45
        assert_eq!(engine.income_tax(dec("200000")), dec("56138"));
    }

    /// IT-006: income on a boundary is taxed in the lower bracket
    #[test]
    fn test_boundaries_close_lower_bracket() {
        let rules = reference_rule_set();
        let engine = TaxEngine::new(&rules);

        assert_eq!(engine.income_tax(dec("45000")), dec("4288"));
        assert_eq!(engine.income_tax(dec("45001")), dec("4288.30"));
        assert_eq!(engine.income_tax(dec("135000")), dec("31288"));
        assert_eq!(engine.income_tax(dec("190000")), dec("51638"));
    }

    /// IT-007: rounding happens once, on the final sum
    #[test]
    fn test_rounds_final_sum_to_cents() {
        let rules = reference_rule_set();
        let engine = TaxEngine::new(&rules);

        // 0.03 * 0.16 = 0.0048 -> 0.00
        assert_eq!(engine.income_tax(dec("18200.03")), dec("0.00"));
        // 0.04 * 0.16 = 0.0064 -> 0.01
        assert_eq!(engine.income_tax(dec("18200.04")), dec("0.01"));
    }

    /// LV-001: levy below threshold is zero
    #[test]
    fn test_levy_below_threshold() {
        let rules = reference_rule_set();
        let engine = TaxEngine::new(&rules);

        assert_eq!(engine.levy(dec("20000"), true), dec("0"));
        assert_eq!(engine.levy(dec("24276"), true), dec("0"));
    }

    /// LV-002: levy above threshold applies to the whole income
    #[test]
    fn test_levy_above_threshold() {
        let rules = reference_rule_set();
        let engine = TaxEngine::new(&rules);

        assert_eq!(engine.levy(dec("50000"), true), dec("1000"));
        assert_eq!(engine.levy(dec("24277"), true), dec("485.54"));
    }

    /// LV-003: levy excluded when not requested
    #[test]
    fn test_levy_excluded() {
        let rules = reference_rule_set();
        let engine = TaxEngine::new(&rules);

        assert_eq!(engine.levy(dec("50000"), false), dec("0"));
    }

    /// MR-001: marginal rates without levy
    #[test]
    fn test_marginal_rate_without_levy() {
        let rules = reference_rule_set();
        let engine = TaxEngine::new(&rules);

        assert_eq!(engine.marginal_rate(dec("15000"), false).unwrap(), dec("0"));
        assert_eq!(
            engine.marginal_rate(dec("30000"), false).unwrap(),
            dec("0.16")
        );
        assert_eq!(
            engine.marginal_rate(dec("80000"), false).unwrap(),
            dec("0.30")
        );
        assert_eq!(
            engine.marginal_rate(dec("150000"), false).unwrap(),
            dec("0.37")
        );
        assert_eq!(
            engine.marginal_rate(dec("200000"), false).unwrap(),
            dec("0.45")
        );
    }

    /// MR-002: marginal rates include the levy above its threshold
    #[test]
    fn test_marginal_rate_with_levy() {
        let rules = reference_rule_set();
        let engine = TaxEngine::new(&rules);

        assert_eq!(
            engine.marginal_rate(dec("30000"), true).unwrap(),
            dec("0.18")
        );
        assert_eq!(
            engine.marginal_rate(dec("80000"), true).unwrap(),
            dec("0.32")
        );
        assert_eq!(engine.marginal_rate(dec("20000"), true).unwrap(), dec("0.16"));
    }

    /// MR-003: boundary and fractional incomes
    #[test]
    fn test_marginal_rate_at_boundaries() {
        let rules = reference_rule_set();
        let engine = TaxEngine::new(&rules);

        assert_eq!(engine.marginal_rate(dec("0"), false).unwrap(), dec("0"));
        assert_eq!(engine.marginal_rate(dec("18200"), false).unwrap(), dec("0"));
        assert_eq!(
            engine.marginal_rate(dec("18200.50"), false).unwrap(),
            dec("0.16")
        );
        assert_eq!(
            engine.marginal_rate(dec("45000"), false).unwrap(),
            dec("0.16")
        );
        assert_eq!(
            engine.marginal_rate(dec("45001"), false).unwrap(),
            dec("0.30")
        );
    }

    /// MR-004: negative income is rejected
    #[test]
    fn test_marginal_rate_negative_income() {
        let rules = reference_rule_set();
        let engine = TaxEngine::new(&rules);

        let err = engine.marginal_rate(dec("-1"), true).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    /// TT-001: total tax combines income tax and levy
    #[test]
    fn test_total_tax() {
        let rules = reference_rule_set();
        let engine = TaxEngine::new(&rules);

        let result = engine.total_tax(dec("80000"), true);
        assert_eq!(result.income_tax, dec("14788"));
        assert_eq!(result.levy, dec("1600"));
        assert_eq!(result.total_tax, dec("16388"));
    }

    #[test]
    fn test_take_home_pay() {
        let rules = reference_rule_set();
        let engine = TaxEngine::new(&rules);

        assert_eq!(engine.take_home_pay(dec("80000"), true), dec("63612"));
        assert_eq!(engine.take_home_pay(dec("80000"), false), dec("65212"));
    }

    proptest! {
        #[test]
        fn prop_income_tax_is_non_decreasing(a in 0u32..400_000, step in 1u32..20_000) {
            let rules = reference_rule_set();
            let engine = TaxEngine::new(&rules);

            let lower = engine.income_tax(Decimal::from(a));
            let higher = engine.income_tax(Decimal::from(a + step));
            prop_assert!(higher >= lower);
        }

        #[test]
        fn prop_slope_equals_marginal_rate(income in 0u32..400_000) {
            let rules = reference_rule_set();
            let engine = TaxEngine::new(&rules);

            // One extra dollar is taxed at the rate of the bracket holding it.
            let next = Decimal::from(income + 1);
            let delta = engine.income_tax(next) - engine.income_tax(Decimal::from(income));
            let rate = engine.marginal_rate(next, false).unwrap();
            prop_assert_eq!(delta, rate);
        }
    }
}
