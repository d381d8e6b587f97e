//! Superannuation contribution strategy calculation.
//!
//! This module models salary sacrifice and personal deductible
//! contributions alongside the employer guarantee: contributions tax, the
//! net amount invested, the change in income tax and take-home pay, and
//! the concessional cap and high-income surcharge advisories.

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::config::RuleSet;
use crate::error::{EngineError, EngineResult};
use crate::models::{AuditTrace, SuperResult, SuperScenario, WarningSeverity};

use super::{TaxEngine, round_to_cents};

/// Warning code raised when total concessional contributions exceed the cap.
pub const CONCESSIONAL_CAP_EXCEEDED: &str = "CONCESSIONAL_CAP_EXCEEDED";

/// Warning code raised when income reaches the high-income surcharge threshold.
pub const HIGH_INCOME_SURCHARGE: &str = "HIGH_INCOME_SURCHARGE";

/// Evaluates superannuation contribution scenarios under one rule set.
#[derive(Debug, Clone, Copy)]
pub struct SuperCalculator<'a> {
    rules: &'a RuleSet,
    tax: TaxEngine<'a>,
}

impl<'a> SuperCalculator<'a> {
    /// Creates a calculator bound to a rule set.
    pub fn new(rules: &'a RuleSet) -> Self {
        Self {
            rules,
            tax: TaxEngine::new(rules),
        }
    }

    /// Evaluates a contribution scenario.
    ///
    /// Only salary sacrifice reduces taxable income. Personal deductible
    /// contributions are paid from after-tax cash, so they come straight off
    /// take-home pay, but they are still taxed at the contributions rate.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for negative amounts or an override rate
    /// outside `[0, 1]`, and `InvariantViolation` if the contribution totals
    /// overflow. No partial result is produced.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use strategy_engine::calculation::SuperCalculator;
    /// use strategy_engine::config::RuleSetLoader;
    /// use strategy_engine::models::SuperScenario;
    /// use rust_decimal::Decimal;
    ///
    /// let rules = RuleSetLoader::load("./config/au_2024_25.yaml")?;
    /// let result = SuperCalculator::new(&rules).evaluate(&SuperScenario {
    ///     taxable_income: Decimal::from(80000),
    ///     salary_sacrifice: Decimal::from(10000),
    ///     personal_deductible: Decimal::ZERO,
    ///     guarantee_rate_override: None,
    ///     include_levy: true,
    /// })?;
    ///
    /// assert_eq!(result.net_into_super, Decimal::from(8500));
    /// # Ok::<(), strategy_engine::error::EngineError>(())
    /// ```
    pub fn evaluate(&self, scenario: &SuperScenario) -> EngineResult<SuperResult> {
        scenario.validate()?;

        let mut trace = AuditTrace::default();
        let income = scenario.taxable_income;

        let guarantee_rate = scenario
            .guarantee_rate_override
            .unwrap_or_else(|| self.rules.guarantee_rate());
        let rate_source = match scenario.guarantee_rate_override {
            Some(_) => "override",
            None => "rule_set",
        };
        let employer_guarantee = round_to_cents(income * guarantee_rate);
        trace.record(
            "employer_guarantee",
            "Employer Guarantee",
            serde_json::json!({
                "taxable_income": income.to_string(),
                "guarantee_rate": guarantee_rate.to_string(),
                "rate_source": rate_source
            }),
            serde_json::json!({ "employer_guarantee": employer_guarantee.to_string() }),
            format!(
                "${} x {} = ${}",
                income.normalize(),
                guarantee_rate.normalize(),
                employer_guarantee
            ),
        );

        let user_contributions = scenario
            .salary_sacrifice
            .checked_add(scenario.personal_deductible)
            .ok_or_else(|| EngineError::overflow("user contributions"))?;
        let total_concessional = employer_guarantee
            .checked_add(user_contributions)
            .ok_or_else(|| EngineError::overflow("concessional contributions"))?;
        trace.record(
            "concessional_total",
            "Concessional Contributions",
            serde_json::json!({
                "employer_guarantee": employer_guarantee.to_string(),
                "salary_sacrifice": scenario.salary_sacrifice.to_string(),
                "personal_deductible": scenario.personal_deductible.to_string()
            }),
            serde_json::json!({
                "user_contributions": user_contributions.to_string(),
                "total_concessional": total_concessional.to_string()
            }),
            format!(
                "${} + ${} + ${} = ${}",
                employer_guarantee,
                scenario.salary_sacrifice.normalize(),
                scenario.personal_deductible.normalize(),
                total_concessional
            ),
        );

        let adjusted_income = (income - scenario.salary_sacrifice).max(Decimal::ZERO);
        let tax_before = self.tax.total_tax(income, scenario.include_levy);
        let tax_after = self.tax.total_tax(adjusted_income, scenario.include_levy);
        trace.record(
            "income_tax",
            "Income Tax Before and After",
            serde_json::json!({
                "taxable_income_before": income.to_string(),
                "taxable_income_after": adjusted_income.to_string(),
                "include_levy": scenario.include_levy
            }),
            serde_json::json!({
                "total_tax_before": tax_before.total_tax.to_string(),
                "total_tax_after": tax_after.total_tax.to_string()
            }),
            format!(
                "Tax on ${} = ${}; tax on ${} after salary sacrifice = ${}",
                income.normalize(),
                tax_before.total_tax,
                adjusted_income.normalize(),
                tax_after.total_tax
            ),
        );

        let contributions_tax =
            round_to_cents(user_contributions * self.rules.contributions_tax_rate());
        let net_into_super = round_to_cents(user_contributions - contributions_tax);
        trace.record(
            "contributions_tax",
            "Contributions Tax",
            serde_json::json!({
                "user_contributions": user_contributions.to_string(),
                "contributions_tax_rate": self.rules.contributions_tax_rate().to_string()
            }),
            serde_json::json!({
                "contributions_tax": contributions_tax.to_string(),
                "net_into_super": net_into_super.to_string()
            }),
            format!(
                "${} x {} = ${} tax; ${} invested",
                user_contributions.normalize(),
                self.rules.contributions_tax_rate().normalize(),
                contributions_tax,
                net_into_super
            ),
        );

        let tax_saving =
            round_to_cents(tax_before.total_tax - tax_after.total_tax - contributions_tax);
        let take_home_before = round_to_cents(income - tax_before.total_tax);
        let take_home_after = round_to_cents(
            adjusted_income - tax_after.total_tax - scenario.personal_deductible,
        );
        let take_home_delta = take_home_after
            .checked_sub(take_home_before)
            .ok_or_else(|| EngineError::overflow("take-home change"))?;
        trace.record(
            "take_home",
            "Tax Saving and Take-Home Pay",
            serde_json::json!({
                "total_tax_before": tax_before.total_tax.to_string(),
                "total_tax_after": tax_after.total_tax.to_string(),
                "contributions_tax": contributions_tax.to_string()
            }),
            serde_json::json!({
                "tax_saving": tax_saving.to_string(),
                "take_home_before": take_home_before.to_string(),
                "take_home_after": take_home_after.to_string(),
                "take_home_delta": take_home_delta.to_string()
            }),
            format!(
                "Saving ${} - ${} - ${} = ${}; take-home changes by ${}",
                tax_before.total_tax,
                tax_after.total_tax,
                contributions_tax,
                tax_saving,
                take_home_delta
            ),
        );

        let marginal_rate = self.tax.marginal_rate(income, scenario.include_levy)?;

        let exceeds_cap = total_concessional > self.rules.concessional_cap();
        if exceeds_cap {
            warn!(
                total_concessional = %total_concessional,
                cap = %self.rules.concessional_cap(),
                "Concessional contributions exceed cap"
            );
            trace.warn(
                CONCESSIONAL_CAP_EXCEEDED,
                format!(
                    "Total concessional contributions (${}) exceed the annual cap of ${}",
                    total_concessional,
                    self.rules.concessional_cap()
                ),
                WarningSeverity::Warning,
            );
        }

        let high_income_surcharge_applies = income >= self.rules.high_income_threshold();
        let high_income_surcharge_estimate = if high_income_surcharge_applies {
            warn!(
                taxable_income = %income,
                threshold = %self.rules.high_income_threshold(),
                "High-income surcharge threshold reached"
            );
            trace.warn(
                HIGH_INCOME_SURCHARGE,
                format!(
                    "Income of ${} is at or above ${}; an additional {} tax may apply to concessional contributions",
                    income.normalize(),
                    self.rules.high_income_threshold(),
                    self.rules.high_income_additional_rate().normalize()
                ),
                WarningSeverity::Info,
            );
            round_to_cents(total_concessional * self.rules.high_income_additional_rate())
        } else {
            Decimal::ZERO
        };

        debug!(
            taxable_income = %income,
            total_concessional = %total_concessional,
            tax_saving = %tax_saving,
            take_home_delta = %take_home_delta,
            "Evaluated super scenario"
        );

        Ok(SuperResult {
            salary_sacrifice: scenario.salary_sacrifice,
            personal_deductible: scenario.personal_deductible,
            employer_guarantee,
            user_contributions,
            total_concessional,
            taxable_income_before: income,
            taxable_income_after: adjusted_income,
            tax_before,
            tax_after,
            contributions_tax,
            net_into_super,
            tax_saving,
            take_home_before,
            take_home_after,
            take_home_delta,
            marginal_rate,
            exceeds_cap,
            high_income_surcharge_applies,
            high_income_surcharge_estimate,
            audit_trace: trace,
        })
    }
}
