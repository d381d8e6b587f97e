//! Spouse contribution tax offset calculation.
//!
//! A contribution to a lower-earning spouse's superannuation earns a tax
//! offset at a flat rate, capped at the rule set's maximum. The offset
//! tapers linearly to zero as the spouse's income rises from the lower to
//! the upper income threshold.

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::config::RuleSet;
use crate::error::EngineResult;
use crate::models::{AuditTrace, SpouseResult, SpouseScenario, WarningSeverity};

use super::{round_half_up, round_to_cents};

/// Warning code raised when the spouse earns too much to qualify.
pub const SPOUSE_OFFSET_INELIGIBLE: &str = "SPOUSE_OFFSET_INELIGIBLE";

/// Evaluates spouse contribution scenarios under one rule set.
#[derive(Debug, Clone, Copy)]
pub struct SpouseCalculator<'a> {
    rules: &'a RuleSet,
}

impl<'a> SpouseCalculator<'a> {
    /// Creates a calculator bound to a rule set.
    pub fn new(rules: &'a RuleSet) -> Self {
        Self { rules }
    }

    /// Contribution at which the flat-rate offset reaches the maximum.
    pub fn qualifying_cap(&self) -> Decimal {
        let params = self.rules.spouse_offset();
        if params.offset_rate.is_zero() {
            return Decimal::ZERO;
        }
        params.max_offset / params.offset_rate
    }

    /// Returns true when the spouse's income is below the upper threshold.
    pub fn is_eligible(&self, spouse_income: Decimal) -> bool {
        spouse_income < self.rules.spouse_offset().income_high
    }

    /// The largest contribution that still earns additional offset.
    ///
    /// This is the qualifying cap while the spouse is eligible, and zero
    /// otherwise. Contributions beyond it add nothing to the offset.
    pub fn optimal_contribution(&self, spouse_income: Decimal) -> Decimal {
        if self.is_eligible(spouse_income) {
            round_to_cents(self.qualifying_cap())
        } else {
            Decimal::ZERO
        }
    }

    /// Evaluates a spouse contribution scenario.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a negative income or contribution.
    pub fn evaluate(&self, scenario: &SpouseScenario) -> EngineResult<SpouseResult> {
        scenario.validate()?;

        let params = self.rules.spouse_offset();
        let mut trace = AuditTrace::default();
        let income = scenario.spouse_income;
        let contribution = scenario.contribution_amount;

        let qualifying_cap = self.qualifying_cap();
        let eligible_contribution = contribution.min(qualifying_cap);
        trace.record(
            "eligible_contribution",
            "Eligible Contribution",
            serde_json::json!({
                "contribution_amount": contribution.to_string(),
                "max_offset": params.max_offset.to_string(),
                "offset_rate": params.offset_rate.to_string()
            }),
            serde_json::json!({
                "qualifying_cap": round_to_cents(qualifying_cap).to_string(),
                "eligible_contribution": round_to_cents(eligible_contribution).to_string()
            }),
            format!(
                "Contributions up to ${} earn the offset",
                round_to_cents(qualifying_cap)
            ),
        );

        let (factor, reasoning) = if income <= params.income_low {
            (
                Decimal::ONE,
                format!(
                    "Spouse income ${} is at or below ${}: full offset",
                    income.normalize(),
                    params.income_low.normalize()
                ),
            )
        } else if income < params.income_high {
            let factor =
                (params.income_high - income) / (params.income_high - params.income_low);
            (
                factor,
                format!(
                    "Spouse income ${} is inside the taper: (${} - ${}) / (${} - ${}) = {}",
                    income.normalize(),
                    params.income_high.normalize(),
                    income.normalize(),
                    params.income_high.normalize(),
                    params.income_low.normalize(),
                    round_half_up(factor, 4)
                ),
            )
        } else {
            (
                Decimal::ZERO,
                format!(
                    "Spouse income ${} is at or above ${}: no offset",
                    income.normalize(),
                    params.income_high.normalize()
                ),
            )
        };

        let raw_offset = eligible_contribution * params.offset_rate * factor;
        let tax_offset = round_to_cents(raw_offset.max(Decimal::ZERO).min(params.max_offset));
        trace.record(
            "spouse_tax_offset",
            "Spouse Tax Offset",
            serde_json::json!({
                "spouse_income": income.to_string(),
                "income_low": params.income_low.to_string(),
                "income_high": params.income_high.to_string(),
                "taper_factor": factor.to_string()
            }),
            serde_json::json!({ "tax_offset": tax_offset.to_string() }),
            reasoning,
        );

        let eligible = self.is_eligible(income);
        if !eligible {
            warn!(
                spouse_income = %income,
                income_high = %params.income_high,
                "Spouse income too high for the contribution offset"
            );
            trace.warn(
                SPOUSE_OFFSET_INELIGIBLE,
                format!(
                    "Spouse income of ${} is at or above ${}; no tax offset is available",
                    income.normalize(),
                    params.income_high.normalize()
                ),
                WarningSeverity::Warning,
            );
        }

        let effective_rate = if contribution > Decimal::ZERO {
            round_half_up(tax_offset / contribution * Decimal::ONE_HUNDRED, 2)
        } else {
            Decimal::ZERO
        };

        debug!(
            spouse_income = %income,
            contribution = %contribution,
            tax_offset = %tax_offset,
            "Evaluated spouse contribution"
        );

        Ok(SpouseResult {
            tax_offset,
            effective_rate,
            net_benefit: tax_offset,
            eligible,
            audit_trace: trace,
        })
    }
}
