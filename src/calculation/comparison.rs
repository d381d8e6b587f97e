//! Side-by-side evaluation of the three strategies.

use rust_decimal::Decimal;
use tracing::info;

use crate::config::RuleSet;
use crate::error::EngineResult;
use crate::models::{
    OffsetScenario, SpouseScenario, Strategy, StrategyComparison, StrategySummary, SuperScenario,
};

use super::{OffsetCalculator, SpouseCalculator, SuperCalculator};

impl StrategyComparison {
    /// Runs every calculator against one rule set and summarises the results.
    ///
    /// Annual benefit is the tax saved for superannuation, the first-year
    /// interest saved for the offset account, and the tax offset for a
    /// spouse contribution. Take-home impact is the change in spendable cash:
    /// money moved into an offset account stays available, so only the
    /// interest saved counts there.
    ///
    /// # Errors
    ///
    /// Fails with the first calculator error; no partial comparison is built.
    pub fn evaluate(
        rules: &RuleSet,
        superannuation: &SuperScenario,
        offset: &OffsetScenario,
        spouse: &SpouseScenario,
    ) -> EngineResult<Self> {
        let super_result = SuperCalculator::new(rules).evaluate(superannuation)?;
        let offset_result = OffsetCalculator::new().evaluate(offset)?;
        let spouse_result = SpouseCalculator::new(rules).evaluate(spouse)?;

        let summaries = vec![
            StrategySummary {
                strategy: Strategy::SuperContribution,
                annual_benefit: super_result.tax_saving,
                take_home_impact: super_result.take_home_delta,
                amount_committed: super_result.user_contributions,
            },
            StrategySummary {
                strategy: Strategy::MortgageOffset,
                annual_benefit: offset_result.interest_saved_year1,
                take_home_impact: offset_result.annual_cash_flow_improvement,
                amount_committed: offset.additional_contribution,
            },
            StrategySummary {
                strategy: Strategy::SpouseContribution,
                annual_benefit: spouse_result.net_benefit,
                take_home_impact: spouse_result.net_benefit - spouse.contribution_amount,
                amount_committed: spouse.contribution_amount,
            },
        ];

        // Strict comparison keeps the earliest strategy on ties.
        let mut best: Option<&StrategySummary> = None;
        for summary in summaries.iter().filter(|s| s.annual_benefit > Decimal::ZERO) {
            if best.is_none_or(|b| summary.annual_benefit > b.annual_benefit) {
                best = Some(summary);
            }
        }
        let best_annual_benefit = best.map(|s| s.strategy);

        let warnings = super_result
            .audit_trace
            .warnings
            .iter()
            .chain(&offset_result.audit_trace.warnings)
            .chain(&spouse_result.audit_trace.warnings)
            .cloned()
            .collect::<Vec<_>>();

        info!(
            rule_set = %rules.metadata().code,
            best = ?best_annual_benefit,
            warnings = warnings.len(),
            "Compared strategies"
        );

        Ok(StrategyComparison {
            superannuation: super_result,
            offset: offset_result,
            spouse: spouse_result,
            summaries,
            best_annual_benefit,
            warnings,
        })
    }
}
