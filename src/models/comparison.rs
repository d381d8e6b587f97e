//! Side-by-side strategy comparison models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{AuditWarning, OffsetResult, SpouseResult, SuperResult};

/// One of the three modeled strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Salary sacrifice and personal deductible superannuation contributions.
    SuperContribution,
    /// Extra savings held in a mortgage offset account.
    MortgageOffset,
    /// Contributions to a lower-earning spouse's superannuation.
    SpouseContribution,
}

/// Headline figures for one strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategySummary {
    /// The strategy summarised.
    pub strategy: Strategy,
    /// First-year financial benefit (tax saved, interest saved or offset).
    pub annual_benefit: Decimal,
    /// Change in spendable cash for the year.
    pub take_home_impact: Decimal,
    /// Amount put to work by the strategy.
    pub amount_committed: Decimal,
}

/// All three strategies evaluated against one rule set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyComparison {
    /// Full superannuation result.
    pub superannuation: SuperResult,
    /// Full mortgage offset result.
    pub offset: OffsetResult,
    /// Full spouse contribution result.
    pub spouse: SpouseResult,
    /// One summary per strategy, in a fixed order.
    pub summaries: Vec<StrategySummary>,
    /// Strategy with the largest positive annual benefit, if any.
    pub best_annual_benefit: Option<Strategy>,
    /// Advisories raised by any of the calculators.
    pub warnings: Vec<AuditWarning>,
}

impl StrategyComparison {
    /// Returns the summary for a strategy.
    pub fn summary(&self, strategy: Strategy) -> Option<&StrategySummary> {
        self.summaries.iter().find(|s| s.strategy == strategy)
    }
}
