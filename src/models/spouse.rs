//! Spouse contribution scenario and result models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

use super::AuditTrace;

/// Inputs for a spouse contribution scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpouseScenario {
    /// Assessable income of the receiving spouse.
    pub spouse_income: Decimal,
    /// Amount contributed to the spouse's superannuation.
    pub contribution_amount: Decimal,
}

impl SpouseScenario {
    /// Checks that income and contribution are non-negative.
    pub fn validate(&self) -> EngineResult<()> {
        if self.spouse_income < Decimal::ZERO {
            return Err(EngineError::invalid_input(
                "spouse_income",
                format!("must not be negative, got {}", self.spouse_income),
            ));
        }
        if self.contribution_amount < Decimal::ZERO {
            return Err(EngineError::invalid_input(
                "contribution_amount",
                format!("must not be negative, got {}", self.contribution_amount),
            ));
        }
        Ok(())
    }
}

/// The outcome of a spouse contribution scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpouseResult {
    /// Tax offset available to the contributing spouse.
    pub tax_offset: Decimal,
    /// Offset as a percentage of the contribution (18.00 means 18%).
    pub effective_rate: Decimal,
    /// Modeled benefit; equal to the offset.
    pub net_benefit: Decimal,
    /// The spouse's income is below the upper threshold.
    pub eligible: bool,
    /// Steps and advisories behind this result.
    pub audit_trace: AuditTrace,
}
