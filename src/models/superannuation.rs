//! Superannuation contribution scenario and result models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

use super::{AuditTrace, TaxResult};

/// Inputs for a superannuation contribution scenario.
///
/// # Example
///
/// ```
/// use strategy_engine::models::SuperScenario;
/// use rust_decimal::Decimal;
///
/// let scenario = SuperScenario {
///     taxable_income: Decimal::from(80000),
///     salary_sacrifice: Decimal::from(10000),
///     personal_deductible: Decimal::ZERO,
///     guarantee_rate_override: None,
///     include_levy: true,
/// };
/// assert!(scenario.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuperScenario {
    /// Taxable income before any salary sacrifice.
    pub taxable_income: Decimal,
    /// Pre-tax contributions made through the employer.
    pub salary_sacrifice: Decimal,
    /// After-tax contributions later claimed as a deduction.
    pub personal_deductible: Decimal,
    /// Employer guarantee rate to use instead of the rule set's rate.
    #[serde(default)]
    pub guarantee_rate_override: Option<Decimal>,
    /// Whether the secondary levy is included in tax figures.
    pub include_levy: bool,
}

impl SuperScenario {
    /// Checks that every amount is non-negative and any override rate lies in `[0, 1]`.
    pub fn validate(&self) -> EngineResult<()> {
        for (field, value) in [
            ("taxable_income", self.taxable_income),
            ("salary_sacrifice", self.salary_sacrifice),
            ("personal_deductible", self.personal_deductible),
        ] {
            if value < Decimal::ZERO {
                return Err(EngineError::invalid_input(
                    field,
                    format!("must not be negative, got {}", value),
                ));
            }
        }

        if let Some(rate) = self.guarantee_rate_override {
            if rate < Decimal::ZERO || rate > Decimal::ONE {
                return Err(EngineError::invalid_input(
                    "guarantee_rate_override",
                    format!("must be between 0 and 1, got {}", rate),
                ));
            }
        }

        Ok(())
    }
}

/// The outcome of a superannuation contribution scenario.
///
/// Advisory conditions are reported through `exceeds_cap` and
/// `high_income_surcharge_applies` (and mirrored in the audit trace
/// warnings); they are never errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuperResult {
    /// Salary sacrifice amount from the scenario.
    pub salary_sacrifice: Decimal,
    /// Personal deductible amount from the scenario.
    pub personal_deductible: Decimal,
    /// Employer guarantee contribution.
    pub employer_guarantee: Decimal,
    /// `salary_sacrifice + personal_deductible`.
    pub user_contributions: Decimal,
    /// Employer guarantee plus user contributions.
    pub total_concessional: Decimal,
    /// Taxable income before the strategy.
    pub taxable_income_before: Decimal,
    /// Taxable income after salary sacrifice.
    pub taxable_income_after: Decimal,
    /// Tax on the original income.
    pub tax_before: TaxResult,
    /// Tax on the adjusted income.
    pub tax_after: TaxResult,
    /// Contributions tax on the user contributions.
    pub contributions_tax: Decimal,
    /// User contributions net of contributions tax.
    pub net_into_super: Decimal,
    /// Net annual tax benefit; negative when contributions tax outweighs the saving.
    pub tax_saving: Decimal,
    /// Take-home pay without the strategy.
    pub take_home_before: Decimal,
    /// Take-home pay with the strategy.
    pub take_home_after: Decimal,
    /// `take_home_after - take_home_before`.
    pub take_home_delta: Decimal,
    /// Marginal rate at the original income.
    pub marginal_rate: Decimal,
    /// Total concessional contributions exceed the annual cap.
    pub exceeds_cap: bool,
    /// Income is at or above the high-income surcharge threshold.
    pub high_income_surcharge_applies: bool,
    /// Indicative surcharge on concessional contributions; zero when it does not apply.
    pub high_income_surcharge_estimate: Decimal,
    /// Steps and advisories behind this result.
    pub audit_trace: AuditTrace,
}
