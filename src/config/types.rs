//! Rule set types for a single tax year.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML rule set files, and the validated
//! [`RuleSet`] every calculator consumes.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Metadata identifying the tax year a rule set applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSetMetadata {
    /// A short code for the rule set (e.g., "AU-2024-25").
    pub code: String,
    /// The human-readable name of the rule set.
    pub name: String,
    /// First day of the tax year (inclusive).
    pub tax_year_start: NaiveDate,
    /// Last day of the tax year (inclusive).
    pub tax_year_end: NaiveDate,
    /// URL to the published parameters.
    pub source_url: String,
}

/// A single income tax bracket.
///
/// Brackets are whole-dollar closed ranges `[min, max]` as published by the
/// tax office, so the next bracket starts at `max + 1`. Income between
/// `max` and `max + 1` is taxed at the next bracket's rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    /// The lowest whole-dollar income in this bracket.
    pub min: Decimal,
    /// The highest income in this bracket, or `None` for the top bracket.
    #[serde(default)]
    pub max: Option<Decimal>,
    /// The marginal rate applied to income within this bracket.
    pub rate: Decimal,
}

impl TaxBracket {
    /// Returns true if `income` does not exceed this bracket's upper bound.
    pub fn covers_up_to(&self, income: Decimal) -> bool {
        self.max.is_none_or(|max| income <= max)
    }
}

/// The secondary income-based levy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevyRule {
    /// Flat rate applied to the whole income once above the threshold.
    pub rate: Decimal,
    /// Income at or below which no levy is payable.
    pub threshold: Decimal,
}

/// Superannuation contribution rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuperRules {
    /// Employer guarantee rate as a fraction of taxable income.
    pub guarantee_rate: Decimal,
    /// Annual cap on concessional contributions.
    pub concessional_cap: Decimal,
    /// Flat tax rate on concessional contributions.
    pub contributions_tax_rate: Decimal,
    /// Income at which the high-income surcharge applies.
    pub high_income_threshold: Decimal,
    /// Additional contributions tax rate for high-income earners.
    pub high_income_additional_rate: Decimal,
}

/// Spouse contribution tax offset rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpouseOffsetRules {
    /// The maximum offset that can be claimed.
    pub max_offset: Decimal,
    /// The offset rate applied to eligible contributions.
    pub offset_rate: Decimal,
    /// Spouse income at or below which the full offset is available.
    pub income_low: Decimal,
    /// Spouse income at or above which no offset is available.
    pub income_high: Decimal,
}

/// Indicative annual investment returns by strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvestmentReturns {
    /// Return for a conservative investment option.
    pub conservative: Decimal,
    /// Return for a balanced investment option.
    pub balanced: Decimal,
    /// Return for a growth investment option.
    pub growth: Decimal,
}

/// A named investment option used to pick a projection return rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvestmentStrategy {
    /// Lower-risk option.
    Conservative,
    /// Default mixed option.
    Balanced,
    /// Higher-risk option.
    Growth,
}

/// The rule set document as it appears on disk.
///
/// This is the unvalidated form. Convert it with [`RuleSet::new`] before use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSetDocument {
    /// Tax year metadata.
    pub metadata: RuleSetMetadata,
    /// Income tax brackets in ascending order.
    pub brackets: Vec<TaxBracket>,
    /// Secondary levy parameters.
    pub levy: LevyRule,
    /// Superannuation parameters.
    pub superannuation: SuperRules,
    /// Spouse contribution offset parameters.
    pub spouse_offset: SpouseOffsetRules,
    /// Indicative investment returns.
    pub investment_returns: InvestmentReturns,
}

/// A validated, immutable rule set for one tax year.
///
/// A `RuleSet` can only be obtained through [`RuleSet::new`] (or the
/// loader), so every instance has contiguous brackets covering `[0, ∞)`
/// with non-decreasing rates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSet {
    metadata: RuleSetMetadata,
    brackets: Vec<TaxBracket>,
    levy: LevyRule,
    superannuation: SuperRules,
    spouse_offset: SpouseOffsetRules,
    investment_returns: InvestmentReturns,
}

impl RuleSet {
    /// Validates a document and freezes it into a `RuleSet`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidRuleSet`] if the brackets have gaps or
    /// overlaps, a rate falls outside `[0, 1]`, a threshold is negative, or
    /// the spouse income band is empty.
    pub fn new(document: RuleSetDocument) -> EngineResult<Self> {
        validate_metadata(&document.metadata)?;
        validate_brackets(&document.brackets)?;

        check_fraction("levy.rate", document.levy.rate)?;
        check_non_negative("levy.threshold", document.levy.threshold)?;

        let sup = &document.superannuation;
        check_fraction("superannuation.guarantee_rate", sup.guarantee_rate)?;
        check_fraction(
            "superannuation.contributions_tax_rate",
            sup.contributions_tax_rate,
        )?;
        check_fraction(
            "superannuation.high_income_additional_rate",
            sup.high_income_additional_rate,
        )?;
        check_non_negative("superannuation.concessional_cap", sup.concessional_cap)?;
        check_non_negative(
            "superannuation.high_income_threshold",
            sup.high_income_threshold,
        )?;

        let spouse = &document.spouse_offset;
        check_non_negative("spouse_offset.max_offset", spouse.max_offset)?;
        check_fraction("spouse_offset.offset_rate", spouse.offset_rate)?;
        if spouse.offset_rate.is_zero() {
            return Err(EngineError::invalid_rule_set(
                "spouse_offset.offset_rate must be greater than zero",
            ));
        }
        check_non_negative("spouse_offset.income_low", spouse.income_low)?;
        if spouse.income_low >= spouse.income_high {
            return Err(EngineError::invalid_rule_set(format!(
                "spouse_offset.income_low ({}) must be below income_high ({})",
                spouse.income_low, spouse.income_high
            )));
        }

        let returns = &document.investment_returns;
        for (name, rate) in [
            ("conservative", returns.conservative),
            ("balanced", returns.balanced),
            ("growth", returns.growth),
        ] {
            if rate <= -Decimal::ONE {
                return Err(EngineError::invalid_rule_set(format!(
                    "investment_returns.{} must be greater than -1, got {}",
                    name, rate
                )));
            }
        }

        Ok(Self {
            metadata: document.metadata,
            brackets: document.brackets,
            levy: document.levy,
            superannuation: document.superannuation,
            spouse_offset: document.spouse_offset,
            investment_returns: document.investment_returns,
        })
    }

    /// Returns the tax year metadata.
    pub fn metadata(&self) -> &RuleSetMetadata {
        &self.metadata
    }

    /// Returns the income tax brackets in ascending order.
    pub fn brackets(&self) -> &[TaxBracket] {
        &self.brackets
    }

    /// Returns the secondary levy rate.
    pub fn levy_rate(&self) -> Decimal {
        self.levy.rate
    }

    /// Returns the income at or below which no levy is payable.
    pub fn levy_threshold(&self) -> Decimal {
        self.levy.threshold
    }

    /// Returns the employer guarantee rate.
    pub fn guarantee_rate(&self) -> Decimal {
        self.superannuation.guarantee_rate
    }

    /// Returns the annual concessional contributions cap.
    pub fn concessional_cap(&self) -> Decimal {
        self.superannuation.concessional_cap
    }

    /// Returns the flat tax rate on concessional contributions.
    pub fn contributions_tax_rate(&self) -> Decimal {
        self.superannuation.contributions_tax_rate
    }

    /// Returns the income at which the high-income surcharge applies.
    pub fn high_income_threshold(&self) -> Decimal {
        self.superannuation.high_income_threshold
    }

    /// Returns the additional contributions tax rate for high-income earners.
    pub fn high_income_additional_rate(&self) -> Decimal {
        self.superannuation.high_income_additional_rate
    }

    /// Returns the spouse offset rules.
    pub fn spouse_offset(&self) -> &SpouseOffsetRules {
        &self.spouse_offset
    }

    /// Returns the indicative investment returns.
    pub fn investment_returns(&self) -> &InvestmentReturns {
        &self.investment_returns
    }

    /// Returns the indicative annual return for an investment option.
    pub fn investment_return(&self, strategy: InvestmentStrategy) -> Decimal {
        match strategy {
            InvestmentStrategy::Conservative => self.investment_returns.conservative,
            InvestmentStrategy::Balanced => self.investment_returns.balanced,
            InvestmentStrategy::Growth => self.investment_returns.growth,
        }
    }
}

fn validate_metadata(metadata: &RuleSetMetadata) -> EngineResult<()> {
    if metadata.tax_year_start >= metadata.tax_year_end {
        return Err(EngineError::invalid_rule_set(format!(
            "tax year start {} must be before end {}",
            metadata.tax_year_start, metadata.tax_year_end
        )));
    }
    Ok(())
}

fn validate_brackets(brackets: &[TaxBracket]) -> EngineResult<()> {
    let first = brackets
        .first()
        .ok_or_else(|| EngineError::invalid_rule_set("at least one tax bracket is required"))?;

    if !first.min.is_zero() {
        return Err(EngineError::invalid_rule_set(format!(
            "first bracket must start at 0, got {}",
            first.min
        )));
    }

    let last_index = brackets.len() - 1;
    let mut previous: Option<&TaxBracket> = None;

    for (index, bracket) in brackets.iter().enumerate() {
        check_fraction("brackets.rate", bracket.rate)?;

        match bracket.max {
            Some(max) if index == last_index => {
                return Err(EngineError::invalid_rule_set(format!(
                    "last bracket must be unbounded, got max {}",
                    max
                )));
            }
            None if index != last_index => {
                return Err(EngineError::invalid_rule_set(format!(
                    "only the last bracket may be unbounded (bracket starting at {})",
                    bracket.min
                )));
            }
            Some(max) if max < bracket.min => {
                return Err(EngineError::invalid_rule_set(format!(
                    "bracket max {} is below its min {}",
                    max, bracket.min
                )));
            }
            _ => {}
        }

        if let Some(prev) = previous {
            // Checked above: every bracket but the last has a max.
            let prev_max = prev.max.unwrap_or(prev.min);
            let expected_min = prev_max + Decimal::ONE;
            if bracket.min < expected_min {
                return Err(EngineError::invalid_rule_set(format!(
                    "bracket starting at {} overlaps bracket ending at {}",
                    bracket.min, prev_max
                )));
            }
            if bracket.min > expected_min {
                return Err(EngineError::invalid_rule_set(format!(
                    "gap between bracket ending at {} and bracket starting at {}",
                    prev_max, bracket.min
                )));
            }
            if bracket.rate < prev.rate {
                return Err(EngineError::invalid_rule_set(format!(
                    "bracket rates must be non-decreasing: {} follows {}",
                    bracket.rate, prev.rate
                )));
            }
        }

        previous = Some(bracket);
    }

    Ok(())
}

fn check_fraction(name: &str, value: Decimal) -> EngineResult<()> {
    if value < Decimal::ZERO || value > Decimal::ONE {
        return Err(EngineError::invalid_rule_set(format!(
            "{} must be between 0 and 1, got {}",
            name, value
        )));
    }
    Ok(())
}

fn check_non_negative(name: &str, value: Decimal) -> EngineResult<()> {
    if value < Decimal::ZERO {
        return Err(EngineError::invalid_rule_set(format!(
            "{} must not be negative, got {}",
            name, value
        )));
    }
    Ok(())
}
