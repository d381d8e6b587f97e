//! Rule set loading and management for the strategy engine.
//!
//! This module provides the tax-year [`RuleSet`] consumed by every
//! calculator, and functionality to load it from a YAML file.
//!
//! # Example
//!
//! ```no_run
//! use strategy_engine::config::RuleSetLoader;
//!
//! let rules = RuleSetLoader::load("./config/au_2024_25.yaml").unwrap();
//! println!("Loaded rule set: {}", rules.metadata().name);
//! ```

mod loader;
mod types;

pub use loader::RuleSetLoader;
pub use types::{
    InvestmentReturns, InvestmentStrategy, LevyRule, RuleSet, RuleSetDocument, RuleSetMetadata,
    SpouseOffsetRules, SuperRules, TaxBracket,
};

/// The FY 2024/25 rule set bundled with the crate, for unit tests.
#[cfg(test)]
pub(crate) fn reference_rule_set() -> RuleSet {
    RuleSetLoader::from_yaml_str(
        include_str!("../../config/au_2024_25.yaml"),
        "au_2024_25.yaml",
    )
    .expect("bundled rule set is valid")
}
