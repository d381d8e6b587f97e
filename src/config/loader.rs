//! Rule set loading functionality.
//!
//! This module provides the [`RuleSetLoader`] type for loading a tax-year
//! rule set from a YAML file.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::{EngineError, EngineResult};

use super::types::{RuleSet, RuleSetDocument};

/// Loads and validates rule sets from YAML.
///
/// # File Structure
///
/// ```text
/// config/
/// └── au_2024_25.yaml   # metadata, brackets, levy, superannuation,
///                       # spouse_offset, investment_returns
/// ```
///
/// # Example
///
/// ```no_run
/// use strategy_engine::config::RuleSetLoader;
///
/// let rules = RuleSetLoader::load("./config/au_2024_25.yaml")?;
/// println!("Loaded rule set: {}", rules.metadata().name);
/// # Ok::<(), strategy_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleSetLoader;

impl RuleSetLoader {
    /// Loads a rule set from the specified YAML file.
    ///
    /// # Returns
    ///
    /// Returns a validated [`RuleSet`] on success, or an error if:
    /// - The file is missing (`ConfigNotFound`)
    /// - The file contains invalid YAML or misses a field (`ConfigParseError`)
    /// - The values violate a rule set invariant (`InvalidRuleSet`)
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<RuleSet> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        Self::from_yaml_str(&content, &path_str)
    }

    /// Parses and validates a rule set from YAML text.
    ///
    /// `origin` labels the document in error messages (usually the file path).
    pub fn from_yaml_str(content: &str, origin: &str) -> EngineResult<RuleSet> {
        let document: RuleSetDocument =
            serde_yaml::from_str(content).map_err(|e| EngineError::ConfigParseError {
                path: origin.to_string(),
                message: e.to_string(),
            })?;

        let rules = RuleSet::new(document)?;

        info!(
            origin = %origin,
            code = %rules.metadata().code,
            brackets = rules.brackets().len(),
            "Loaded rule set"
        );

        Ok(rules)
    }
}
