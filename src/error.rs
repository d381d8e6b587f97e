//! Error types for the strategy engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while loading a rule set or
//! evaluating a scenario.

use thiserror::Error;

/// The broad category an [`EngineError`] belongs to.
///
/// Callers use this to decide how to react: validation errors are shown
/// to the user, configuration errors abort startup, and domain errors
/// indicate a defect in the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The rule set could not be loaded or is malformed.
    Config,
    /// A scenario input was negative or otherwise out of range.
    Validation,
    /// An internal invariant did not hold.
    Domain,
}

/// The main error type for the strategy engine.
///
/// All fallible operations in the engine return this error type, making it
/// easy to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use strategy_engine::error::{EngineError, ErrorKind};
///
/// let error = EngineError::InvalidInput {
///     field: "salary_sacrifice".to_string(),
///     message: "must not be negative".to_string(),
/// };
/// assert_eq!(error.to_string(), "Invalid input 'salary_sacrifice': must not be negative");
/// assert_eq!(error.kind(), ErrorKind::Validation);
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Rule set file was not found at the specified path.
    #[error("Rule set file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Rule set file could not be parsed.
    #[error("Failed to parse rule set '{path}': {message}")]
    ConfigParseError {
        /// The path (or origin label) of the document that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// Rule set parsed but violates a structural rule (gaps, overlaps, bad rates).
    #[error("Invalid rule set: {message}")]
    InvalidRuleSet {
        /// A description of the violated rule.
        message: String,
    },

    /// A scenario input was rejected before any computation happened.
    #[error("Invalid input '{field}': {message}")]
    InvalidInput {
        /// The scenario field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// An internal invariant was violated.
    #[error("Invariant violation: {message}")]
    InvariantViolation {
        /// A description of the violated invariant.
        message: String,
    },
}

impl EngineError {
    /// Returns the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::ConfigNotFound { .. }
            | EngineError::ConfigParseError { .. }
            | EngineError::InvalidRuleSet { .. } => ErrorKind::Config,
            EngineError::InvalidInput { .. } => ErrorKind::Validation,
            EngineError::InvariantViolation { .. } => ErrorKind::Domain,
        }
    }

    pub(crate) fn invalid_input(field: &str, message: impl Into<String>) -> Self {
        EngineError::InvalidInput {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn invalid_rule_set(message: impl Into<String>) -> Self {
        EngineError::InvalidRuleSet {
            message: message.into(),
        }
    }

    pub(crate) fn overflow(operation: &str) -> Self {
        EngineError::InvariantViolation {
            message: format!("decimal overflow while computing {}", operation),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
