//! Core data models for the strategy engine.
//!
//! This module contains the scenario inputs, result records and audit
//! types used throughout the engine. Results are plain values created
//! fresh by each calculation.

mod audit;
mod comparison;
mod offset;
mod projection;
mod spouse;
mod superannuation;
mod tax;

pub use audit::{AuditStep, AuditTrace, AuditWarning, WarningSeverity};
pub use comparison::{Strategy, StrategyComparison, StrategySummary};
pub use offset::{MAX_TERM_YEARS, OffsetResult, OffsetScenario, OffsetSimulation, ScheduleYear};
pub use projection::ProjectionPoint;
pub use spouse::{SpouseResult, SpouseScenario};
pub use superannuation::{SuperResult, SuperScenario};
pub use tax::TaxResult;
