//! Strategy engine for Australian personal-finance decisions
//!
//! This crate computes the effect of salary-sacrificing into superannuation,
//! parking savings in a mortgage offset account, and contributing to a
//! lower-earning spouse's superannuation, all under a single tax-year
//! [`config::RuleSet`].

#![warn(missing_docs)]

pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
