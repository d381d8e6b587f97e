//! Calculation logic for the strategy engine.
//!
//! This module contains the progressive income tax and levy engine, the
//! superannuation contribution, mortgage offset and spouse contribution
//! calculators, multi-year projections, and the side-by-side strategy
//! comparison. Every calculator is a pure function of its scenario and the
//! immutable [`RuleSet`](crate::config::RuleSet).

mod comparison;
mod income_tax;
mod mortgage_offset;
mod projection;
mod rounding;
mod spouse_offset;
mod super_contribution;

pub use income_tax::TaxEngine;
pub use mortgage_offset::{LOAN_FULLY_OFFSET, OffsetCalculator};
pub use projection::{
    compound_growth, growth_series, project_offset_balance, project_super_balance,
    project_with_strategy,
};
pub use rounding::{round_half_up, round_to_cents};
pub use spouse_offset::{SPOUSE_OFFSET_INELIGIBLE, SpouseCalculator};
pub use super_contribution::{CONCESSIONAL_CAP_EXCEEDED, HIGH_INCOME_SURCHARGE, SuperCalculator};
