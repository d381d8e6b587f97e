//! Multi-year projection models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Balance at the end of one projected year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectionPoint {
    /// Years elapsed; 0 is the opening balance.
    pub year: u32,
    /// Balance at the end of the year, rounded to cents.
    pub balance: Decimal,
    /// Contributions added so far, excluding the opening balance.
    pub total_contributions: Decimal,
    /// Growth earned so far (`balance - opening - contributions`).
    pub total_growth: Decimal,
}
