//! Income tax result model.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Tax payable on an income: bracket tax plus the secondary levy.
///
/// All amounts are non-negative and rounded to cents.
///
/// # Example
///
/// ```
/// use strategy_engine::models::TaxResult;
/// use rust_decimal::Decimal;
///
/// let result = TaxResult::new(Decimal::new(1478800, 2), Decimal::new(160000, 2));
/// assert_eq!(result.total_tax, Decimal::new(1638800, 2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxResult {
    /// Progressive income tax from the bracket table.
    pub income_tax: Decimal,
    /// Secondary income-based levy.
    pub levy: Decimal,
    /// `income_tax + levy`.
    pub total_tax: Decimal,
}

impl TaxResult {
    /// Combines income tax and levy into a result.
    pub fn new(income_tax: Decimal, levy: Decimal) -> Self {
        Self {
            income_tax,
            levy,
            total_tax: income_tax + levy,
        }
    }
}
