//! Cent rounding shared by every calculator.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a monetary amount to cents, half away from zero.
///
/// # Examples
///
/// ```
/// use strategy_engine::calculation::round_to_cents;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(round_to_cents(Decimal::from_str("10.005").unwrap()), Decimal::from_str("10.01").unwrap());
/// assert_eq!(round_to_cents(Decimal::from_str("10.004").unwrap()), Decimal::from_str("10.00").unwrap());
/// ```
pub fn round_to_cents(value: Decimal) -> Decimal {
    round_half_up(value, 2)
}

/// Rounds to `dp` decimal places, half away from zero.
///
/// Used for non-monetary figures such as years and percentages.
pub fn round_half_up(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}
