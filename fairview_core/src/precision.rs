//! Explicit decimal rounding.
//!
//! Outcome values are published with fixed decimal precision. Float display
//! truncation drifts across platforms, so both routines here work on exact
//! decimal or integer representations.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Converts an f64 to a Decimal through its shortest round-trip decimal form.
///
/// `0.1` becomes exactly `0.1`, not `0.1000000000000000055511...`.
pub fn to_decimal(value: f64) -> Option<Decimal> {
    if !value.is_finite() {
        return None;
    }
    Decimal::from_str(&value.to_string())
        .ok()
        .or_else(|| Decimal::from_f64(value))
}

/// Rounds toward zero to `dp` decimal places.
///
/// Non-finite values are returned unchanged.
pub fn round_down(value: f64, dp: u32) -> f64 {
    match to_decimal(value) {
        Some(decimal) => from_decimal(decimal.round_dp_with_strategy(dp, RoundingStrategy::ToZero))
            .unwrap_or(value),
        None => value,
    }
}

/// Converts a Decimal back to the nearest f64.
pub fn from_decimal(decimal: Decimal) -> Option<f64> {
    decimal.to_string().parse::<f64>().ok()
}

/// Rounds the binary fraction `numerator / 2^bits` to `digits` significant
/// decimal digits, ties away from zero.
///
/// Works on the exact value, the same way a `toPrecision` rendering does,
/// so ties at the last digit are resolved identically on every platform.
/// `numerator` must be below `2^bits` (a fraction in `[0, 1)`), `bits <= 64`
/// and `digits` in `1..=9`.
pub fn round_significant_fraction(numerator: u64, bits: u32, digits: u32) -> f64 {
    debug_assert!(bits <= 64 && (1..=9).contains(&digits));
    if numerator == 0 {
        return 0.0;
    }

    let denominator: u128 = 1u128 << bits;
    debug_assert!((numerator as u128) < denominator);
    let lower = 10u128.pow(digits - 1) * denominator;

    // Scale until the integer part has exactly `digits` digits
    let mut scaled = numerator as u128;
    let mut exponent: i32 = 0;
    while scaled < lower {
        scaled *= 10;
        exponent += 1;
    }

    let mut quotient = scaled / denominator;
    let remainder = scaled % denominator;
    if remainder * 2 >= denominator {
        quotient += 1;
    }

    format!("{}e-{}", quotient, exponent)
        .parse::<f64>()
        .unwrap_or_else(|_| quotient as f64 / 10f64.powi(exponent))
}
