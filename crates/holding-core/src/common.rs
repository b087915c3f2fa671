//! Numeric helpers shared by both rule sets.
//!
//! Computation stays at full decimal precision; `round_half_up` is applied
//! only when a value leaves the calculator.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use crate::types::{Money, Percent, Rate};

const ONE_HUNDRED: Decimal = dec!(100);

/// Rounds to two decimal places, midpoints away from zero.
///
/// ```
/// use rust_decimal_macros::dec;
/// use holding_core::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(1674.285)), dec!(1674.29));
/// assert_eq!(round_half_up(dec!(29.83875)), dec!(29.84));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Clamps a monetary amount at zero.
pub fn non_negative(value: Money) -> Money {
    value.max(Decimal::ZERO)
}

/// `amount` as a percentage of `revenue`, rounded to two decimals.
/// Zero when revenue is not positive.
pub fn effective_pct(amount: Money, revenue: Money) -> Percent {
    if revenue <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    round_half_up(amount / revenue * ONE_HUNDRED)
}

/// Largest accepted monetary input (one quadrillion). Keeps every product
/// and quotient in the calculators inside `Decimal` range.
pub const MAX_AMOUNT: Money = dec!(1_000_000_000_000_000);

/// Largest accepted percentage magnitude.
pub const MAX_PCT: Percent = dec!(1_000_000);

/// Clamps `value` into `min..=max`, recording a warning when it moved.
pub fn clamp_range(
    field: &str,
    value: Decimal,
    min: Decimal,
    max: Decimal,
    warnings: &mut Vec<String>,
) -> Decimal {
    if value < min {
        warnings.push(format!("{field} of {value} is below {min}; clamped to {min}."));
        min
    } else if value > max {
        warnings.push(format!("{field} of {value} exceeds {max}; clamped to {max}."));
        max
    } else {
        value
    }
}

/// Floors a caller-supplied amount at zero and caps it at `MAX_AMOUNT`,
/// recording a warning when it was adjusted.
pub fn clamp_input(field: &str, value: Decimal, warnings: &mut Vec<String>) -> Decimal {
    if value < Decimal::ZERO {
        warnings.push(format!("{field} was negative ({value}); treated as zero."));
        return Decimal::ZERO;
    }
    clamp_range(field, value, Decimal::ZERO, MAX_AMOUNT, warnings)
}

/// Caps a caller-supplied percentage at `MAX_PCT` in either direction.
pub fn clamp_pct(field: &str, value: Percent, warnings: &mut Vec<String>) -> Percent {
    clamp_range(field, value, -MAX_PCT, MAX_PCT, warnings)
}

/// 7.5 (%) -> 0.075
pub fn pct_to_rate(pct: Percent) -> Rate {
    pct / ONE_HUNDRED
}
