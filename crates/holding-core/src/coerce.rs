//! Lenient numeric deserialization for calculator inputs.
//!
//! Inputs arrive from forms and spreadsheets where a field may be missing,
//! `null`, an empty string, or a number written as text. Every numeric
//! field coerces to a `Decimal`, and anything that is not a number becomes
//! zero. Combine with `#[serde(default)]` on the field so absence is also zero.

use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Coerces a JSON value to a `Decimal`, defaulting to zero.
pub fn to_decimal(value: &Value) -> Decimal {
    match value {
        Value::Number(n) => Decimal::from_str(&n.to_string())
            .or_else(|_| Decimal::from_scientific(&n.to_string()))
            .unwrap_or(Decimal::ZERO),
        Value::String(s) => parse_decimal_str(s),
        _ => Decimal::ZERO,
    }
}

fn parse_decimal_str(s: &str) -> Decimal {
    let trimmed = s.trim();
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .unwrap_or(Decimal::ZERO)
}

/// `deserialize_with` target for `Decimal` fields.
pub fn lenient_decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(to_decimal(&value))
}

/// `deserialize_with` target for count fields. Fractions are truncated,
/// negatives and non-numbers become zero.
pub fn lenient_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let count = to_decimal(&value).trunc().max(Decimal::ZERO);
    Ok(count.to_u32().unwrap_or(u32::MAX))
}
