use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::common::round_half_up;

/// All monetary values (BRL). Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.075 = 7.5%). Used inside formulas.
pub type Rate = Decimal;

/// Rates expressed as percentages (7.5 = 7.5%). Used at the input/output boundary.
pub type Percent = Decimal;

/// Month counts, possibly fractional.
pub type Months = Decimal;

/// Months needed for accumulated savings to cover the one-time conversion cost.
///
/// There is no floating-point infinity here: a scenario whose savings never
/// turn positive is `Unreachable`, and callers must branch on it before doing
/// any arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Payback {
    Months { months: Months },
    Unreachable,
}

impl Payback {
    /// `cost / savings` when savings are positive, `Unreachable` otherwise.
    /// A quotient beyond `Decimal` range is also `Unreachable`.
    pub fn from_cost_and_savings(cost: Money, monthly_savings: Money) -> Self {
        if monthly_savings <= Decimal::ZERO {
            return Payback::Unreachable;
        }
        match cost.checked_div(monthly_savings) {
            Some(months) => Payback::Months { months },
            None => Payback::Unreachable,
        }
    }

    pub fn months(&self) -> Option<Months> {
        match self {
            Payback::Months { months } => Some(*months),
            Payback::Unreachable => None,
        }
    }

    pub fn is_reachable(&self) -> bool {
        matches!(self, Payback::Months { .. })
    }

    /// Same payback rounded to two decimals for presentation.
    pub fn rounded(&self) -> Self {
        match self {
            Payback::Months { months } => Payback::Months {
                months: round_half_up(*months),
            },
            Payback::Unreachable => Payback::Unreachable,
        }
    }
}

impl std::fmt::Display for Payback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Months { months } => write!(f, "{} months", round_half_up(*months)),
            Self::Unreachable => write!(f, "never"),
        }
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub rule_set: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    rule_set: &str,
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            rule_set: rule_set.to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}
