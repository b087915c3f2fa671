pub mod brackets;
pub mod coerce;
pub mod common;
pub mod error;
pub mod rule_set;
pub mod types;

#[cfg(feature = "detailed")]
pub mod detailed;

#[cfg(feature = "simplified")]
pub mod simplified;

pub use error::HoldingError;
pub use rule_set::{RuleSet, RuleSetKind};
pub use types::*;

/// Standard result type for boundary operations (parsing, deserialization).
pub type HoldingResult<T> = Result<T, HoldingError>;
