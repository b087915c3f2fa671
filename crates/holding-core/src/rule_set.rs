use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::types::ComputationOutput;
use crate::HoldingError;

/// A versioned set of PF vs PJ calculation rules.
///
/// Each implementation owns its bracket tables and input shapes; the two
/// operations are pure and never fail. Which implementation runs is a
/// deployment decision (see `RuleSetKind`).
pub trait RuleSet: Send + Sync {
    type RateInput: Serialize + DeserializeOwned;
    type Rates: Serialize;
    type ViabilityInput: Serialize + DeserializeOwned;
    type Viability: Serialize;

    fn kind(&self) -> RuleSetKind;

    /// Effective percentage rates for display or as estimation inputs.
    fn derive_rates(&self, input: &Self::RateInput) -> ComputationOutput<Self::Rates>;

    /// Net income under both regimes, savings, payback, score and recommendation.
    fn compute_viability(
        &self,
        input: &Self::ViabilityInput,
    ) -> ComputationOutput<Self::Viability>;
}

/// Names of the available rule sets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleSetKind {
    #[default]
    Detailed,
    Simplified,
}

impl RuleSetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Detailed => "detailed",
            Self::Simplified => "simplified",
        }
    }
}

impl std::fmt::Display for RuleSetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuleSetKind {
    type Err = HoldingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "detailed" => Ok(Self::Detailed),
            "simplified" => Ok(Self::Simplified),
            other => Err(HoldingError::InvalidInput {
                field: "rule_set".into(),
                reason: format!("unknown rule set '{other}', expected 'detailed' or 'simplified'"),
            }),
        }
    }
}
