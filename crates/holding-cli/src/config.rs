use serde::{Deserialize, Serialize};
use tracing::debug;

use holding_core::detailed::DetailedParameters;
use holding_core::RuleSetKind;

use crate::input;

/// Deployment configuration: which rule set runs and its parameters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HoldingConfig {
    pub rule_set: RuleSetKind,
    pub detailed: DetailedParameters,
}

/// Load configuration from `path`, or defaults when no path is given.
pub fn load(path: Option<&str>) -> Result<HoldingConfig, Box<dyn std::error::Error>> {
    let Some(path) = path else {
        return Ok(HoldingConfig::default());
    };
    let contents = input::file::read_text(path)?;
    let cfg = parse(&contents).map_err(|e| format!("Invalid config '{}': {}", path, e))?;
    debug!(path, rule_set = %cfg.rule_set, "configuration loaded");
    Ok(cfg)
}

/// YAML is a superset of JSON, so both formats parse here.
pub fn parse(contents: &str) -> Result<HoldingConfig, serde_yaml::Error> {
    if contents.trim().is_empty() {
        return Ok(HoldingConfig::default());
    }
    serde_yaml::from_str(contents)
}
