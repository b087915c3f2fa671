use clap::Args;
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use tracing::debug;

use holding_core::detailed::DetailedRuleSet;
use holding_core::simplified::{self, SimplifiedRateInput, SimplifiedRuleSet};
use holding_core::RuleSet;

use crate::input;

/// Scenario flags shared by `rates` and `viability`.
/// Each rule set reads the fields it knows and ignores the rest.
#[derive(Args, Debug, Default)]
#[command(allow_hyphen_values = true)]
pub struct ScenarioArgs {
    /// Path to JSON scenario file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Gross monthly rental revenue
    #[arg(long)]
    pub revenue: Option<Decimal>,

    /// Total property value
    #[arg(long)]
    pub property_value: Option<Decimal>,

    /// Number of properties held (detailed rule set)
    #[arg(long)]
    pub properties: Option<u32>,

    /// Vacancy/condo discount on revenue, in percent
    #[arg(long)]
    pub discount: Option<Decimal>,

    /// Individual tax rate in percent (simplified rule set)
    #[arg(long)]
    pub individual_rate: Option<Decimal>,

    /// Consumption tax rate in percent (simplified rule set)
    #[arg(long)]
    pub consumption_rate: Option<Decimal>,

    /// Corporate total tax rate in percent (simplified rule set)
    #[arg(long)]
    pub corporate_rate: Option<Decimal>,

    /// Monthly accounting and professional fees (simplified rule set)
    #[arg(long)]
    pub professional_fees: Option<Decimal>,

    /// Other monthly corporate expenses (simplified rule set)
    #[arg(long)]
    pub other_expenses: Option<Decimal>,

    /// Annual maintenance cost of the holding (simplified rule set)
    #[arg(long)]
    pub annual_maintenance: Option<Decimal>,

    /// One-time implementation cost (simplified rule set)
    #[arg(long)]
    pub implementation_cost: Option<Decimal>,
}

impl ScenarioArgs {
    /// Scenario object built from flags; absent flags are left out so the
    /// core input defaults apply.
    pub fn to_scenario(&self) -> Result<Value, Box<dyn std::error::Error>> {
        let revenue = self
            .revenue
            .ok_or("--revenue is required (or provide --input)")?;

        let mut map = Map::new();
        map.insert("monthly_revenue".into(), Value::String(revenue.to_string()));

        let decimals = [
            ("property_value", self.property_value),
            ("discount_pct", self.discount),
            ("individual_rate_pct", self.individual_rate),
            ("consumption_rate_pct", self.consumption_rate),
            ("corporate_rate_pct", self.corporate_rate),
            ("monthly_professional_fees", self.professional_fees),
            ("other_monthly_expenses", self.other_expenses),
            ("annual_maintenance", self.annual_maintenance),
            ("implementation_cost", self.implementation_cost),
        ];
        for (key, value) in decimals {
            if let Some(v) = value {
                map.insert(key.into(), Value::String(v.to_string()));
            }
        }
        if let Some(count) = self.properties {
            map.insert("property_count".into(), Value::from(count));
        }

        Ok(Value::Object(map))
    }
}

/// Per-rule-set preparation of a raw scenario before it is typed.
pub trait PrepareScenario: RuleSet {
    fn prepare(&self, _scenario: &mut Value) -> Result<(), Box<dyn std::error::Error>> {
        Ok(())
    }
}

impl PrepareScenario for DetailedRuleSet {}

const SIMPLIFIED_RATE_KEYS: [(&str, &str); 3] = [
    ("individual_rate_pct", "individual_tax_pct"),
    ("consumption_rate_pct", "consumption_tax_pct"),
    ("corporate_rate_pct", "corporate_total_pct"),
];

impl PrepareScenario for SimplifiedRuleSet {
    /// Rates the caller left out are filled from the simplified rate deriver.
    fn prepare(&self, scenario: &mut Value) -> Result<(), Box<dyn std::error::Error>> {
        let Value::Object(map) = scenario else {
            return Err("scenario must be a JSON object".into());
        };
        if SIMPLIFIED_RATE_KEYS
            .iter()
            .all(|(key, _)| map.contains_key(*key))
        {
            return Ok(());
        }

        let rate_input: SimplifiedRateInput = serde_json::from_value(Value::Object(map.clone()))?;
        let rates = serde_json::to_value(simplified::derive_rates(&rate_input).result)?;
        for (key, rate_key) in SIMPLIFIED_RATE_KEYS {
            if !map.contains_key(key) {
                if let Some(rate) = rates.get(rate_key) {
                    debug!(field = key, %rate, "rate derived from bracket tables");
                    map.insert(key.into(), rate.clone());
                }
            }
        }
        Ok(())
    }
}

/// Scenario source precedence: --input file, then stdin, then flags.
fn read_scenario(args: &ScenarioArgs) -> Result<Value, Box<dyn std::error::Error>> {
    if let Some(ref path) = args.input {
        return input::file::read_json(path);
    }
    if let Some(data) = input::stdin::read_stdin()? {
        return Ok(data);
    }
    args.to_scenario()
}

pub fn run_rates<R: PrepareScenario>(
    rule_set: &R,
    args: ScenarioArgs,
) -> Result<Value, Box<dyn std::error::Error>> {
    let scenario = read_scenario(&args)?;
    evaluate_rates(rule_set, scenario)
}

pub fn run_viability<R: PrepareScenario>(
    rule_set: &R,
    args: ScenarioArgs,
) -> Result<Value, Box<dyn std::error::Error>> {
    let scenario = read_scenario(&args)?;
    evaluate_viability(rule_set, scenario)
}

pub fn evaluate_rates<R: PrepareScenario>(
    rule_set: &R,
    scenario: Value,
) -> Result<Value, Box<dyn std::error::Error>> {
    let rate_input: R::RateInput = serde_json::from_value(scenario)
        .map_err(|e| format!("Invalid scenario for {} rates: {}", rule_set.kind(), e))?;
    let result = rule_set.derive_rates(&rate_input);
    Ok(serde_json::to_value(result)?)
}

pub fn evaluate_viability<R: PrepareScenario>(
    rule_set: &R,
    mut scenario: Value,
) -> Result<Value, Box<dyn std::error::Error>> {
    rule_set.prepare(&mut scenario)?;
    let viability_input: R::ViabilityInput = serde_json::from_value(scenario)
        .map_err(|e| format!("Invalid scenario for {} viability: {}", rule_set.kind(), e))?;
    let result = rule_set.compute_viability(&viability_input);
    Ok(serde_json::to_value(result)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn num(value: &Value) -> Decimal {
        value.as_str().unwrap().parse().unwrap()
    }

    #[test]
    fn test_flags_require_revenue() {
        let args = ScenarioArgs::default();
        let err = args.to_scenario().unwrap_err();
        assert!(err.to_string().contains("--revenue"));
    }

    #[test]
    fn test_flags_only_include_given_fields() {
        let args = ScenarioArgs {
            revenue: Some(dec!(50_000)),
            properties: Some(5),
            ..Default::default()
        };
        let scenario = args.to_scenario().unwrap();
        assert_eq!(
            scenario,
            json!({ "monthly_revenue": "50000", "property_count": 5 })
        );
    }

    #[test]
    fn test_detailed_rates_from_scenario() {
        let out = evaluate_rates(
            &DetailedRuleSet::default(),
            json!({ "monthly_revenue": "10000", "property_count": 1 }),
        )
        .unwrap();
        assert_eq!(out["metadata"]["rule_set"], json!("detailed"));
        assert_eq!(num(&out["result"]["individual_tax_pct"]), dec!(16.74));
        assert_eq!(num(&out["result"]["corporate_total_pct"]), dec!(7.68));
    }

    #[test]
    fn test_detailed_viability_from_scenario() {
        let out = evaluate_viability(
            &DetailedRuleSet::default(),
            json!({
                "monthly_revenue": 10000,
                "property_value": 500000,
                "property_count": 1,
            }),
        )
        .unwrap();
        assert_eq!(num(&out["result"]["monthly_savings"]), dec!(906.29));
        assert_eq!(out["result"]["score"], json!(55));
        assert_eq!(out["result"]["recommendation"], json!("low"));
    }

    #[test]
    fn test_simplified_viability_derives_missing_rates() {
        let mut scenario = json!({
            "monthly_revenue": "20000",
            "property_value": "500000",
            "monthly_professional_fees": "800",
            "implementation_cost": "30000",
        });
        SimplifiedRuleSet.prepare(&mut scenario).unwrap();
        assert_eq!(num(&scenario["individual_rate_pct"]), dec!(27.5));
        assert_eq!(num(&scenario["consumption_rate_pct"]), dec!(1));
        assert_eq!(num(&scenario["corporate_rate_pct"]), dec!(11.33));

        let out = evaluate_viability(&SimplifiedRuleSet, scenario).unwrap();
        assert_eq!(num(&out["result"]["monthly_savings"]), dec!(2234));
        assert_eq!(out["result"]["score"], json!(70));
        assert_eq!(out["result"]["recommendation"], json!("favorable"));
    }

    #[test]
    fn test_simplified_keeps_supplied_rates() {
        let mut scenario = json!({
            "monthly_revenue": "20000",
            "individual_rate_pct": "10",
        });
        SimplifiedRuleSet.prepare(&mut scenario).unwrap();
        assert_eq!(scenario["individual_rate_pct"], json!("10"));
        assert_eq!(num(&scenario["corporate_rate_pct"]), dec!(11.33));
    }

    #[test]
    fn test_oversized_revenue_is_capped_not_fatal() {
        let scenario = json!({
            "monthly_revenue": "10000000000000000000000000000",
            "property_value": "500000",
        });
        let out = evaluate_viability(&DetailedRuleSet::default(), scenario.clone()).unwrap();
        assert_eq!(
            num(&out["result"]["effective_revenue"]),
            holding_core::common::MAX_AMOUNT
        );
        let out = evaluate_viability(&SimplifiedRuleSet, scenario).unwrap();
        assert!(out["warnings"]
            .as_array()
            .unwrap()
            .iter()
            .any(|w| w.as_str().unwrap().contains("monthly_revenue")));
    }

    #[test]
    fn test_non_object_scenario_rejected() {
        let mut scenario = json!([1, 2, 3]);
        assert!(SimplifiedRuleSet.prepare(&mut scenario).is_err());
        assert!(evaluate_rates(&DetailedRuleSet::default(), json!("abc")).is_err());
    }

    #[test]
    fn test_scenario_file_input() {
        let path = std::env::temp_dir().join("holding_cli_scenario_test.json");
        std::fs::write(&path, r#"{"monthly_revenue": "2000", "property_count": 1}"#).unwrap();
        let args = ScenarioArgs {
            input: Some(path.to_string_lossy().into_owned()),
            ..Default::default()
        };
        let out = run_viability(&DetailedRuleSet::default(), args).unwrap();
        assert_eq!(out["result"]["payback"]["status"], json!("unreachable"));
        assert_eq!(out["result"]["score"], json!(10));
        let _ = std::fs::remove_file(&path);
    }
}
