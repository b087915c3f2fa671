//! Detailed rule set: monthly IRPF brackets with the simplified deduction,
//! the IBS/CBS social reduction, and presumed-profit corporate taxation.
//! Conversion cost is ITBI on the property value plus a fixed fee.

pub mod rates;
pub mod taxes;
pub mod viability;

use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::coerce::lenient_decimal;
use crate::rule_set::{RuleSet, RuleSetKind};
use crate::types::{ComputationOutput, Money, Rate};

pub use rates::{derive_rates, DetailedRateInput, DetailedRates};
pub use taxes::SocialReduction;
pub use viability::{
    compute_viability, compute_viability_with, DetailedRecommendation, DetailedViability,
    DetailedViabilityInput,
};

/// Conversion-cost parameters. Defaults: ITBI 3%, fees 25,000.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetailedParameters {
    #[serde(deserialize_with = "lenient_decimal")]
    pub transfer_tax_rate: Rate,
    #[serde(deserialize_with = "lenient_decimal")]
    pub implementation_fee: Money,
}

impl Default for DetailedParameters {
    fn default() -> Self {
        Self {
            transfer_tax_rate: dec!(0.03),
            implementation_fee: dec!(25_000),
        }
    }
}

fn default_property_count() -> u32 {
    1
}

fn normalize_property_count(count: u32, warnings: &mut Vec<String>) -> u32 {
    if count == 0 {
        warnings.push("property_count must be at least 1; treated as 1.".to_string());
        return 1;
    }
    count
}

#[derive(Debug, Clone, Default)]
pub struct DetailedRuleSet {
    pub params: DetailedParameters,
}

impl DetailedRuleSet {
    pub fn new(params: DetailedParameters) -> Self {
        Self { params }
    }
}

impl RuleSet for DetailedRuleSet {
    type RateInput = DetailedRateInput;
    type Rates = DetailedRates;
    type ViabilityInput = DetailedViabilityInput;
    type Viability = DetailedViability;

    fn kind(&self) -> RuleSetKind {
        RuleSetKind::Detailed
    }

    fn derive_rates(&self, input: &DetailedRateInput) -> ComputationOutput<DetailedRates> {
        rates::derive_rates(input)
    }

    fn compute_viability(
        &self,
        input: &DetailedViabilityInput,
    ) -> ComputationOutput<DetailedViability> {
        viability::compute_viability_with(input, &self.params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_default_parameters() {
        let p = DetailedParameters::default();
        assert_eq!(p.transfer_tax_rate, dec!(0.03));
        assert_eq!(p.implementation_fee, dec!(25_000));
    }

    #[test]
    fn test_parameters_partial_json_keeps_defaults() {
        let p: DetailedParameters =
            serde_json::from_value(serde_json::json!({ "implementation_fee": "30000" })).unwrap();
        assert_eq!(p.implementation_fee, dec!(30_000));
        assert_eq!(p.transfer_tax_rate, dec!(0.03));
    }

    #[test]
    fn test_zero_property_count_raised() {
        let mut w = Vec::new();
        assert_eq!(normalize_property_count(0, &mut w), 1);
        assert_eq!(normalize_property_count(5, &mut w), 5);
        assert_eq!(w.len(), 1);
    }

    #[test]
    fn test_rule_set_uses_its_parameters() {
        let rs = DetailedRuleSet::new(DetailedParameters {
            transfer_tax_rate: Decimal::ZERO,
            implementation_fee: dec!(1_000),
        });
        let input = DetailedViabilityInput {
            monthly_revenue: dec!(10_000),
            property_value: dec!(500_000),
            property_count: 1,
            discount_pct: Decimal::ZERO,
        };
        let out = rs.compute_viability(&input);
        assert_eq!(out.result.implementation_cost.total, dec!(1_000));
        assert_eq!(rs.kind(), RuleSetKind::Detailed);
    }
}
