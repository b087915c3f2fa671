//! Simplified rule set: flat placeholder percentages and caller-supplied
//! fixed costs. No eligibility logic and no internal transfer-tax estimate.

pub mod rates;
pub mod viability;

use crate::rule_set::{RuleSet, RuleSetKind};
use crate::types::ComputationOutput;

pub use rates::{derive_rates, SimplifiedRateInput, SimplifiedRates, CORPORATE_TOTAL_PCT};
pub use viability::{
    compute_viability, SimplifiedRecommendation, SimplifiedViability, SimplifiedViabilityInput,
};

impl SimplifiedViabilityInput {
    /// Fills the three percentage rates from a `derive_rates` result.
    pub fn with_rates(mut self, rates: &SimplifiedRates) -> Self {
        self.individual_rate_pct = rates.individual_tax_pct;
        self.consumption_rate_pct = rates.consumption_tax_pct;
        self.corporate_rate_pct = rates.corporate_total_pct;
        self
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SimplifiedRuleSet;

impl RuleSet for SimplifiedRuleSet {
    type RateInput = SimplifiedRateInput;
    type Rates = SimplifiedRates;
    type ViabilityInput = SimplifiedViabilityInput;
    type Viability = SimplifiedViability;

    fn kind(&self) -> RuleSetKind {
        RuleSetKind::Simplified
    }

    fn derive_rates(&self, input: &SimplifiedRateInput) -> ComputationOutput<SimplifiedRates> {
        rates::derive_rates(input)
    }

    fn compute_viability(
        &self,
        input: &SimplifiedViabilityInput,
    ) -> ComputationOutput<SimplifiedViability> {
        viability::compute_viability(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_with_rates_copies_all_three() {
        let rates = derive_rates(&SimplifiedRateInput {
            monthly_revenue: dec!(10_000),
            property_value: dec!(500_000),
        })
        .result;
        let input = SimplifiedViabilityInput {
            monthly_revenue: dec!(10_000),
            ..Default::default()
        }
        .with_rates(&rates);
        assert_eq!(input.individual_rate_pct, dec!(27.5));
        assert_eq!(input.consumption_rate_pct, dec!(1));
        assert_eq!(input.corporate_rate_pct, dec!(11.33));
    }

    #[test]
    fn test_kind() {
        assert_eq!(SimplifiedRuleSet.kind(), RuleSetKind::Simplified);
    }
}
