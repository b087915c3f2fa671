use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::normalize_property_count;
use super::taxes::{corporate_taxes, individual_taxes, social_reduction, SocialReduction};
use crate::coerce::{lenient_count, lenient_decimal};
use crate::common::{clamp_input, effective_pct};
use crate::types::*;

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailedRateInput {
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub monthly_revenue: Money,
    /// Accepted for interface parity; the detailed rates do not depend on it.
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub property_value: Money,
    #[serde(
        default = "super::default_property_count",
        deserialize_with = "lenient_count"
    )]
    pub property_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailedRates {
    /// IRPF as a share of gross monthly revenue.
    pub individual_tax_pct: Percent,
    /// IBS/CBS (individual side) as a share of revenue.
    pub consumption_tax_pct: Percent,
    /// IRPJ + CSLL + corporate IBS/CBS as a share of revenue.
    pub corporate_total_pct: Percent,
    pub social_reduction: SocialReduction,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Derive effective PF and PJ rates for a monthly revenue figure.
pub fn derive_rates(input: &DetailedRateInput) -> ComputationOutput<DetailedRates> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let revenue = clamp_input("monthly_revenue", input.monthly_revenue, &mut warnings);
    clamp_input("property_value", input.property_value, &mut warnings);
    let property_count = normalize_property_count(input.property_count, &mut warnings);

    let reduction = social_reduction(revenue, property_count);
    let individual = individual_taxes(revenue, &reduction);
    let corporate = corporate_taxes(revenue, &reduction);

    if revenue == Decimal::ZERO {
        warnings.push("Monthly revenue is zero; all effective rates are zero.".to_string());
    }

    let output = DetailedRates {
        individual_tax_pct: effective_pct(individual.income_tax, revenue),
        consumption_tax_pct: effective_pct(individual.consumption_tax, revenue),
        corporate_total_pct: effective_pct(corporate.total(), revenue),
        social_reduction: reduction,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "individual_deduction": "min(20% of revenue, 607.20)",
        "irpf_table": "monthly 2024, 5 tiers",
        "social_reduction": "(properties > 3 and annual > 240k) or annual > 280k; 600 per property",
        "consumption_tax_rate": "8.4% of revenue net of social reduction",
        "presumed_profit": "32% of revenue; IRPJ 15% + 10% above 20k; CSLL 2.88% of revenue",
        "corporate_consumption_credit": "425.04 per month",
    });

    with_metadata(
        "detailed",
        "Effective PF vs PJ rates (progressive IRPF, presumed profit)",
        &assumptions,
        warnings,
        elapsed,
        output,
    )
}
