use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use crate::coerce::lenient_decimal;
use crate::common::{clamp_input, clamp_pct, non_negative, pct_to_rate, round_half_up};
use crate::types::*;

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

/// Every field defaults to zero. Rates are percentages supplied by the
/// caller, usually from `simplified::derive_rates`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimplifiedViabilityInput {
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub monthly_revenue: Money,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub discount_pct: Percent,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub individual_rate_pct: Percent,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub consumption_rate_pct: Percent,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub corporate_rate_pct: Percent,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub monthly_professional_fees: Money,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub other_monthly_expenses: Money,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub annual_maintenance: Money,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub implementation_cost: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndividualSummary {
    pub net_monthly: Money,
    pub income_tax: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorporateSummary {
    pub net_monthly: Money,
    pub corporate_tax: Money,
    pub consumption_tax: Money,
    pub professional_fees: Money,
    pub other_expenses: Money,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimplifiedRecommendation {
    Strong,
    Favorable,
    Marginal,
    NotRecommended,
}

impl SimplifiedRecommendation {
    pub fn from_score(score: u32) -> Self {
        match score {
            80.. => Self::Strong,
            60..=79 => Self::Favorable,
            40..=59 => Self::Marginal,
            _ => Self::NotRecommended,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::Strong => "Highly recommended: the holding pays for itself within a year.",
            Self::Favorable => "Recommended: payback within two years.",
            Self::Marginal => "Borderline: payback within three years; review costs before proceeding.",
            Self::NotRecommended => {
                "Not recommended under current figures: savings are too small to cover the costs."
            }
        }
    }
}

impl std::fmt::Display for SimplifiedRecommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimplifiedViability {
    pub base_revenue: Money,
    pub individual: IndividualSummary,
    pub corporate: CorporateSummary,
    pub monthly_savings: Money,
    pub savings_after_maintenance: Money,
    pub implementation_cost: Money,
    pub payback: Payback,
    /// 0, 25, 50, 70 or 90.
    pub score: u32,
    pub recommendation: SimplifiedRecommendation,
    pub message: String,
}

const MONTHS_PER_YEAR: Decimal = dec!(12);

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// PF vs PJ viability from caller-supplied rates and fixed costs.
pub fn compute_viability(input: &SimplifiedViabilityInput) -> ComputationOutput<SimplifiedViability> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let revenue = clamp_input("monthly_revenue", input.monthly_revenue, &mut warnings);
    let fees = clamp_input(
        "monthly_professional_fees",
        input.monthly_professional_fees,
        &mut warnings,
    );
    let other = clamp_input("other_monthly_expenses", input.other_monthly_expenses, &mut warnings);
    let maintenance = clamp_input("annual_maintenance", input.annual_maintenance, &mut warnings);
    let cost = clamp_input("implementation_cost", input.implementation_cost, &mut warnings);

    let discount = clamp_pct("discount_pct", input.discount_pct, &mut warnings);
    let individual_rate = clamp_pct("individual_rate_pct", input.individual_rate_pct, &mut warnings);
    let corporate_rate = clamp_pct("corporate_rate_pct", input.corporate_rate_pct, &mut warnings);
    let consumption_rate =
        clamp_pct("consumption_rate_pct", input.consumption_rate_pct, &mut warnings);

    // The discount range is not validated here; only the resulting base is floored.
    let base = non_negative(revenue * (Decimal::ONE - pct_to_rate(discount)));
    if discount > dec!(100) {
        warnings.push(format!(
            "discount_pct of {}% exceeds 100%; base revenue floored at zero.",
            discount
        ));
    }

    let income_tax = base * pct_to_rate(individual_rate);
    let individual_net = non_negative(base - income_tax);

    let corporate_tax = base * pct_to_rate(corporate_rate);
    let consumption_tax = base * pct_to_rate(consumption_rate);
    let corporate_net = non_negative(base - corporate_tax - consumption_tax - fees - other);

    let savings = non_negative(corporate_net - individual_net);
    let net_savings = non_negative(savings - maintenance / MONTHS_PER_YEAR);
    let payback = Payback::from_cost_and_savings(cost, net_savings);
    if !payback.is_reachable() {
        warnings.push("Savings after maintenance are zero; payback is unreachable.".into());
    }

    let score = score(net_savings, &payback);
    let recommendation = SimplifiedRecommendation::from_score(score);
    debug!(%net_savings, %payback, score, ?recommendation, "simplified viability");

    let output = SimplifiedViability {
        base_revenue: round_half_up(base),
        individual: IndividualSummary {
            net_monthly: round_half_up(individual_net),
            income_tax: round_half_up(non_negative(income_tax)),
        },
        corporate: CorporateSummary {
            net_monthly: round_half_up(corporate_net),
            corporate_tax: round_half_up(non_negative(corporate_tax)),
            consumption_tax: round_half_up(non_negative(consumption_tax)),
            professional_fees: round_half_up(fees),
            other_expenses: round_half_up(other),
        },
        monthly_savings: round_half_up(savings),
        savings_after_maintenance: round_half_up(net_savings),
        implementation_cost: round_half_up(cost),
        payback: payback.rounded(),
        score,
        recommendation,
        message: recommendation.message().to_string(),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "base": "revenue * (1 - discount/100)",
        "corporate_net": "base - corporate% - consumption% - fees - other expenses",
        "maintenance": "annual maintenance spread over 12 months",
        "score": "90 / 70 / 50 / 25 for payback <= 12 / 24 / 36 / beyond",
    });

    with_metadata(
        "simplified",
        "PF vs PJ holding viability (placeholder rates, caller-supplied costs)",
        &assumptions,
        warnings,
        elapsed,
        output,
    )
}

fn score(net_savings: Money, payback: &Payback) -> u32 {
    if net_savings <= Decimal::ZERO {
        return 0;
    }
    match payback.months() {
        Some(m) if m <= dec!(12) => 90,
        Some(m) if m <= dec!(24) => 70,
        Some(m) if m <= dec!(36) => 50,
        Some(_) => 25,
        None => 0,
    }
}
