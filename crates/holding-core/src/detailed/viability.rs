use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use super::taxes::{corporate_taxes, individual_taxes, social_reduction, SocialReduction};
use super::{normalize_property_count, DetailedParameters};
use crate::coerce::{lenient_count, lenient_decimal};
use crate::common::{clamp_input, clamp_range, non_negative, round_half_up};
use crate::types::*;

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailedViabilityInput {
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub monthly_revenue: Money,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub property_value: Money,
    #[serde(
        default = "super::default_property_count",
        deserialize_with = "lenient_count"
    )]
    pub property_count: u32,
    /// Vacancy/condo discount on revenue, in percent. Applied only when
    /// strictly between 0 and 90.
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub discount_pct: Percent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndividualRegime {
    pub net_monthly: Money,
    pub total_taxes: Money,
    pub income_tax: Money,
    pub consumption_tax: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorporateRegime {
    pub net_monthly: Money,
    pub total_taxes: Money,
    pub income_tax: Money,
    pub social_contribution: Money,
    pub consumption_tax: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImplementationCost {
    pub total: Money,
    pub transfer_tax: Money,
    pub professional_fees: Money,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetailedRecommendation {
    NoSavings,
    PaybackUnknown,
    Excellent,
    Good,
    Moderate,
    Low,
}

impl DetailedRecommendation {
    pub fn message(&self) -> &'static str {
        match self {
            Self::NoSavings => {
                "In this scenario the holding does not pay for itself: monthly savings are \
                 zero or negative. Review the figures or the property portfolio."
            }
            Self::PaybackUnknown => {
                "The holding generates savings, but the payback period cannot be estimated \
                 from the data provided."
            }
            Self::Excellent => {
                "Excellent viability: short payback and robust savings. Worth moving on to \
                 structuring and execution."
            }
            Self::Good => {
                "Good viability: payback within 12 months. Proceed with structuring and fine-tune \
                 the details."
            }
            Self::Moderate => {
                "Moderate viability: negotiate costs and optimize rents to shorten the payback."
            }
            Self::Low => {
                "Low viability: long payback. Reconsider costs (transfer tax, fees) and \
                 contractual alternatives."
            }
        }
    }
}

impl std::fmt::Display for DetailedRecommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailedViability {
    /// Revenue after the discount, the basis of every figure below.
    pub effective_revenue: Money,
    pub individual: IndividualRegime,
    pub corporate: CorporateRegime,
    pub monthly_savings: Money,
    pub implementation_cost: ImplementationCost,
    pub social_reduction: SocialReduction,
    pub payback: Payback,
    /// 5..=100 when savings are positive, 10 otherwise.
    pub score: u32,
    pub recommendation: DetailedRecommendation,
    pub message: String,
}

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const DISCOUNT_CEILING: Percent = dec!(90);
const NO_SAVINGS_SCORE: u32 = 10;
const MIN_SCORE: Decimal = dec!(5);
const MAX_SCORE: Decimal = dec!(100);
const BASE_SCORE: Decimal = dec!(50);
const SAVINGS_WEIGHT: Decimal = dec!(0.6);
const SAVINGS_BONUS_CAP: Decimal = dec!(40);

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// PF vs PJ viability with the default detailed parameters.
pub fn compute_viability(input: &DetailedViabilityInput) -> ComputationOutput<DetailedViability> {
    compute_viability_with(input, &DetailedParameters::default())
}

/// PF vs PJ viability: taxes under both regimes, conversion cost (ITBI +
/// fees), payback, score and recommendation.
pub fn compute_viability_with(
    input: &DetailedViabilityInput,
    params: &DetailedParameters,
) -> ComputationOutput<DetailedViability> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    // -- Boundary normalization ----------------------------------------------
    let gross_revenue = clamp_input("monthly_revenue", input.monthly_revenue, &mut warnings);
    let property_value = clamp_input("property_value", input.property_value, &mut warnings);
    let property_count = normalize_property_count(input.property_count, &mut warnings);
    let revenue = apply_discount(gross_revenue, input.discount_pct, &mut warnings);

    // -- Regimes -------------------------------------------------------------
    let reduction = social_reduction(revenue, property_count);
    let pf = individual_taxes(revenue, &reduction);
    let pj = corporate_taxes(revenue, &reduction);

    let pf_net = non_negative(revenue - pf.total());
    let pj_net = non_negative(revenue - pj.total());

    // -- Conversion cost and payback -----------------------------------------
    let transfer_tax_rate = clamp_range(
        "transfer_tax_rate",
        params.transfer_tax_rate,
        Decimal::ZERO,
        Decimal::ONE,
        &mut warnings,
    );
    let implementation_fee = clamp_input("implementation_fee", params.implementation_fee, &mut warnings);
    let transfer_tax = property_value * transfer_tax_rate;
    let implementation_total = transfer_tax + implementation_fee;

    let savings = non_negative(pj_net - pf_net);
    let payback = Payback::from_cost_and_savings(implementation_total, savings);
    if !payback.is_reachable() {
        warnings.push("Corporate net does not exceed individual net; payback is unreachable.".into());
    }

    let score = score(savings, &payback, revenue);
    let recommendation = recommend(savings, &payback);
    debug!(%savings, %payback, score, ?recommendation, "detailed viability");

    let output = DetailedViability {
        effective_revenue: round_half_up(revenue),
        individual: IndividualRegime {
            net_monthly: round_half_up(pf_net),
            total_taxes: round_half_up(pf.total()),
            income_tax: round_half_up(pf.income_tax),
            consumption_tax: round_half_up(pf.consumption_tax),
        },
        corporate: CorporateRegime {
            net_monthly: round_half_up(pj_net),
            total_taxes: round_half_up(pj.total()),
            income_tax: round_half_up(pj.income_tax),
            social_contribution: round_half_up(pj.social_contribution),
            consumption_tax: round_half_up(pj.consumption_tax),
        },
        monthly_savings: round_half_up(savings),
        implementation_cost: ImplementationCost {
            total: round_half_up(implementation_total),
            transfer_tax: round_half_up(transfer_tax),
            professional_fees: round_half_up(implementation_fee),
        },
        social_reduction: reduction,
        payback: payback.rounded(),
        score,
        recommendation,
        message: recommendation.message().to_string(),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "discount": "applied only when 0 < discount < 90",
        "transfer_tax_rate": transfer_tax_rate,
        "implementation_fee": implementation_fee,
        "score": "50 + min(40, savings/revenue * 60) + payback bonus (35/<6, 25/<12, 10/<24), clamped to 5..100",
        "individual_net": "revenue - IRPF - IBS/CBS",
        "corporate_net": "revenue - IRPJ - CSLL - IBS/CBS after credit",
    });

    with_metadata(
        "detailed",
        "PF vs PJ holding viability (progressive IRPF, presumed profit, ITBI payback)",
        &assumptions,
        warnings,
        elapsed,
        output,
    )
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn apply_discount(revenue: Money, discount_pct: Percent, warnings: &mut Vec<String>) -> Money {
    if discount_pct > Decimal::ZERO && discount_pct < DISCOUNT_CEILING {
        return revenue * (Decimal::ONE - discount_pct / dec!(100));
    }
    if discount_pct >= DISCOUNT_CEILING {
        warnings.push(format!(
            "discount_pct of {discount_pct}% ignored: must be below {DISCOUNT_CEILING}%."
        ));
    } else if discount_pct < Decimal::ZERO {
        warnings.push(format!("discount_pct of {discount_pct}% ignored: negative."));
    }
    revenue
}

fn payback_bonus(payback: &Payback) -> Decimal {
    match payback.months() {
        Some(m) if m < dec!(6) => dec!(35),
        Some(m) if m < dec!(12) => dec!(25),
        Some(m) if m < dec!(24) => dec!(10),
        _ => Decimal::ZERO,
    }
}

fn score(savings: Money, payback: &Payback, revenue: Money) -> u32 {
    if savings <= Decimal::ZERO {
        return NO_SAVINGS_SCORE;
    }
    let ratio = if revenue > Decimal::ZERO {
        savings / revenue
    } else {
        Decimal::ZERO
    };
    let savings_bonus = (ratio * dec!(100) * SAVINGS_WEIGHT)
        .max(Decimal::ZERO)
        .min(SAVINGS_BONUS_CAP);

    (BASE_SCORE + savings_bonus + payback_bonus(payback))
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .clamp(MIN_SCORE, MAX_SCORE)
        .to_u32()
        .unwrap_or(NO_SAVINGS_SCORE)
}

fn recommend(savings: Money, payback: &Payback) -> DetailedRecommendation {
    if savings <= Decimal::ZERO {
        return DetailedRecommendation::NoSavings;
    }
    match payback.months() {
        None => DetailedRecommendation::PaybackUnknown,
        Some(m) if m <= dec!(6) => DetailedRecommendation::Excellent,
        Some(m) if m <= dec!(12) => DetailedRecommendation::Good,
        Some(m) if m <= dec!(24) => DetailedRecommendation::Moderate,
        Some(_) => DetailedRecommendation::Low,
    }
}
