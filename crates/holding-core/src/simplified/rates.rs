use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::brackets::{BracketTable, TaxBracket};
use crate::coerce::lenient_decimal;
use crate::common::{clamp_input, round_half_up};
use crate::types::*;

/// Flat individual rate by monthly revenue. No subtractor.
pub const INDIVIDUAL_BRACKETS: [TaxBracket; 5] = [
    TaxBracket::bounded(dec!(2428.80), dec!(0), dec!(0)),
    TaxBracket::bounded(dec!(2826.65), dec!(0.075), dec!(0)),
    TaxBracket::bounded(dec!(3751.05), dec!(0.15), dec!(0)),
    TaxBracket::bounded(dec!(4664.68), dec!(0.225), dec!(0)),
    TaxBracket::unbounded(dec!(0.275), dec!(0)),
];

/// Consumption-tax rate by property value.
pub const CONSUMPTION_BRACKETS: [TaxBracket; 4] = [
    TaxBracket::bounded(dec!(300_000), dec!(0.005), dec!(0)),
    TaxBracket::bounded(dec!(700_000), dec!(0.01), dec!(0)),
    TaxBracket::bounded(dec!(1_500_000), dec!(0.02), dec!(0)),
    TaxBracket::unbounded(dec!(0.03), dec!(0)),
];

pub const INDIVIDUAL_TABLE: BracketTable =
    BracketTable::new("individual_flat_by_revenue", &INDIVIDUAL_BRACKETS);
pub const CONSUMPTION_TABLE: BracketTable =
    BracketTable::new("consumption_by_property_value", &CONSUMPTION_BRACKETS);

/// Placeholder corporate total rate, in percent.
pub const CORPORATE_TOTAL_PCT: Percent = dec!(11.33);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimplifiedRateInput {
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub monthly_revenue: Money,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub property_value: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimplifiedRates {
    pub individual_tax_pct: Percent,
    pub consumption_tax_pct: Percent,
    pub corporate_total_pct: Percent,
}

fn as_pct(rate: Rate) -> Percent {
    round_half_up(rate * dec!(100))
}

/// Bracket lookups only: revenue picks the individual rate, property value
/// picks the consumption rate, the corporate rate is constant.
pub fn derive_rates(input: &SimplifiedRateInput) -> ComputationOutput<SimplifiedRates> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let revenue = clamp_input("monthly_revenue", input.monthly_revenue, &mut warnings);
    let property_value = clamp_input("property_value", input.property_value, &mut warnings);

    let output = SimplifiedRates {
        individual_tax_pct: as_pct(INDIVIDUAL_TABLE.flat_rate(revenue)),
        consumption_tax_pct: as_pct(CONSUMPTION_TABLE.flat_rate(property_value)),
        corporate_total_pct: CORPORATE_TOTAL_PCT,
    };

    if revenue == Decimal::ZERO {
        warnings.push("Monthly revenue is zero; rates are nominal only.".to_string());
    }

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "individual": "flat 0 / 7.5 / 15 / 22.5 / 27.5% by revenue tier",
        "consumption": "0.5 / 1 / 2 / 3% by property value (300k / 700k / 1.5M)",
        "corporate_total_pct": CORPORATE_TOTAL_PCT,
    });

    with_metadata(
        "simplified",
        "Placeholder PF vs PJ rates by bracket lookup",
        &assumptions,
        warnings,
        elapsed,
        output,
    )
}
