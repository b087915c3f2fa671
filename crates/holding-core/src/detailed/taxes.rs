//! Tax formulas of the detailed rule set, shared by the rate deriver and
//! the viability calculator.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::brackets::{BracketTable, TaxBracket};
use crate::common::non_negative;
use crate::types::{Money, Rate};

// ---------------------------------------------------------------------------
// Individual (PF)
// ---------------------------------------------------------------------------

const SIMPLIFIED_DEDUCTION_RATE: Rate = dec!(0.20);
const SIMPLIFIED_DEDUCTION_CAP: Money = dec!(607.20);

/// Monthly IRPF table (2024).
pub const IRPF_BRACKETS: [TaxBracket; 5] = [
    TaxBracket::bounded(dec!(2428.80), dec!(0), dec!(0)),
    TaxBracket::bounded(dec!(2826.65), dec!(0.075), dec!(182.16)),
    TaxBracket::bounded(dec!(3751.05), dec!(0.15), dec!(394.16)),
    TaxBracket::bounded(dec!(4664.68), dec!(0.225), dec!(675.49)),
    TaxBracket::unbounded(dec!(0.275), dec!(908.73)),
];

pub const IRPF_TABLE: BracketTable = BracketTable::new("irpf_monthly_2024", &IRPF_BRACKETS);

// ---------------------------------------------------------------------------
// Consumption tax (IBS/CBS) and social reduction
// ---------------------------------------------------------------------------

const CONSUMPTION_TAX_RATE: Rate = dec!(0.084);
const SOCIAL_REDUCTION_PER_PROPERTY: Money = dec!(600);
const MULTI_PROPERTY_THRESHOLD: u32 = 3;
const MULTI_PROPERTY_ANNUAL_REVENUE: Money = dec!(240_000);
const ANNUAL_REVENUE_THRESHOLD: Money = dec!(280_000);
const MONTHS_PER_YEAR: Decimal = dec!(12);

// ---------------------------------------------------------------------------
// Corporate (PJ, presumed profit)
// ---------------------------------------------------------------------------

const PRESUMED_PROFIT_RATE: Rate = dec!(0.32);
const IRPJ_RATE: Rate = dec!(0.15);
const IRPJ_SURTAX_RATE: Rate = dec!(0.10);
const IRPJ_SURTAX_THRESHOLD: Money = dec!(20_000);
const CSLL_RATE: Rate = dec!(0.0288);
const CORPORATE_CONSUMPTION_CREDIT: Money = dec!(425.04);

/// Social reduction of the consumption-tax base for qualifying lessors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialReduction {
    pub eligible: bool,
    pub amount: Money,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndividualTaxes {
    pub deduction: Money,
    pub taxable_base: Money,
    pub income_tax: Money,
    pub consumption_tax: Money,
}

impl IndividualTaxes {
    pub fn total(&self) -> Money {
        self.income_tax + self.consumption_tax
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorporateTaxes {
    pub presumed_profit: Money,
    pub income_tax: Money,
    pub social_contribution: Money,
    pub consumption_tax: Money,
}

impl CorporateTaxes {
    pub fn total(&self) -> Money {
        self.income_tax + self.social_contribution + self.consumption_tax
    }
}

/// Eligible when (more than 3 properties and annual revenue above 240k)
/// or annual revenue above 280k. Worth 600 per property when eligible.
pub fn social_reduction(monthly_revenue: Money, property_count: u32) -> SocialReduction {
    let annual = monthly_revenue * MONTHS_PER_YEAR;
    let eligible = (property_count > MULTI_PROPERTY_THRESHOLD
        && annual > MULTI_PROPERTY_ANNUAL_REVENUE)
        || annual > ANNUAL_REVENUE_THRESHOLD;
    let amount = if eligible {
        Decimal::from(property_count) * SOCIAL_REDUCTION_PER_PROPERTY
    } else {
        Decimal::ZERO
    };
    debug!(%annual, property_count, eligible, %amount, "social reduction");
    SocialReduction { eligible, amount }
}

/// IBS/CBS on the reduced base; zero for lessors outside the regime.
pub fn consumption_tax(monthly_revenue: Money, reduction: &SocialReduction) -> Money {
    if !reduction.eligible {
        return Decimal::ZERO;
    }
    non_negative((monthly_revenue - reduction.amount) * CONSUMPTION_TAX_RATE)
}

/// Progressive income tax on an already-deducted monthly base.
pub fn income_tax(taxable_base: Money) -> Money {
    IRPF_TABLE.tax(taxable_base)
}

pub fn individual_taxes(monthly_revenue: Money, reduction: &SocialReduction) -> IndividualTaxes {
    let deduction = (monthly_revenue * SIMPLIFIED_DEDUCTION_RATE).min(SIMPLIFIED_DEDUCTION_CAP);
    let taxable_base = non_negative(monthly_revenue - deduction);
    IndividualTaxes {
        deduction,
        taxable_base,
        income_tax: income_tax(taxable_base),
        consumption_tax: consumption_tax(monthly_revenue, reduction),
    }
}

/// IRPJ surtax: 10% of the monthly presumed profit above 20k.
fn irpj_surtax(presumed_profit: Money) -> Money {
    if presumed_profit <= IRPJ_SURTAX_THRESHOLD {
        return Decimal::ZERO;
    }
    (presumed_profit - IRPJ_SURTAX_THRESHOLD) * IRPJ_SURTAX_RATE
}

pub fn corporate_taxes(monthly_revenue: Money, reduction: &SocialReduction) -> CorporateTaxes {
    let presumed_profit = monthly_revenue * PRESUMED_PROFIT_RATE;
    let income_tax = presumed_profit * IRPJ_RATE + irpj_surtax(presumed_profit);
    let social_contribution = monthly_revenue * CSLL_RATE;
    let consumption_tax = non_negative(
        consumption_tax(monthly_revenue, reduction) - CORPORATE_CONSUMPTION_CREDIT,
    );
    CorporateTaxes {
        presumed_profit,
        income_tax,
        social_contribution,
        consumption_tax,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::round_half_up;

    #[test]
    fn test_irpf_table_well_formed() {
        assert!(IRPF_TABLE.is_well_formed());
    }

    #[test]
    fn test_deduction_capped() {
        let r = social_reduction(dec!(10_000), 1);
        let t = individual_taxes(dec!(10_000), &r);
        assert_eq!(t.deduction, dec!(607.20));
        assert_eq!(t.taxable_base, dec!(9392.80));
    }

    #[test]
    fn test_deduction_below_cap() {
        let r = social_reduction(dec!(2_000), 1);
        let t = individual_taxes(dec!(2_000), &r);
        assert_eq!(t.deduction, dec!(400));
        assert_eq!(t.taxable_base, dec!(1600));
        assert_eq!(t.income_tax, Decimal::ZERO);
    }

    #[test]
    fn test_top_bracket_income_tax() {
        // 9392.80 * 0.275 - 908.73 = 1674.29
        assert_eq!(income_tax(dec!(9392.80)), dec!(1674.29));
    }

    #[test]
    fn test_bracket_continuity_at_boundaries() {
        let step = dec!(0.01);
        for bound in [dec!(2428.80), dec!(2826.65), dec!(3751.05), dec!(4664.68)] {
            let at = round_half_up(income_tax(bound));
            let above = round_half_up(income_tax(bound + step));
            assert!(
                above >= at,
                "tax dropped across {bound}: {at} -> {above}"
            );
            assert!(above - at <= dec!(0.01), "jump across {bound}: {at} -> {above}");
        }
    }

    #[test]
    fn test_income_tax_monotonic() {
        let mut base = Decimal::ZERO;
        let mut previous = Decimal::ZERO;
        while base <= dec!(12_000) {
            let tax = income_tax(base);
            assert!(tax >= previous, "tax decreased at base {base}");
            previous = tax;
            base += dec!(0.5);
        }
    }

    #[test]
    fn test_social_reduction_multi_property_clause() {
        let r = social_reduction(dec!(20_001), 4);
        assert!(r.eligible);
        assert_eq!(r.amount, dec!(2_400));
    }

    #[test]
    fn test_social_reduction_revenue_clause() {
        let r = social_reduction(dec!(23_334), 1);
        assert!(r.eligible);
        assert_eq!(r.amount, dec!(600));
    }

    #[test]
    fn test_social_reduction_ineligible() {
        let r = social_reduction(dec!(19_999), 2);
        assert!(!r.eligible);
        assert_eq!(r.amount, Decimal::ZERO);

        // 4 properties but annual exactly 240k: not strictly above
        assert!(!social_reduction(dec!(20_000), 4).eligible);
        // 3 properties, annual 240,012: first clause needs more than 3
        assert!(!social_reduction(dec!(20_001), 3).eligible);
    }

    #[test]
    fn test_consumption_tax_eligible() {
        let r = social_reduction(dec!(30_000), 2);
        // (30,000 - 1,200) * 0.084 = 2,419.20
        assert_eq!(consumption_tax(dec!(30_000), &r), dec!(2419.20));
    }

    #[test]
    fn test_consumption_tax_never_negative() {
        let r = social_reduction(dec!(25_000), 100);
        assert!(r.eligible);
        assert_eq!(consumption_tax(dec!(25_000), &r), Decimal::ZERO);
    }

    #[test]
    fn test_corporate_taxes_without_surtax() {
        let r = social_reduction(dec!(10_000), 1);
        let t = corporate_taxes(dec!(10_000), &r);
        assert_eq!(t.presumed_profit, dec!(3_200));
        assert_eq!(t.income_tax, dec!(480));
        assert_eq!(t.social_contribution, dec!(288));
        assert_eq!(t.consumption_tax, Decimal::ZERO);
        assert_eq!(t.total(), dec!(768));
    }

    #[test]
    fn test_corporate_taxes_with_surtax_and_credit() {
        let r = social_reduction(dec!(100_000), 1);
        let t = corporate_taxes(dec!(100_000), &r);
        // presumed 32,000: 4,800 + 10% of 12,000
        assert_eq!(t.income_tax, dec!(6_000));
        assert_eq!(t.social_contribution, dec!(2_880));
        // (100,000 - 600) * 0.084 = 8,349.60, minus 425.04 credit
        assert_eq!(t.consumption_tax, dec!(7924.56));
    }
}
