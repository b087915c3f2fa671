use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::common::non_negative;
use crate::types::{Money, Rate};

/// One tier of a bracket table.
///
/// `upper_bound` is inclusive; `None` marks the open-ended final tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub upper_bound: Option<Money>,
    pub rate: Rate,
    pub subtractor: Money,
}

impl TaxBracket {
    pub const fn bounded(upper_bound: Money, rate: Rate, subtractor: Money) -> Self {
        Self {
            upper_bound: Some(upper_bound),
            rate,
            subtractor,
        }
    }

    pub const fn unbounded(rate: Rate, subtractor: Money) -> Self {
        Self {
            upper_bound: None,
            rate,
            subtractor,
        }
    }

    fn contains(&self, value: Decimal) -> bool {
        self.upper_bound.map_or(true, |ub| value <= ub)
    }
}

/// Ordered, gap-free bracket table. The first tier whose upper bound is
/// greater than or equal to the value applies.
///
/// Tables are declared as consts next to the rule set that owns them and
/// must be non-empty with an unbounded final tier (`is_well_formed`).
#[derive(Debug, Clone, Copy)]
pub struct BracketTable {
    name: &'static str,
    brackets: &'static [TaxBracket],
}

impl BracketTable {
    pub const fn new(name: &'static str, brackets: &'static [TaxBracket]) -> Self {
        Self { name, brackets }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn brackets(&self) -> &'static [TaxBracket] {
        self.brackets
    }

    /// Zero-based index of the tier applying to `value`.
    pub fn position(&self, value: Decimal) -> usize {
        self.brackets
            .iter()
            .position(|b| b.contains(value))
            .unwrap_or(self.brackets.len().saturating_sub(1))
    }

    pub fn lookup(&self, value: Decimal) -> &'static TaxBracket {
        let idx = self.position(value);
        trace!(table = self.name, %value, tier = idx, "bracket lookup");
        &self.brackets[idx]
    }

    /// Progressive tax: `base * rate - subtractor`, floored at zero.
    pub fn tax(&self, base: Money) -> Money {
        let bracket = self.lookup(base);
        non_negative(base * bracket.rate - bracket.subtractor)
    }

    /// Flat rate of the tier applying to `value`, no subtraction.
    pub fn flat_rate(&self, value: Decimal) -> Rate {
        self.lookup(value).rate
    }

    /// Non-empty, strictly increasing bounds, exactly one unbounded tier at the end.
    pub fn is_well_formed(&self) -> bool {
        let Some((last, bounded)) = self.brackets.split_last() else {
            return false;
        };
        if last.upper_bound.is_some() {
            return false;
        }
        let mut previous: Option<Decimal> = None;
        for b in bounded {
            let Some(ub) = b.upper_bound else {
                return false;
            };
            if previous.is_some_and(|p| ub <= p) {
                return false;
            }
            previous = Some(ub);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const SAMPLE: [TaxBracket; 3] = [
        TaxBracket::bounded(dec!(100), dec!(0), dec!(0)),
        TaxBracket::bounded(dec!(200), dec!(0.10), dec!(10)),
        TaxBracket::unbounded(dec!(0.20), dec!(30)),
    ];

    const TABLE: BracketTable = BracketTable::new("sample", &SAMPLE);

    #[test]
    fn test_lookup_upper_bound_inclusive() {
        assert_eq!(TABLE.position(dec!(100)), 0);
        assert_eq!(TABLE.position(dec!(100.01)), 1);
        assert_eq!(TABLE.position(dec!(200)), 1);
        assert_eq!(TABLE.position(dec!(1_000_000)), 2);
    }

    #[test]
    fn test_negative_value_uses_first_tier() {
        assert_eq!(TABLE.position(dec!(-50)), 0);
        assert_eq!(TABLE.tax(dec!(-50)), Decimal::ZERO);
    }

    #[test]
    fn test_progressive_tax() {
        // 150 * 0.10 - 10 = 5
        assert_eq!(TABLE.tax(dec!(150)), dec!(5));
        // 300 * 0.20 - 30 = 30
        assert_eq!(TABLE.tax(dec!(300)), dec!(30));
    }

    #[test]
    fn test_flat_rate() {
        assert_eq!(TABLE.flat_rate(dec!(150)), dec!(0.10));
    }

    #[test]
    fn test_well_formed() {
        assert!(TABLE.is_well_formed());

        const UNSORTED: [TaxBracket; 2] = [
            TaxBracket::bounded(dec!(200), dec!(0), dec!(0)),
            TaxBracket::bounded(dec!(100), dec!(0), dec!(0)),
        ];
        assert!(!BracketTable::new("unsorted", &UNSORTED).is_well_formed());
        assert!(!BracketTable::new("empty", &[]).is_well_formed());
    }
}
