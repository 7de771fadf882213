//! Money amounts and their printed form.

use core::iter::Sum;
use core::ops::Add;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::value_object::ValueObject;

/// Currency glyph printed in front of document totals.
pub const CURRENCY_GLYPH: char = '₹';

/// A money amount in the single currency the quotation is written in.
///
/// Arithmetic saturates at the decimal range instead of panicking.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl ValueObject for Money {}

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// `10000` -> `10,000.00`. Rounds half-to-even to two decimals.
    pub fn format_grouped(&self) -> String {
        let rounded = self
            .0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven);
        let plain = format!("{rounded:.2}");

        let (sign, unsigned) = match plain.strip_prefix('-') {
            Some(rest) => ("-", rest),
            None => ("", plain.as_str()),
        };
        let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned, "00"));

        let digits = int_part.as_bytes();
        let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
        for (i, digit) in digits.iter().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(char::from(*digit));
        }

        // "-0.00" reads badly on a quotation.
        let sign = if grouped.bytes().all(|b| b == b'0') && frac_part.bytes().all(|b| b == b'0') {
            ""
        } else {
            sign
        };
        format!("{sign}{grouped}.{frac_part}")
    }

    /// `10500` -> `₹ 10,500.00`.
    pub fn format_with_glyph(&self) -> String {
        format!("{CURRENCY_GLYPH} {}", self.format_grouped())
    }
}

impl From<Decimal> for Money {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.copied().sum()
    }
}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.format_grouped())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::str::FromStr;
    use proptest::prelude::*;

    fn money(s: &str) -> Money {
        Money::new(Decimal::from_str(s).unwrap())
    }

    #[test]
    fn groups_thousands_with_two_decimals() {
        assert_eq!(money("0").format_grouped(), "0.00");
        assert_eq!(money("500").format_grouped(), "500.00");
        assert_eq!(money("1200").format_grouped(), "1,200.00");
        assert_eq!(money("10500").format_grouped(), "10,500.00");
        assert_eq!(money("1234567.891").format_grouped(), "1,234,567.89");
        assert_eq!(money("-98765.4").format_grouped(), "-98,765.40");
    }

    #[test]
    fn rounds_half_to_even() {
        assert_eq!(money("0.125").format_grouped(), "0.12");
        assert_eq!(money("0.135").format_grouped(), "0.14");
        assert_eq!(money("-0.001").format_grouped(), "0.00");
    }

    #[test]
    fn glyph_prefix_is_separated_by_a_space() {
        assert_eq!(money("10500").format_with_glyph(), "₹ 10,500.00");
    }

    #[test]
    fn sum_saturates_instead_of_panicking() {
        let total: Money = [Money::new(Decimal::MAX), Money::new(Decimal::ONE)]
            .into_iter()
            .sum();
        assert_eq!(total.amount(), Decimal::MAX);
    }

    #[test]
    fn serializes_transparently() {
        let json = serde_json::to_string(&money("12.5")).unwrap();
        let back: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(back, money("12.5"));
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: removing the separators gives back the two-decimal value.
        #[test]
        fn separators_do_not_change_the_value(cents in 0i64..10_000_000_000i64) {
            let m = Money::new(Decimal::new(cents, 2));
            let printed = m.format_grouped();
            let stripped: String = printed.chars().filter(|c| *c != ',').collect();
            prop_assert_eq!(Decimal::from_str(&stripped).unwrap(), m.amount());
            for group in printed.split('.').next().unwrap().split(',').skip(1) {
                prop_assert_eq!(group.len(), 3);
            }
        }
    }
}
