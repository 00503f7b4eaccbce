//! Currency amounts in minor units.
//!
//! Fees are exact decimal amounts with two fractional digits. They are held as
//! integer cents so that `2.50 × 2` is exactly `5.00`.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::Add;
use std::str::FromStr;

/// A non-negative currency amount.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money {
    cents: u64,
}

impl Money {
    pub const ZERO: Self = Self { cents: 0 };

    #[inline]
    pub const fn from_cents(cents: u64) -> Self {
        Self { cents }
    }

    #[inline]
    pub const fn cents(self) -> u64 {
        self.cents
    }

    #[inline]
    pub const fn is_zero(self) -> bool {
        self.cents == 0
    }

    /// Amount multiplied by a cart-line quantity.
    #[inline]
    pub fn times(self, quantity: u32) -> Self {
        Self::from_cents(self.cents.saturating_mul(quantity as u64))
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money::from_cents(self.cents.saturating_add(rhs.cents))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.cents / 100, self.cents % 100)
    }
}

/// Error from parsing a money amount.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid amount '{0}': expected a non-negative number with at most two decimals")]
pub struct ParseMoneyError(String);

impl FromStr for Money {
    type Err = ParseMoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseMoneyError(s.to_string());
        let trimmed = s.trim();
        let (whole, frac) = match trimmed.split_once('.') {
            Some((w, f)) => (w, f),
            None => (trimmed, ""),
        };

        if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
            return Err(err());
        }
        if frac.len() > 2 || !frac.bytes().all(|b| b.is_ascii_digit()) {
            return Err(err());
        }

        let whole: u64 = whole.parse().map_err(|_| err())?;
        let frac: u64 = match frac.len() {
            0 => 0,
            1 => frac.parse::<u64>().map_err(|_| err())? * 10,
            _ => frac.parse().map_err(|_| err())?,
        };

        whole
            .checked_mul(100)
            .and_then(|c| c.checked_add(frac))
            .map(Money::from_cents)
            .ok_or_else(err)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct MoneyVisitor;

        impl Visitor<'_> for MoneyVisitor {
            type Value = Money;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an amount such as \"2.50\" or 2.5")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Money, E> {
                v.parse().map_err(E::custom)
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Money, E> {
                v.checked_mul(100)
                    .map(Money::from_cents)
                    .ok_or_else(|| E::custom("amount out of range"))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Money, E> {
                u64::try_from(v)
                    .map_err(|_| E::custom("amount must not be negative"))
                    .and_then(|v| self.visit_u64(v))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Money, E> {
                self.visit_str(&v.to_string())
            }
        }

        deserializer.deserialize_any(MoneyVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        assert_eq!("2.50".parse::<Money>().unwrap(), Money::from_cents(250));
        assert_eq!("2.5".parse::<Money>().unwrap(), Money::from_cents(250));
        assert_eq!("25".parse::<Money>().unwrap(), Money::from_cents(2500));
        assert_eq!(Money::from_cents(500).to_string(), "5.00");
        assert_eq!(Money::from_cents(7).to_string(), "0.07");
    }

    #[test]
    fn test_parse_rejects_bad_amounts() {
        for bad in ["", "-1", "1.234", "abc", ".5", "1.x"] {
            assert!(bad.parse::<Money>().is_err(), "{bad:?} should not parse");
        }
    }

    #[test]
    fn test_times_and_sum() {
        let fee = Money::from_cents(250);
        assert_eq!(fee.times(2), Money::from_cents(500));
        let total: Money = [fee, fee.times(3)].into_iter().sum();
        assert_eq!(total.to_string(), "10.00");
    }

    #[test]
    fn test_json_forms() {
        let a: Money = serde_json::from_str("\"2.50\"").unwrap();
        let b: Money = serde_json::from_str("2.5").unwrap();
        let c: Money = serde_json::from_str("3").unwrap();
        assert_eq!(a, b);
        assert_eq!(c, Money::from_cents(300));
        assert!(serde_json::from_str::<Money>("-1").is_err());
        assert_eq!(serde_json::to_string(&a).unwrap(), "\"2.50\"");
    }
}
