//! Fixed-point currency amounts
//!
//! All prices, fees and revenue figures in the ledger and the analytics
//! engine are integer minor units (e.g. francs for XOF, cents for EUR).
//! Floating point never touches a persisted amount.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub};

/// A currency amount in minor units.
///
/// Serializes as a bare integer so wire records stay free of locale or
/// currency concerns; the currency label lives in [`crate::config::StoreConfig`].
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    /// Build an amount from minor units.
    pub const fn from_minor(amount: i64) -> Self {
        Money(amount)
    }

    /// The raw minor-unit value.
    pub const fn minor(self) -> i64 {
        self.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Line-item extension: unit price times a quantity.
    pub fn times(self, quantity: u32) -> Money {
        Money(self.0 * i64::from(quantity))
    }

    /// Integer division, used for average-order-value style metrics.
    /// Returns zero when `divisor` is zero.
    pub fn divided_by(self, divisor: u64) -> Money {
        if divisor == 0 {
            Money::ZERO
        } else {
            Money(self.0 / divisor as i64)
        }
    }

    /// Lossy conversion for trend percentages; never used for persisted state.
    pub fn as_f64(self) -> f64 {
        self.0 as f64
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0 - rhs.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_times_and_sum() {
        let unit = Money::from_minor(1000);
        assert_eq!(unit.times(2), Money::from_minor(2000));

        let total: Money = [unit.times(2), Money::from_minor(500)].into_iter().sum();
        assert_eq!(total, Money::from_minor(2500));
    }

    #[test]
    fn test_divided_by_zero_is_zero() {
        assert_eq!(Money::from_minor(3000).divided_by(0), Money::ZERO);
        assert_eq!(
            Money::from_minor(3000).divided_by(3),
            Money::from_minor(1000)
        );
    }

    #[test]
    fn test_serializes_as_bare_integer() {
        let json = serde_json::to_string(&Money::from_minor(2500)).unwrap();
        assert_eq!(json, "2500");

        let back: Money = serde_json::from_str("2500").unwrap();
        assert_eq!(back, Money::from_minor(2500));
    }

    #[test]
    fn test_negative_detection() {
        assert!(Money::from_minor(-1).is_negative());
        assert!(!Money::ZERO.is_negative());
    }
}
