//! Money type with decimal precision.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! This type wraps `rust_decimal::Decimal` for arbitrary precision. All
//! intermediate arithmetic stays unrounded; callers round with
//! [`Money::round_half_up`] only when producing externally visible figures.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A monetary amount with arbitrary internal precision.
///
/// The store operates in a single currency, so no currency dimension is
/// carried. Amounts are signed: a negative `Money` is a valid intermediate
/// value (e.g. a profit shortfall) even where persisted balances are not.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money {
    /// The decimal amount.
    pub amount: Decimal,
}

impl Money {
    /// Zero amount.
    pub const ZERO: Self = Self {
        amount: Decimal::ZERO,
    };

    /// Creates a new Money instance.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self { amount }
    }

    /// Returns true if the amount is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Returns true if the amount is negative.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.amount.is_sign_negative() && !self.amount.is_zero()
    }

    /// Returns the absolute value.
    #[must_use]
    pub fn abs(&self) -> Self {
        Self::new(self.amount.abs())
    }

    /// Rounds to 2 fractional digits, half-up (midpoint away from zero).
    ///
    /// This is the single rounding rule for every externally visible
    /// monetary figure.
    #[must_use]
    pub fn round_half_up(&self) -> Self {
        Self::new(
            self.amount
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        )
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Self::new(amount)
    }
}

impl std::ops::Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.amount + rhs.amount)
    }
}

impl std::ops::AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.amount += rhs.amount;
    }
}

impl std::ops::Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.amount - rhs.amount)
    }
}

impl std::ops::SubAssign for Money {
    fn sub_assign(&mut self, rhs: Self) {
        self.amount -= rhs.amount;
    }
}

impl std::ops::Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.amount)
    }
}

impl std::ops::Mul<Decimal> for Money {
    type Output = Self;

    fn mul(self, rhs: Decimal) -> Self {
        Self::new(self.amount * rhs)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, m| acc + m)
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_money_new() {
        let money = Money::new(dec!(100.00));
        assert_eq!(money.amount, dec!(100.00));
    }

    #[test]
    fn test_money_zero() {
        assert!(Money::ZERO.is_zero());
        assert!(!Money::ZERO.is_negative());
    }

    #[test]
    fn test_money_is_negative() {
        assert!(Money::new(dec!(-10)).is_negative());
        assert!(!Money::new(dec!(10)).is_negative());
        assert!(!Money::new(dec!(0)).is_negative());
    }

    #[test]
    fn test_money_arithmetic() {
        let a = Money::new(dec!(10.50));
        let b = Money::new(dec!(4.25));
        assert_eq!(a + b, Money::new(dec!(14.75)));
        assert_eq!(a - b, Money::new(dec!(6.25)));
        assert_eq!(-a, Money::new(dec!(-10.50)));
        assert_eq!(a * dec!(3), Money::new(dec!(31.50)));
    }

    #[test]
    fn test_money_sum() {
        let total: Money = [dec!(1.10), dec!(2.20), dec!(3.30)]
            .into_iter()
            .map(Money::new)
            .sum();
        assert_eq!(total, Money::new(dec!(6.60)));
    }

    #[test]
    fn test_round_half_up_midpoint_goes_up() {
        assert_eq!(Money::new(dec!(1.005)).round_half_up().amount, dec!(1.01));
        assert_eq!(Money::new(dec!(2.675)).round_half_up().amount, dec!(2.68));
    }

    #[test]
    fn test_round_half_up_below_midpoint_goes_down() {
        assert_eq!(Money::new(dec!(1.004)).round_half_up().amount, dec!(1.00));
    }

    #[test]
    fn test_round_half_up_negative_midpoint_away_from_zero() {
        assert_eq!(Money::new(dec!(-1.005)).round_half_up().amount, dec!(-1.01));
    }

    #[test]
    fn test_round_half_up_preserves_rounded_values() {
        assert_eq!(Money::new(dec!(7.30)).round_half_up().amount, dec!(7.30));
    }
}
