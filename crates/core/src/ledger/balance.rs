//! Balance application, reversal, and history replay.

use tienda_shared::types::Money;

use super::error::LedgerError;
use super::types::{BalancePoint, MovementKind, MovementRecord};

/// The signed effect of a movement on a balance.
///
/// Payments subtract, new-balance entries add. This single rule is shared by
/// live balance updates and history replay so the two can never disagree on
/// arithmetic.
#[must_use]
pub fn signed_effect(kind: MovementKind, amount: Money) -> Money {
    match kind {
        MovementKind::Payment => -amount,
        MovementKind::NewBalance => amount,
    }
}

/// Applies a movement to a balance.
#[must_use]
pub fn apply_movement(balance: Money, kind: MovementKind, amount: Money) -> Money {
    balance + signed_effect(kind, amount)
}

/// Outcome of reversing a movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reversal {
    /// Balance after reversal, clamped at zero.
    pub balance: Money,
    /// Balance the reversal actually computed, before clamping.
    pub unclamped: Money,
}

impl Reversal {
    /// True when clamping discarded a negative excursion.
    ///
    /// When this is set, deleting the movement was not an exact inverse of
    /// registering it; callers log the discarded magnitude.
    #[must_use]
    pub fn clamped(&self) -> bool {
        self.balance != self.unclamped
    }
}

/// Reverses a movement's effect on a balance.
///
/// A payment reversal adds the amount back; a new-balance reversal subtracts
/// it. A result below zero is clamped to zero (kept for compatibility with
/// the established display behavior; the pre-clamp value is reported so the
/// caller can flag it).
#[must_use]
pub fn reverse_movement(balance: Money, kind: MovementKind, amount: Money) -> Reversal {
    let unclamped = balance - signed_effect(kind, amount);
    let clamped = if unclamped.is_negative() {
        Money::ZERO
    } else {
        unclamped
    };
    Reversal {
        balance: clamped,
        unclamped,
    }
}

/// Validates that a movement amount is strictly positive.
pub fn validate_amount(amount: Money) -> Result<(), LedgerError> {
    if amount > Money::ZERO {
        Ok(())
    } else {
        Err(LedgerError::NonPositiveAmount(amount))
    }
}

/// Validates that a payment does not exceed the current balance.
///
/// Payments cannot drive the balance negative through the registration path.
pub fn validate_payment(balance: Money, amount: Money) -> Result<(), LedgerError> {
    if amount > balance {
        Err(LedgerError::PaymentExceedsBalance { amount, balance })
    } else {
        Ok(())
    }
}

/// Replays movements in the given order, yielding the balance after each one.
///
/// The replay starts from zero and applies the same signed-sum rule as live
/// balance updates, with no clamping: a true negative trajectory stays
/// visible here even where the live balance would have hidden it. The
/// debt's initial balance does not participate, so the final replayed value
/// can disagree with the live balance when a debt was created with a
/// non-zero initial balance.
pub fn replay_history(
    movements: impl IntoIterator<Item = MovementRecord>,
) -> impl Iterator<Item = BalancePoint> {
    movements.into_iter().scan(Money::ZERO, |balance, m| {
        *balance = apply_movement(*balance, m.kind, m.amount);
        Some(BalancePoint {
            date: m.date,
            balance: *balance,
            movement_kind: m.kind,
            movement_amount: m.amount,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};
    use rust_decimal_macros::dec;

    fn money(d: rust_decimal::Decimal) -> Money {
        Money::new(d)
    }

    fn at(hour: u32) -> chrono::DateTime<FixedOffset> {
        FixedOffset::west_opt(5 * 3600)
            .unwrap()
            .with_ymd_and_hms(2026, 8, 1, hour, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_payment_decreases_balance() {
        let balance = apply_movement(money(dec!(1500.00)), MovementKind::Payment, money(dec!(500.00)));
        assert_eq!(balance, money(dec!(1000.00)));
    }

    #[test]
    fn test_new_balance_increases_balance() {
        let balance = apply_movement(money(dec!(1000.00)), MovementKind::NewBalance, money(dec!(300.00)));
        assert_eq!(balance, money(dec!(1300.00)));
    }

    #[test]
    fn test_reverse_payment_adds_back() {
        let reversal = reverse_movement(money(dec!(1300.00)), MovementKind::Payment, money(dec!(500.00)));
        assert_eq!(reversal.balance, money(dec!(1800.00)));
        assert!(!reversal.clamped());
    }

    #[test]
    fn test_reverse_new_balance_subtracts() {
        let reversal = reverse_movement(money(dec!(1300.00)), MovementKind::NewBalance, money(dec!(300.00)));
        assert_eq!(reversal.balance, money(dec!(1000.00)));
        assert!(!reversal.clamped());
    }

    #[test]
    fn test_reverse_clamps_negative_to_zero() {
        // Reversing a NEW_BALANCE larger than the remaining balance.
        let reversal = reverse_movement(money(dec!(100.00)), MovementKind::NewBalance, money(dec!(250.00)));
        assert_eq!(reversal.balance, Money::ZERO);
        assert_eq!(reversal.unclamped, money(dec!(-150.00)));
        assert!(reversal.clamped());
    }

    #[test]
    fn test_validate_amount_rejects_zero_and_negative() {
        assert!(validate_amount(money(dec!(0.01))).is_ok());
        assert_eq!(
            validate_amount(Money::ZERO),
            Err(LedgerError::NonPositiveAmount(Money::ZERO))
        );
        assert!(validate_amount(money(dec!(-5))).is_err());
    }

    #[test]
    fn test_validate_payment_bound() {
        assert!(validate_payment(money(dec!(100.00)), money(dec!(100.00))).is_ok());
        assert_eq!(
            validate_payment(money(dec!(100.00)), money(dec!(100.01))),
            Err(LedgerError::PaymentExceedsBalance {
                amount: money(dec!(100.01)),
                balance: money(dec!(100.00)),
            })
        );
    }

    #[test]
    fn test_replay_history_from_zero() {
        let movements = vec![
            MovementRecord {
                kind: MovementKind::NewBalance,
                amount: money(dec!(1500.00)),
                date: at(9),
            },
            MovementRecord {
                kind: MovementKind::Payment,
                amount: money(dec!(500.00)),
                date: at(12),
            },
            MovementRecord {
                kind: MovementKind::NewBalance,
                amount: money(dec!(300.00)),
                date: at(15),
            },
        ];

        let points: Vec<_> = replay_history(movements).collect();
        let balances: Vec<_> = points.iter().map(|p| p.balance).collect();
        assert_eq!(
            balances,
            vec![money(dec!(1500.00)), money(dec!(1000.00)), money(dec!(1300.00))]
        );
        assert_eq!(points[1].movement_kind, MovementKind::Payment);
        assert_eq!(points[1].movement_amount, money(dec!(500.00)));
    }

    #[test]
    fn test_replay_history_shows_negative_trajectory() {
        // A payment-first sequence goes negative in replay; no clamping here.
        let movements = vec![MovementRecord {
            kind: MovementKind::Payment,
            amount: money(dec!(200.00)),
            date: at(9),
        }];
        let points: Vec<_> = replay_history(movements).collect();
        assert_eq!(points[0].balance, money(dec!(-200.00)));
    }

    #[test]
    fn test_replay_history_empty() {
        assert_eq!(replay_history(Vec::new()).count(), 0);
    }
}
