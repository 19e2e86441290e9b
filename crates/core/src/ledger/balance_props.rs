//! Property tests for ledger balance arithmetic.

use chrono::{FixedOffset, TimeZone};
use proptest::prelude::*;
use rust_decimal::Decimal;
use tienda_shared::types::Money;

use super::balance::{apply_movement, replay_history, reverse_movement};
use super::types::{MovementKind, MovementRecord};

/// Strategy for generating positive cent-precision amounts.
fn amount_strategy() -> impl Strategy<Value = Money> {
    (1i64..1_000_000i64).prop_map(|n| Money::new(Decimal::new(n, 2)))
}

/// Strategy for generating movement kinds.
fn kind_strategy() -> impl Strategy<Value = MovementKind> {
    prop_oneof![Just(MovementKind::Payment), Just(MovementKind::NewBalance)]
}

fn movement_strategy() -> impl Strategy<Value = (MovementKind, Money)> {
    (kind_strategy(), amount_strategy())
}

fn fixed_date() -> chrono::DateTime<FixedOffset> {
    FixedOffset::west_opt(5 * 3600)
        .unwrap()
        .with_ymd_and_hms(2026, 1, 15, 12, 0, 0)
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// For any sequence of movements, the applied balance equals the initial
    /// balance plus the signed sum of amounts.
    #[test]
    fn prop_balance_consistency(
        initial in amount_strategy(),
        movements in prop::collection::vec(movement_strategy(), 0..32),
    ) {
        let mut balance = initial;
        let mut signed_sum = Money::ZERO;
        for &(kind, amount) in &movements {
            balance = apply_movement(balance, kind, amount);
            signed_sum = match kind {
                MovementKind::Payment => signed_sum - amount,
                MovementKind::NewBalance => signed_sum + amount,
            };
        }
        prop_assert_eq!(balance, initial + signed_sum);
    }

    /// Registering then immediately deleting a movement restores the balance
    /// exactly, whenever the intermediate value never dips below zero.
    #[test]
    fn prop_reversal_is_exact_inverse(
        initial in amount_strategy(),
        kind in kind_strategy(),
        amount in amount_strategy(),
    ) {
        let applied = apply_movement(initial, kind, amount);
        prop_assume!(!applied.is_negative());

        let reversal = reverse_movement(applied, kind, amount);
        prop_assert!(!reversal.clamped());
        prop_assert_eq!(reversal.balance, initial);
    }

    /// Reversal never yields a negative live balance; the unclamped value
    /// always carries the true arithmetic result.
    #[test]
    fn prop_reversal_clamps_at_zero(
        balance in amount_strategy(),
        kind in kind_strategy(),
        amount in amount_strategy(),
    ) {
        let reversal = reverse_movement(balance, kind, amount);
        prop_assert!(!reversal.balance.is_negative());
        let effect = match kind {
            MovementKind::Payment => amount,
            MovementKind::NewBalance => -amount,
        };
        prop_assert_eq!(reversal.unclamped, balance + effect);
    }

    /// Replaying history reproduces the same signed-sum rule as live
    /// application, point by point, starting from zero.
    #[test]
    fn prop_replay_matches_live_fold(
        movements in prop::collection::vec(movement_strategy(), 0..32),
    ) {
        let records: Vec<_> = movements
            .iter()
            .map(|&(kind, amount)| MovementRecord { kind, amount, date: fixed_date() })
            .collect();

        let mut live = Money::ZERO;
        let expected: Vec<_> = movements
            .iter()
            .map(|&(kind, amount)| {
                live = apply_movement(live, kind, amount);
                live
            })
            .collect();

        let replayed: Vec<_> = replay_history(records).map(|p| p.balance).collect();
        prop_assert_eq!(replayed, expected);
    }
}
