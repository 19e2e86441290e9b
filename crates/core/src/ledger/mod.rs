//! Debt ledger arithmetic.
//!
//! A customer debt is a running balance derived from an append-only sequence
//! of signed movements: payments decrease the balance, new-balance entries
//! increase it. This module holds the pure arithmetic (application,
//! reversal, precondition checks, and history replay) while the database
//! layer owns locking and persistence.

pub mod balance;
pub mod error;
pub mod types;

#[cfg(test)]
mod balance_props;

pub use balance::{
    apply_movement, replay_history, reverse_movement, signed_effect, validate_amount,
    validate_payment, Reversal,
};
pub use error::LedgerError;
pub use types::{BalancePoint, MovementKind, MovementRecord};
