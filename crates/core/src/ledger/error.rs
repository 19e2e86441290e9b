//! Ledger error types.

use thiserror::Error;
use tienda_shared::types::Money;

/// Errors raised by ledger arithmetic preconditions.
///
/// These are pure-domain failures; the database layer wraps them together
/// with not-found and conflict cases into its own error type.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    /// Movement amounts must be strictly positive.
    #[error("Movement amount must be positive, got {0}")]
    NonPositiveAmount(Money),

    /// A payment may not drive the balance negative.
    #[error("Payment of {amount} exceeds current balance {balance}")]
    PaymentExceedsBalance {
        /// Attempted payment amount.
        amount: Money,
        /// Balance at the time of the attempt.
        balance: Money,
    },

    /// Debts start at zero or above.
    #[error("Initial balance must not be negative, got {0}")]
    NegativeInitialBalance(Money),
}
