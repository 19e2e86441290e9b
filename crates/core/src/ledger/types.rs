//! Ledger domain types.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use tienda_shared::types::Money;

/// Kind of a debt movement.
///
/// A PAYMENT reduces the debt's current balance; a NEW_BALANCE entry
/// increases it (the customer took on more debt).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MovementKind {
    /// Payment against the debt.
    Payment,
    /// Debt increase (new balance taken on).
    NewBalance,
}

impl MovementKind {
    /// The wire/database representation of this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Payment => "PAYMENT",
            Self::NewBalance => "NEW_BALANCE",
        }
    }
}

impl std::fmt::Display for MovementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A movement as needed for history replay: kind, amount, and when.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MovementRecord {
    /// Movement kind.
    pub kind: MovementKind,
    /// Movement amount (always positive).
    pub amount: Money,
    /// When the movement happened.
    pub date: DateTime<FixedOffset>,
}

/// One point of a reconstructed balance-over-time sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BalancePoint {
    /// Timestamp of the movement that produced this balance.
    pub date: DateTime<FixedOffset>,
    /// Balance after applying the movement.
    pub balance: Money,
    /// Kind of the movement applied.
    pub movement_kind: MovementKind,
    /// Amount of the movement applied.
    pub movement_amount: Money,
}
