//! Database-backed enum types.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use tienda_core::ledger::MovementKind;

/// Kind of a debt movement, as stored in the `movement_type` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum MovementType {
    /// Payment against the debt.
    #[sea_orm(string_value = "PAYMENT")]
    Payment,
    /// Debt increase (new balance taken on).
    #[sea_orm(string_value = "NEW_BALANCE")]
    NewBalance,
}

impl From<MovementKind> for MovementType {
    fn from(kind: MovementKind) -> Self {
        match kind {
            MovementKind::Payment => Self::Payment,
            MovementKind::NewBalance => Self::NewBalance,
        }
    }
}

impl From<MovementType> for MovementKind {
    fn from(kind: MovementType) -> Self {
        match kind {
            MovementType::Payment => Self::Payment,
            MovementType::NewBalance => Self::NewBalance,
        }
    }
}

/// Order lifecycle status, as stored in the `status` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum OrderStatus {
    /// Order is open and may still change.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Order has been confirmed by the customer.
    #[sea_orm(string_value = "confirmed")]
    Confirmed,
    /// Order has been invoiced into a sale.
    #[sea_orm(string_value = "completed")]
    Completed,
    /// Order was canceled.
    #[sea_orm(string_value = "canceled")]
    Canceled,
}
