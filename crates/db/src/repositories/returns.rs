//! Customer returns repository.
//!
//! Returns are refunds of previously sold merchandise. They are recorded
//! standalone (not linked to a sale) and aggregated by store-local day
//! when computing net earnings.

use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use tienda_shared::types::{Money, ReturnId};
use tienda_shared::{AppError, StoreClock};

use crate::entities::returns;
use crate::repositories::local_day_window;

/// Error types for return operations.
#[derive(Debug, thiserror::Error)]
pub enum ReturnsError {
    /// Return not found.
    #[error("Return not found: {0}")]
    NotFound(ReturnId),

    /// Returned amount must be positive.
    #[error("Returned amount must be positive, got {0}")]
    NonPositiveAmount(Money),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<ReturnsError> for AppError {
    fn from(err: ReturnsError) -> Self {
        match err {
            ReturnsError::NotFound(_) => Self::NotFound(err.to_string()),
            ReturnsError::NonPositiveAmount(_) => Self::Validation(err.to_string()),
            ReturnsError::Database(_) => Self::Database(err.to_string()),
        }
    }
}

/// Returns repository.
#[derive(Debug, Clone)]
pub struct ReturnsRepository {
    db: DatabaseConnection,
}

impl ReturnsRepository {
    /// Creates a new returns repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records a return, stamped with the store-local current time.
    ///
    /// # Errors
    ///
    /// `NonPositiveAmount` when `amount` is zero or negative.
    pub async fn create_return(&self, amount: Money) -> Result<returns::Model, ReturnsError> {
        if !amount.amount.is_sign_positive() || amount.is_zero() {
            return Err(ReturnsError::NonPositiveAmount(amount));
        }

        let model = returns::ActiveModel {
            id: Set(ReturnId::new().into_inner()),
            amount_returned: Set(amount.amount),
            return_date: Set(StoreClock::now()),
        }
        .insert(&self.db)
        .await?;
        tracing::info!(return_id = %model.id, amount = %amount, "return recorded");
        Ok(model)
    }

    /// Gets a return by ID.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown return.
    pub async fn get_return(&self, return_id: ReturnId) -> Result<returns::Model, ReturnsError> {
        returns::Entity::find_by_id(return_id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(ReturnsError::NotFound(return_id))
    }

    /// Lists all returns, newest first.
    pub async fn list_returns(&self) -> Result<Vec<returns::Model>, ReturnsError> {
        let rows = returns::Entity::find()
            .order_by_desc(returns::Column::ReturnDate)
            .all(&self.db)
            .await?;
        Ok(rows)
    }

    /// Deletes a return.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown return.
    pub async fn delete_return(&self, return_id: ReturnId) -> Result<returns::Model, ReturnsError> {
        let model = self.get_return(return_id).await?;
        returns::Entity::delete_by_id(model.id)
            .exec(&self.db)
            .await?;
        Ok(model)
    }

    /// Total returned on one store-local day. Zero when nothing was returned.
    pub async fn total_returns_on(&self, day: NaiveDate) -> Result<Money, ReturnsError> {
        self.total_returns_between(day, day).await
    }

    /// Total returned over an inclusive store-local day range.
    /// Zero when nothing was returned.
    pub async fn total_returns_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Money, ReturnsError> {
        let (lo, hi) = local_day_window(start, end);
        let rows = returns::Entity::find()
            .filter(returns::Column::ReturnDate.gte(lo))
            .filter(returns::Column::ReturnDate.lt(hi))
            .all(&self.db)
            .await?;
        Ok(rows.iter().map(|r| Money::new(r.amount_returned)).sum())
    }
}
