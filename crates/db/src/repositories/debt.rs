//! Debt ledger repository.
//!
//! Owns the balance invariants for customer debts: every mutation locks the
//! debt row (`SELECT ... FOR UPDATE`) inside a transaction before reading
//! the balance it will overwrite, so concurrent movements on the same debt
//! serialize instead of computing from stale values. Balance arithmetic is
//! delegated to `tienda_core::ledger` so live updates and history replay
//! share one rule.

use chrono::{DateTime, FixedOffset};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, SqlErr, TransactionTrait,
};
use tienda_core::ledger::{
    self, BalancePoint, LedgerError, MovementKind, MovementRecord,
};
use tienda_shared::types::{CustomerId, DebtId, Money, MovementId};
use tienda_shared::{AppError, StoreClock};

use crate::entities::{debt_movements, debts, sea_orm_active_enums::MovementType};

/// Error types for debt ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum DebtError {
    /// Debt not found.
    #[error("Debt not found: {0}")]
    NotFound(DebtId),

    /// Customer already has a debt.
    #[error("Customer {0} already has a registered debt")]
    AlreadyExists(CustomerId),

    /// Ledger precondition violated (non-positive amount, payment bound).
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<DebtError> for AppError {
    fn from(err: DebtError) -> Self {
        match err {
            DebtError::NotFound(_) => Self::NotFound(err.to_string()),
            DebtError::AlreadyExists(_) => Self::Conflict(err.to_string()),
            DebtError::Ledger(_) => Self::BusinessRule(err.to_string()),
            DebtError::Database(_) => Self::Database(err.to_string()),
        }
    }
}

/// Input for registering a movement.
#[derive(Debug, Clone)]
pub struct RegisterMovementInput {
    /// Movement kind.
    pub kind: MovementKind,
    /// Movement amount; must be strictly positive.
    pub amount: Money,
    /// Optional short description.
    pub description: Option<String>,
    /// Optional free-form notes.
    pub notes: Option<String>,
}

/// Partial update for a debt.
///
/// Only fields that are present are touched. A balance change is never
/// applied silently: it is converted into a movement of the signed
/// difference so the audit trail stays consistent with the balance.
#[derive(Debug, Clone, Default)]
pub struct DebtPatch {
    /// New current balance to correct to.
    pub current_balance: Option<Money>,
    /// Description for the synthesized adjustment movement.
    pub description: Option<String>,
}

/// Filter options for listing movements.
#[derive(Debug, Clone, Default)]
pub struct MovementFilter {
    /// Filter by owning debt.
    pub debt_id: Option<DebtId>,
    /// Filter by movement kind.
    pub kind: Option<MovementKind>,
    /// Minimum amount (inclusive).
    pub min_amount: Option<Money>,
    /// Maximum amount (inclusive).
    pub max_amount: Option<Money>,
    /// Earliest movement date (inclusive).
    pub date_from: Option<DateTime<FixedOffset>>,
    /// Latest movement date (inclusive).
    pub date_to: Option<DateTime<FixedOffset>>,
}

/// Result of a movement registration.
#[derive(Debug, Clone)]
pub struct MovementResult {
    /// The debt after the movement was applied.
    pub debt: debts::Model,
    /// The movement that was created.
    pub movement: debt_movements::Model,
    /// The resulting balance.
    pub new_balance: Money,
}

/// A debt together with its movements.
#[derive(Debug, Clone)]
pub struct DebtWithMovements {
    /// Debt header.
    pub debt: debts::Model,
    /// Movements, newest first.
    pub movements: Vec<debt_movements::Model>,
    /// Timestamp of the most recent movement, if any.
    pub last_movement_date: Option<DateTime<FixedOffset>>,
}

/// Debt ledger repository.
#[derive(Debug, Clone)]
pub struct DebtRepository {
    db: DatabaseConnection,
}

impl DebtRepository {
    /// Creates a new debt repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a new debt for a customer.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyExists` if the customer already has a debt, or a
    /// ledger error if the initial balance is negative.
    pub async fn create_debt(
        &self,
        customer_id: CustomerId,
        initial_balance: Money,
    ) -> Result<debts::Model, DebtError> {
        if initial_balance.is_negative() {
            return Err(LedgerError::NegativeInitialBalance(initial_balance).into());
        }

        let existing = debts::Entity::find()
            .filter(debts::Column::CustomerId.eq(customer_id.into_inner()))
            .one(&self.db)
            .await?;
        if existing.is_some() {
            return Err(DebtError::AlreadyExists(customer_id));
        }

        let now = StoreClock::now();
        let inserted = debts::ActiveModel {
            id: Set(DebtId::new().into_inner()),
            customer_id: Set(customer_id.into_inner()),
            current_balance: Set(initial_balance.amount),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await;

        // Two concurrent creates can both pass the read above; the loser
        // hits the customer_id unique constraint and gets the same error
        // as the sequential duplicate case.
        let debt = match inserted {
            Ok(debt) => debt,
            Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                return Err(DebtError::AlreadyExists(customer_id));
            }
            Err(err) => return Err(err.into()),
        };

        tracing::info!(debt_id = %debt.id, customer_id = %customer_id, "debt created");
        Ok(debt)
    }

    /// Registers a movement and returns the updated debt, the movement, and
    /// the resulting balance.
    ///
    /// The debt row is locked for the whole transaction, so two concurrent
    /// registrations on the same debt serialize.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown debt; a ledger error when the amount is not
    /// positive or a payment exceeds the current balance.
    pub async fn register_movement(
        &self,
        debt_id: DebtId,
        input: RegisterMovementInput,
    ) -> Result<MovementResult, DebtError> {
        let txn = self.db.begin().await?;
        let (debt, movement) = Self::apply_movement_locked(
            &txn,
            debt_id,
            input.kind,
            input.amount,
            input.description,
            input.notes,
        )
        .await?;
        txn.commit().await?;

        let new_balance = Money::new(debt.current_balance);
        Ok(MovementResult {
            debt,
            movement,
            new_balance,
        })
    }

    /// Locks the debt, validates, inserts the movement, and applies its
    /// balance effect. Everything runs inside the caller's transaction.
    async fn apply_movement_locked(
        txn: &DatabaseTransaction,
        debt_id: DebtId,
        kind: MovementKind,
        amount: Money,
        description: Option<String>,
        notes: Option<String>,
    ) -> Result<(debts::Model, debt_movements::Model), DebtError> {
        let debt = debts::Entity::find_by_id(debt_id.into_inner())
            .lock_exclusive()
            .one(txn)
            .await?
            .ok_or(DebtError::NotFound(debt_id))?;

        ledger::validate_amount(amount)?;
        let balance = Money::new(debt.current_balance);
        if kind == MovementKind::Payment {
            ledger::validate_payment(balance, amount)?;
        }

        let now = StoreClock::now();
        let movement = debt_movements::ActiveModel {
            id: Set(MovementId::new().into_inner()),
            debt_id: Set(debt_id.into_inner()),
            movement_type: Set(MovementType::from(kind)),
            amount: Set(amount.amount),
            description: Set(description),
            notes: Set(notes),
            movement_date: Set(now),
        }
        .insert(txn)
        .await?;

        let new_balance = ledger::apply_movement(balance, kind, amount);
        let mut active: debts::ActiveModel = debt.into();
        active.current_balance = Set(new_balance.amount);
        active.updated_at = Set(now);
        let debt = active.update(txn).await?;

        Ok((debt, movement))
    }

    /// Deletes a movement, reversing its balance effect exactly.
    ///
    /// Both the movement and its owning debt are locked before either is
    /// read, to avoid racing concurrent registrations or deletions on the
    /// same debt. A reversal that would push the balance below zero is
    /// clamped to zero; the discarded magnitude is logged.
    ///
    /// Returns `false` when the movement (or its debt) does not exist.
    pub async fn delete_movement(&self, movement_id: MovementId) -> Result<bool, DebtError> {
        let txn = self.db.begin().await?;

        let Some(movement) = debt_movements::Entity::find_by_id(movement_id.into_inner())
            .lock_exclusive()
            .one(&txn)
            .await?
        else {
            return Ok(false);
        };

        let Some(debt) = debts::Entity::find_by_id(movement.debt_id)
            .lock_exclusive()
            .one(&txn)
            .await?
        else {
            return Ok(false);
        };

        let kind = MovementKind::from(movement.movement_type);
        let reversal = ledger::reverse_movement(
            Money::new(debt.current_balance),
            kind,
            Money::new(movement.amount),
        );
        if reversal.clamped() {
            tracing::warn!(
                debt_id = %debt.id,
                movement_id = %movement_id,
                true_balance = %reversal.unclamped,
                "balance clamped to zero after movement deletion"
            );
        }

        debt_movements::Entity::delete_by_id(movement_id.into_inner())
            .exec(&txn)
            .await?;

        let mut active: debts::ActiveModel = debt.into();
        active.current_balance = Set(reversal.balance.amount);
        active.updated_at = Set(StoreClock::now());
        active.update(&txn).await?;

        txn.commit().await?;
        Ok(true)
    }

    /// Applies a partial update to a debt.
    ///
    /// A balance correction goes through the same movement-application path
    /// as `register_movement`, synthesizing a NEW_BALANCE or PAYMENT
    /// movement of the signed difference. `updated_at` is bumped even when
    /// the balance is unchanged.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown debt; a ledger error when the correction
    /// target is below zero (the synthesized payment would exceed the
    /// balance).
    pub async fn update_debt(
        &self,
        debt_id: DebtId,
        patch: DebtPatch,
    ) -> Result<debts::Model, DebtError> {
        let txn = self.db.begin().await?;

        let debt = debts::Entity::find_by_id(debt_id.into_inner())
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(DebtError::NotFound(debt_id))?;

        let current = Money::new(debt.current_balance);
        let target = patch.current_balance;

        let updated = if let Some(target) = target.filter(|t| *t != current) {
            let difference = target - current;
            let kind = if difference.is_negative() {
                MovementKind::Payment
            } else {
                MovementKind::NewBalance
            };
            let description = patch
                .description
                .unwrap_or_else(|| "Manual balance adjustment".to_string());

            let (debt, _movement) = Self::apply_movement_locked(
                &txn,
                debt_id,
                kind,
                difference.abs(),
                Some(description),
                Some("Manual balance adjustment".to_string()),
            )
            .await?;
            debt
        } else {
            let mut active: debts::ActiveModel = debt.into();
            active.updated_at = Set(StoreClock::now());
            active.update(&txn).await?
        };

        txn.commit().await?;
        Ok(updated)
    }

    /// Reconstructs a customer's balance-over-time sequence.
    ///
    /// Pure replay of the movement log in ascending time order from a zero
    /// starting balance, with no clamping. The debt's `initial_balance` does
    /// not participate, so the final point can disagree with the live
    /// balance when the debt was created with a non-zero initial balance.
    /// Returns an empty history when the customer has no debt.
    pub async fn get_balance_history(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<BalancePoint>, DebtError> {
        let Some(debt) = debts::Entity::find()
            .filter(debts::Column::CustomerId.eq(customer_id.into_inner()))
            .one(&self.db)
            .await?
        else {
            return Ok(Vec::new());
        };

        let movements = debt_movements::Entity::find()
            .filter(debt_movements::Column::DebtId.eq(debt.id))
            .order_by_asc(debt_movements::Column::MovementDate)
            .order_by_asc(debt_movements::Column::Id)
            .all(&self.db)
            .await?;

        let records = movements.into_iter().map(|m| MovementRecord {
            kind: MovementKind::from(m.movement_type),
            amount: Money::new(m.amount),
            date: m.movement_date,
        });

        Ok(ledger::replay_history(records).collect())
    }

    /// Deletes a debt and all its movements in one transaction.
    ///
    /// Returns `false` when the debt does not exist.
    pub async fn delete_debt(&self, debt_id: DebtId) -> Result<bool, DebtError> {
        let txn = self.db.begin().await?;

        let Some(debt) = debts::Entity::find_by_id(debt_id.into_inner())
            .lock_exclusive()
            .one(&txn)
            .await?
        else {
            return Ok(false);
        };

        debt_movements::Entity::delete_many()
            .filter(debt_movements::Column::DebtId.eq(debt.id))
            .exec(&txn)
            .await?;
        debts::Entity::delete_by_id(debt.id).exec(&txn).await?;

        txn.commit().await?;
        tracing::info!(debt_id = %debt_id, "debt deleted with its movements");
        Ok(true)
    }

    /// Gets a debt with its movements and last movement date.
    ///
    /// # Errors
    ///
    /// `NotFound` when the debt does not exist.
    pub async fn get_debt(&self, debt_id: DebtId) -> Result<DebtWithMovements, DebtError> {
        let debt = debts::Entity::find_by_id(debt_id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(DebtError::NotFound(debt_id))?;
        self.with_movements(debt).await
    }

    /// Gets a customer's debt with its movements, if the customer has one.
    pub async fn get_debt_by_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Option<DebtWithMovements>, DebtError> {
        let Some(debt) = debts::Entity::find()
            .filter(debts::Column::CustomerId.eq(customer_id.into_inner()))
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };
        self.with_movements(debt).await.map(Some)
    }

    async fn with_movements(&self, debt: debts::Model) -> Result<DebtWithMovements, DebtError> {
        let movements = debt_movements::Entity::find()
            .filter(debt_movements::Column::DebtId.eq(debt.id))
            .order_by_desc(debt_movements::Column::MovementDate)
            .order_by_desc(debt_movements::Column::Id)
            .all(&self.db)
            .await?;
        let last_movement_date = movements.first().map(|m| m.movement_date);
        Ok(DebtWithMovements {
            debt,
            movements,
            last_movement_date,
        })
    }

    /// Lists all debts, most recently updated first.
    pub async fn list_debts(&self) -> Result<Vec<debts::Model>, DebtError> {
        let debts = debts::Entity::find()
            .order_by_desc(debts::Column::UpdatedAt)
            .all(&self.db)
            .await?;
        Ok(debts)
    }

    /// Lists movements with optional filters, newest first.
    pub async fn list_movements(
        &self,
        filter: MovementFilter,
    ) -> Result<Vec<debt_movements::Model>, DebtError> {
        let mut query = debt_movements::Entity::find();

        if let Some(debt_id) = filter.debt_id {
            query = query.filter(debt_movements::Column::DebtId.eq(debt_id.into_inner()));
        }
        if let Some(kind) = filter.kind {
            query = query.filter(debt_movements::Column::MovementType.eq(MovementType::from(kind)));
        }
        if let Some(min) = filter.min_amount {
            query = query.filter(debt_movements::Column::Amount.gte(min.amount));
        }
        if let Some(max) = filter.max_amount {
            query = query.filter(debt_movements::Column::Amount.lte(max.amount));
        }
        if let Some(from) = filter.date_from {
            query = query.filter(debt_movements::Column::MovementDate.gte(from));
        }
        if let Some(to) = filter.date_to {
            query = query.filter(debt_movements::Column::MovementDate.lte(to));
        }

        let movements = query
            .order_by_desc(debt_movements::Column::MovementDate)
            .order_by_desc(debt_movements::Column::Id)
            .all(&self.db)
            .await?;
        Ok(movements)
    }
}
