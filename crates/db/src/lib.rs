//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions for the store schema
//! - Repository abstractions for data access (debt ledger, sales,
//!   earnings aggregation, returns)
//! - Database migrations

pub mod entities;
pub mod migration;
pub mod repositories;

pub use repositories::{DebtRepository, EarningsRepository, ReturnsRepository, SaleRepository};

use sea_orm::{Database, DatabaseConnection, DbErr};

/// Establishes a connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}
