//! Earnings aggregation repository.
//!
//! Read-only. Fetches every sale in a store-local day window together with
//! its order items and products, then hands the rows to the pure
//! aggregation in `tienda_core::earnings`. One bulk query per table; no
//! per-row round trips.

use std::collections::HashMap;

use chrono::NaiveDate;
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter};
use tienda_core::earnings::{
    compute_item_earnings, EarningsAccumulator, EarningsReport, ProductInfo, SoldItem,
};
use tienda_shared::types::{Money, ProductId};
use tienda_shared::{AppError, StoreClock};

use crate::entities::{order_items, products, sales};
use crate::repositories::{local_day_window, returns::ReturnsError, ReturnsRepository};

/// Error types for earnings queries.
#[derive(Debug, thiserror::Error)]
pub enum EarningsError {
    /// Start date is after end date.
    #[error("Invalid date range: {start} is after {end}")]
    InvalidDateRange {
        /// Requested start of the window.
        start: NaiveDate,
        /// Requested end of the window.
        end: NaiveDate,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<EarningsError> for AppError {
    fn from(err: EarningsError) -> Self {
        match err {
            EarningsError::InvalidDateRange { .. } => Self::Validation(err.to_string()),
            EarningsError::Database(_) => Self::Database(err.to_string()),
        }
    }
}

impl From<ReturnsError> for EarningsError {
    fn from(err: ReturnsError) -> Self {
        match err {
            ReturnsError::Database(db) => Self::Database(db),
            // Read paths of the returns repository only fail on the database.
            other => Self::Database(DbErr::Custom(other.to_string())),
        }
    }
}

/// Earnings repository.
#[derive(Debug, Clone)]
pub struct EarningsRepository {
    db: DatabaseConnection,
    returns: ReturnsRepository,
}

impl EarningsRepository {
    /// Creates a new earnings repository.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        let returns = ReturnsRepository::new(db.clone());
        Self { db, returns }
    }

    /// Earnings report for a single store-local day.
    ///
    /// # Errors
    ///
    /// Returns `Database` on query failure.
    pub async fn earnings_per_day(&self, day: NaiveDate) -> Result<EarningsReport, EarningsError> {
        self.earnings_by_date_range(day, day).await
    }

    /// Earnings report over an inclusive store-local day range.
    ///
    /// Days without sales are absent from the breakdown. Returns are
    /// subtracted only on days that had at least one sale.
    ///
    /// # Errors
    ///
    /// `InvalidDateRange` when `start > end`; `Database` on query failure.
    pub async fn earnings_by_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<EarningsReport, EarningsError> {
        if start > end {
            return Err(EarningsError::InvalidDateRange { start, end });
        }

        let (lo, hi) = local_day_window(start, end);
        let sale_rows = sales::Entity::find()
            .filter(sales::Column::Date.gte(lo))
            .filter(sales::Column::Date.lt(hi))
            .all(&self.db)
            .await?;

        let order_ids: Vec<_> = sale_rows.iter().map(|s| s.order_id).collect();
        let item_rows = if order_ids.is_empty() {
            Vec::new()
        } else {
            order_items::Entity::find()
                .filter(order_items::Column::OrderId.is_in(order_ids))
                .all(&self.db)
                .await?
        };

        let product_map = self.fetch_products(&item_rows).await?;

        let mut items_by_order: HashMap<uuid::Uuid, Vec<&order_items::Model>> = HashMap::new();
        for item in &item_rows {
            items_by_order.entry(item.order_id).or_default().push(item);
        }

        let mut acc = EarningsAccumulator::new(start, end);
        for sale in &sale_rows {
            let day = StoreClock::local_date(&sale.date);
            let Some(items) = items_by_order.get(&sale.order_id) else {
                continue;
            };
            for item in items {
                let Some(product) = product_map.get(&item.product_id) else {
                    // Product rows can be deleted out from under old sales;
                    // such items cannot be priced and are skipped.
                    continue;
                };
                let sold = SoldItem {
                    product_id: ProductId::from_uuid(item.product_id),
                    quantity: item.quantity,
                    real_unit_price: Money::new(item.price_unit),
                };
                if let Some(earnings) = compute_item_earnings(&sold, product) {
                    acc.record_item(day, &earnings);
                }
            }
        }

        let sale_days: Vec<_> = acc.sale_days().collect();
        for day in sale_days {
            let returned = self.returns.total_returns_on(day).await?;
            if !returned.is_zero() {
                acc.record_returns(day, returned);
            }
        }

        Ok(acc.finish())
    }

    /// One bulk fetch of every product referenced by the given items.
    async fn fetch_products(
        &self,
        items: &[order_items::Model],
    ) -> Result<HashMap<uuid::Uuid, ProductInfo>, DbErr> {
        let mut product_ids: Vec<_> = items.iter().map(|i| i.product_id).collect();
        product_ids.sort_unstable();
        product_ids.dedup();
        if product_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = products::Entity::find()
            .filter(products::Column::Id.is_in(product_ids))
            .all(&self.db)
            .await?;
        Ok(rows
            .into_iter()
            .map(|p| {
                (
                    p.id,
                    ProductInfo {
                        id: ProductId::from_uuid(p.id),
                        name: p.name,
                        purchase_price: Money::new(p.purchase_price),
                        sale_price: Money::new(p.sale_price),
                    },
                )
            })
            .collect())
    }
}
