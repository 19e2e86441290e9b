//! Sale lifecycle repository.
//!
//! A sale is created from exactly one order, exactly once; creating it
//! decrements product stock (floored at zero) and marks the order
//! completed. Deleting a sale restores stock but leaves the order status
//! as-is, matching the established behavior.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tienda_shared::types::{CustomerId, Money, OrderId, ProductId, SaleId};
use tienda_shared::{AppError, StoreClock};

use crate::entities::{
    order_items, orders, products, sales, sea_orm_active_enums::OrderStatus,
};

/// Error types for sale operations.
#[derive(Debug, thiserror::Error)]
pub enum SaleError {
    /// Sale not found.
    #[error("Sale not found: {0}")]
    NotFound(SaleId),

    /// Order not found.
    #[error("Order not found: {0}")]
    OrderNotFound(OrderId),

    /// Product referenced by an order item not found.
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    /// The order was already invoiced into a sale.
    #[error("Order {0} was already invoiced")]
    OrderAlreadyCompleted(OrderId),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<SaleError> for AppError {
    fn from(err: SaleError) -> Self {
        match err {
            SaleError::NotFound(_) | SaleError::OrderNotFound(_) | SaleError::ProductNotFound(_) => {
                Self::NotFound(err.to_string())
            }
            SaleError::OrderAlreadyCompleted(_) => Self::BusinessRule(err.to_string()),
            SaleError::Database(_) => Self::Database(err.to_string()),
        }
    }
}

/// Input for creating a sale.
#[derive(Debug, Clone)]
pub struct CreateSaleInput {
    /// The order being invoiced.
    pub order_id: OrderId,
    /// Amount paid by bank transfer; the rest stays as the sale balance.
    pub transfer_payment: Option<Money>,
}

/// Sale repository.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    db: DatabaseConnection,
}

impl SaleRepository {
    /// Creates a new sale repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Invoices an order into a sale.
    ///
    /// In one transaction: verifies the order is still open, locks each
    /// item's product row and decrements stock (floored at zero, logged
    /// when flooring fires), inserts the sale, and marks the order
    /// completed.
    ///
    /// # Errors
    ///
    /// `OrderNotFound` for an unknown order, `OrderAlreadyCompleted` when
    /// the order was invoiced before, `ProductNotFound` when an item
    /// references a missing product.
    pub async fn create_sale(&self, input: CreateSaleInput) -> Result<sales::Model, SaleError> {
        let txn = self.db.begin().await?;

        let order = orders::Entity::find_by_id(input.order_id.into_inner())
            .one(&txn)
            .await?
            .ok_or(SaleError::OrderNotFound(input.order_id))?;
        if order.status == OrderStatus::Completed {
            return Err(SaleError::OrderAlreadyCompleted(input.order_id));
        }

        let items = order_items::Entity::find()
            .filter(order_items::Column::OrderId.eq(order.id))
            .all(&txn)
            .await?;

        for item in &items {
            Self::decrement_stock(&txn, item).await?;
        }

        let total: Money = items.iter().map(|i| Money::new(i.subtotal)).sum();
        let transfer_payment = input.transfer_payment.unwrap_or(Money::ZERO);
        let balance = total - transfer_payment;

        let sale = sales::ActiveModel {
            id: Set(SaleId::new().into_inner()),
            order_id: Set(order.id),
            date: Set(StoreClock::now()),
            transfer_payment: Set(transfer_payment.amount),
            total: Set(total.amount),
            balance: Set(balance.amount),
        }
        .insert(&txn)
        .await?;

        let mut active: orders::ActiveModel = order.into();
        active.status = Set(OrderStatus::Completed);
        active.update(&txn).await?;

        txn.commit().await?;
        tracing::info!(sale_id = %sale.id, order_id = %input.order_id, "sale created");
        Ok(sale)
    }

    /// Locks an item's product row and decrements stock, flooring at zero.
    ///
    /// A sale is never blocked by missing stock; the floor only keeps the
    /// displayed quantity non-negative at the cost of the true magnitude.
    async fn decrement_stock(
        txn: &DatabaseTransaction,
        item: &order_items::Model,
    ) -> Result<(), SaleError> {
        let product = products::Entity::find_by_id(item.product_id)
            .lock_exclusive()
            .one(txn)
            .await?
            .ok_or_else(|| SaleError::ProductNotFound(ProductId::from_uuid(item.product_id)))?;

        if product.stock <= rust_decimal::Decimal::ZERO {
            return Ok(());
        }

        let remaining = product.stock - item.quantity;
        let floored = remaining.max(rust_decimal::Decimal::ZERO);
        if floored != remaining {
            tracing::warn!(
                product_id = %product.id,
                stock = %product.stock,
                quantity = %item.quantity,
                "stock floored at zero during sale creation"
            );
        }

        let mut active: products::ActiveModel = product.into();
        active.stock = Set(floored);
        active.update(txn).await?;
        Ok(())
    }

    /// Deletes a sale and restores the stock of its order's products.
    ///
    /// The order keeps its `completed` status; only the sale row and the
    /// stock adjustment are undone.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown sale.
    pub async fn delete_sale(&self, sale_id: SaleId) -> Result<sales::Model, SaleError> {
        let txn = self.db.begin().await?;

        let sale = sales::Entity::find_by_id(sale_id.into_inner())
            .one(&txn)
            .await?
            .ok_or(SaleError::NotFound(sale_id))?;

        let items = order_items::Entity::find()
            .filter(order_items::Column::OrderId.eq(sale.order_id))
            .all(&txn)
            .await?;

        for item in &items {
            // A product deleted since the sale is skipped; there is nothing
            // to restore stock onto.
            if let Some(product) = products::Entity::find_by_id(item.product_id)
                .lock_exclusive()
                .one(&txn)
                .await?
            {
                let restored = product.stock + item.quantity;
                let mut active: products::ActiveModel = product.into();
                active.stock = Set(restored);
                active.update(&txn).await?;
            }
        }

        sales::Entity::delete_by_id(sale.id).exec(&txn).await?;
        txn.commit().await?;
        tracing::info!(sale_id = %sale_id, "sale deleted, stock restored");
        Ok(sale)
    }

    /// Updates a sale's transfer payment, recomputing its balance.
    ///
    /// The associated order cannot be changed.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown sale.
    pub async fn update_sale(
        &self,
        sale_id: SaleId,
        transfer_payment: Money,
    ) -> Result<sales::Model, SaleError> {
        let sale = sales::Entity::find_by_id(sale_id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(SaleError::NotFound(sale_id))?;

        let balance = Money::new(sale.total) - transfer_payment;
        let mut active: sales::ActiveModel = sale.into();
        active.transfer_payment = Set(transfer_payment.amount);
        active.balance = Set(balance.amount);
        let sale = active.update(&self.db).await?;
        Ok(sale)
    }

    /// Gets a sale by ID.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown sale.
    pub async fn get_sale(&self, sale_id: SaleId) -> Result<sales::Model, SaleError> {
        sales::Entity::find_by_id(sale_id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(SaleError::NotFound(sale_id))
    }

    /// Lists all sales, newest first.
    pub async fn list_sales(&self) -> Result<Vec<sales::Model>, SaleError> {
        let sales = sales::Entity::find()
            .order_by_desc(sales::Column::Date)
            .all(&self.db)
            .await?;
        Ok(sales)
    }

    /// Lists a customer's sales, newest first.
    pub async fn sales_by_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<sales::Model>, SaleError> {
        let sales = sales::Entity::find()
            .inner_join(orders::Entity)
            .filter(orders::Column::CustomerId.eq(customer_id.into_inner()))
            .order_by_desc(sales::Column::Date)
            .all(&self.db)
            .await?;
        Ok(sales)
    }
}
