//! `SeaORM` entity definitions for the store schema.

pub mod customers;
pub mod debt_movements;
pub mod debts;
pub mod order_items;
pub mod orders;
pub mod products;
pub mod returns;
pub mod sales;
pub mod sea_orm_active_enums;
