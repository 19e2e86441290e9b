//! Earnings domain types.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use tienda_shared::types::{Money, ProductId};

/// Product data needed to price an order item.
#[derive(Debug, Clone)]
pub struct ProductInfo {
    /// Product identifier.
    pub id: ProductId,
    /// Display name, carried through to the report.
    pub name: String,
    /// What the store paid per unit.
    pub purchase_price: Money,
    /// The configured sale price per unit.
    pub sale_price: Money,
}

/// One order item as seen by the aggregator.
#[derive(Debug, Clone, Copy)]
pub struct SoldItem {
    /// Product sold.
    pub product_id: ProductId,
    /// Units sold; fractional quantities are allowed (e.g. kilograms).
    pub quantity: Decimal,
    /// Unit price actually charged at sale time. Zero means the price was
    /// never recorded and the item is treated as a total loss.
    pub real_unit_price: Money,
}

/// Unrounded earnings figures for a single order item.
///
/// Intermediate value only; aggregates keep full precision until the
/// report is built.
#[derive(Debug, Clone)]
pub struct ItemEarnings {
    /// Product identifier.
    pub product_id: ProductId,
    /// Product name.
    pub product_name: String,
    /// Units sold.
    pub quantity: Decimal,
    /// Purchase price per unit.
    pub purchase_price: Money,
    /// Configured sale price per unit.
    pub expected_unit_price: Money,
    /// Unit price actually charged.
    pub real_unit_price: Money,
    /// Profit per unit at the configured sale price.
    pub expected_profit_per_unit: Money,
    /// Profit per unit at the price actually charged.
    pub actual_profit_per_unit: Money,
    /// Actual profit across the item's quantity.
    pub total_actual_profit: Money,
    /// Actual minus expected profit, across the quantity. Negative when the
    /// item sold under the configured price.
    pub profit_difference_total: Money,
    /// Cost not recovered because the sale price was zero/unrecorded.
    pub loss_amount: Money,
}

/// Per-product aggregate over a day or period, rounded for output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductEarnings {
    /// Product name.
    pub product_name: String,
    /// Total units sold.
    pub quantity_sold: Decimal,
    /// Unit price actually charged (first observed).
    pub real_unit_price: Money,
    /// Configured sale price per unit.
    pub expected_unit_price: Money,
    /// Purchase price per unit.
    pub purchase_price: Money,
    /// Profit per unit at the configured sale price.
    pub expected_profit_per_unit: Money,
    /// Profit per unit at the price actually charged (first observed).
    pub actual_profit_per_unit: Money,
    /// Total actual profit.
    pub total_actual_profit: Money,
    /// Total actual-vs-expected profit difference.
    pub profit_difference_total: Money,
    /// Total loss from unpriced items.
    pub loss: Money,
}

/// Earnings for a single day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyEarnings {
    /// Per-product breakdown.
    pub earnings_by_product: BTreeMap<ProductId, ProductEarnings>,
    /// Total actual profit for the day.
    pub total_profit_day: Money,
    /// Total loss for the day.
    pub total_losses_day: Money,
    /// Total returns for the day.
    pub total_returns_day: Money,
    /// Profit net of losses and returns.
    pub net_profit_day: Money,
}

/// Period-level summary across all days in the window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EarningsSummary {
    /// Per-product breakdown accumulated over the whole window.
    pub earnings_by_product: BTreeMap<ProductId, ProductEarnings>,
    /// Total actual profit for the period.
    pub total_profit_period: Money,
    /// Total losses for the period.
    pub total_losses_period: Money,
    /// Total returns for the period.
    pub total_returns_period: Money,
    /// Profit net of losses and returns.
    pub net_profit_after_returns: Money,
    /// First day of the window.
    pub start_date: NaiveDate,
    /// Last day of the window.
    pub end_date: NaiveDate,
    /// Number of days in the window that had at least one sale.
    pub days_with_sales: usize,
}

/// Full earnings report: per-day breakdown plus period summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EarningsReport {
    /// Per-day breakdown, keyed by store-local calendar date.
    pub daily_breakdown: BTreeMap<NaiveDate, DailyEarnings>,
    /// Period summary.
    pub summary: EarningsSummary,
}
