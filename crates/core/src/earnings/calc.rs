//! Per-item earnings math and window accumulation.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tienda_shared::types::{Money, ProductId};

use super::types::{
    DailyEarnings, EarningsReport, EarningsSummary, ItemEarnings, ProductEarnings, ProductInfo,
    SoldItem,
};

/// Computes the earnings figures for one order item.
///
/// Returns `None` for zero-quantity items, which contribute nothing.
///
/// A zero real unit price means the sale price was never recorded: the whole
/// cost of the item counts as loss, actual profit is zero, and the shortfall
/// against expectations is the entire expected profit.
#[must_use]
pub fn compute_item_earnings(item: &SoldItem, product: &ProductInfo) -> Option<ItemEarnings> {
    if item.quantity.is_zero() {
        return None;
    }

    let quantity = item.quantity;
    let purchase_price = product.purchase_price;
    let expected_unit_price = product.sale_price;
    let real_unit_price = item.real_unit_price;
    let expected_profit_per_unit = expected_unit_price - purchase_price;

    let earnings = if real_unit_price.is_zero() {
        ItemEarnings {
            product_id: product.id,
            product_name: product.name.clone(),
            quantity,
            purchase_price,
            expected_unit_price,
            real_unit_price,
            expected_profit_per_unit,
            actual_profit_per_unit: Money::ZERO,
            total_actual_profit: Money::ZERO,
            profit_difference_total: -(expected_profit_per_unit * quantity),
            loss_amount: purchase_price * quantity,
        }
    } else {
        let actual_profit_per_unit = real_unit_price - purchase_price;
        ItemEarnings {
            product_id: product.id,
            product_name: product.name.clone(),
            quantity,
            purchase_price,
            expected_unit_price,
            real_unit_price,
            expected_profit_per_unit,
            actual_profit_per_unit,
            total_actual_profit: actual_profit_per_unit * quantity,
            profit_difference_total: (actual_profit_per_unit - expected_profit_per_unit)
                * quantity,
            loss_amount: Money::ZERO,
        }
    };

    Some(earnings)
}

/// Unrounded per-product running totals.
#[derive(Debug, Clone)]
struct ProductAccumulator {
    product_name: String,
    quantity_sold: Decimal,
    // Unit figures keep the first observed value; totals accumulate.
    real_unit_price: Money,
    expected_unit_price: Money,
    purchase_price: Money,
    expected_profit_per_unit: Money,
    actual_profit_per_unit: Money,
    total_actual_profit: Money,
    profit_difference_total: Money,
    loss: Money,
}

impl ProductAccumulator {
    fn from_item(item: &ItemEarnings) -> Self {
        Self {
            product_name: item.product_name.clone(),
            quantity_sold: item.quantity,
            real_unit_price: item.real_unit_price,
            expected_unit_price: item.expected_unit_price,
            purchase_price: item.purchase_price,
            expected_profit_per_unit: item.expected_profit_per_unit,
            actual_profit_per_unit: item.actual_profit_per_unit,
            total_actual_profit: item.total_actual_profit,
            profit_difference_total: item.profit_difference_total,
            loss: item.loss_amount,
        }
    }

    fn absorb(&mut self, item: &ItemEarnings) {
        self.quantity_sold += item.quantity;
        self.total_actual_profit += item.total_actual_profit;
        self.profit_difference_total += item.profit_difference_total;
        self.loss += item.loss_amount;
    }

    fn merge(&mut self, other: &Self) {
        self.quantity_sold += other.quantity_sold;
        self.total_actual_profit += other.total_actual_profit;
        self.profit_difference_total += other.profit_difference_total;
        self.loss += other.loss;
    }

    fn into_rounded(self) -> ProductEarnings {
        ProductEarnings {
            product_name: self.product_name,
            quantity_sold: self.quantity_sold,
            real_unit_price: self.real_unit_price.round_half_up(),
            expected_unit_price: self.expected_unit_price.round_half_up(),
            purchase_price: self.purchase_price.round_half_up(),
            expected_profit_per_unit: self.expected_profit_per_unit.round_half_up(),
            actual_profit_per_unit: self.actual_profit_per_unit.round_half_up(),
            total_actual_profit: self.total_actual_profit.round_half_up(),
            profit_difference_total: self.profit_difference_total.round_half_up(),
            loss: self.loss.round_half_up(),
        }
    }
}

/// Unrounded per-day running totals.
#[derive(Debug, Clone, Default)]
struct DayAccumulator {
    products: BTreeMap<ProductId, ProductAccumulator>,
    total_profit: Money,
    total_losses: Money,
    total_returns: Money,
}

/// Accumulates item earnings over a date window into a report.
///
/// One accumulator serves both the single-day and the date-range queries;
/// the window is just one day wide in the former case.
#[derive(Debug, Clone)]
pub struct EarningsAccumulator {
    start_date: NaiveDate,
    end_date: NaiveDate,
    days: BTreeMap<NaiveDate, DayAccumulator>,
}

impl EarningsAccumulator {
    /// Creates an accumulator for the given window (inclusive bounds).
    #[must_use]
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            start_date,
            end_date,
            days: BTreeMap::new(),
        }
    }

    /// Records one item's earnings under its sale day.
    pub fn record_item(&mut self, day: NaiveDate, item: &ItemEarnings) {
        let bucket = self.days.entry(day).or_default();
        bucket
            .products
            .entry(item.product_id)
            .and_modify(|p| p.absorb(item))
            .or_insert_with(|| ProductAccumulator::from_item(item));
        bucket.total_profit += item.total_actual_profit;
        bucket.total_losses += item.loss_amount;
    }

    /// Sets the returns total for a day that has sales.
    ///
    /// Days without recorded sales are not tracked, so their returns do not
    /// enter the report.
    pub fn record_returns(&mut self, day: NaiveDate, returns: Money) {
        if let Some(bucket) = self.days.get_mut(&day) {
            bucket.total_returns = returns;
        }
    }

    /// The days in the window that carry at least one sale, ascending.
    ///
    /// Callers use this to fetch returns totals for exactly the days that
    /// will appear in the report.
    pub fn sale_days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.days.keys().copied()
    }

    /// Builds the final report, applying output rounding.
    #[must_use]
    pub fn finish(self) -> EarningsReport {
        let mut daily_breakdown = BTreeMap::new();
        let mut period_products: BTreeMap<ProductId, ProductAccumulator> = BTreeMap::new();
        let mut total_profit_period = Money::ZERO;
        let mut total_losses_period = Money::ZERO;
        let mut total_returns_period = Money::ZERO;
        let days_with_sales = self.days.len();

        for (day, bucket) in self.days {
            total_profit_period += bucket.total_profit;
            total_losses_period += bucket.total_losses;
            total_returns_period += bucket.total_returns;

            for (product_id, acc) in &bucket.products {
                period_products
                    .entry(*product_id)
                    .and_modify(|p| p.merge(acc))
                    .or_insert_with(|| acc.clone());
            }

            let net = bucket.total_profit - bucket.total_losses - bucket.total_returns;
            daily_breakdown.insert(
                day,
                DailyEarnings {
                    earnings_by_product: bucket
                        .products
                        .into_iter()
                        .map(|(id, acc)| (id, acc.into_rounded()))
                        .collect(),
                    total_profit_day: bucket.total_profit.round_half_up(),
                    total_losses_day: bucket.total_losses.round_half_up(),
                    total_returns_day: bucket.total_returns.round_half_up(),
                    net_profit_day: net.round_half_up(),
                },
            );
        }

        let net_profit_after_returns =
            total_profit_period - total_losses_period - total_returns_period;

        EarningsReport {
            daily_breakdown,
            summary: EarningsSummary {
                earnings_by_product: period_products
                    .into_iter()
                    .map(|(id, acc)| (id, acc.into_rounded()))
                    .collect(),
                total_profit_period: total_profit_period.round_half_up(),
                total_losses_period: total_losses_period.round_half_up(),
                total_returns_period: total_returns_period.round_half_up(),
                net_profit_after_returns: net_profit_after_returns.round_half_up(),
                start_date: self.start_date,
                end_date: self.end_date,
                days_with_sales,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn product(name: &str, purchase: Decimal, sale: Decimal) -> ProductInfo {
        ProductInfo {
            id: ProductId::new(),
            name: name.to_string(),
            purchase_price: Money::new(purchase),
            sale_price: Money::new(sale),
        }
    }

    fn item(product: &ProductInfo, quantity: Decimal, real_price: Decimal) -> SoldItem {
        SoldItem {
            product_id: product.id,
            quantity,
            real_unit_price: Money::new(real_price),
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, d).unwrap()
    }

    #[test]
    fn test_zero_quantity_contributes_nothing() {
        let p = product("Rice", dec!(2.00), dec!(3.00));
        assert!(compute_item_earnings(&item(&p, dec!(0), dec!(3.00)), &p).is_none());
    }

    #[test]
    fn test_priced_item_profit() {
        let p = product("Rice", dec!(2.00), dec!(3.00));
        let e = compute_item_earnings(&item(&p, dec!(4), dec!(2.50)), &p).unwrap();

        assert_eq!(e.actual_profit_per_unit, Money::new(dec!(0.50)));
        assert_eq!(e.expected_profit_per_unit, Money::new(dec!(1.00)));
        assert_eq!(e.total_actual_profit, Money::new(dec!(2.00)));
        // Sold 0.50 under expectation, four units.
        assert_eq!(e.profit_difference_total, Money::new(dec!(-2.00)));
        assert_eq!(e.loss_amount, Money::ZERO);
    }

    #[test]
    fn test_unpriced_item_is_total_loss() {
        let p = product("Milk", dec!(1.80), dec!(2.50));
        let e = compute_item_earnings(&item(&p, dec!(3), dec!(0)), &p).unwrap();

        assert_eq!(e.loss_amount, Money::new(dec!(5.40)));
        assert_eq!(e.total_actual_profit, Money::ZERO);
        assert_eq!(e.actual_profit_per_unit, Money::ZERO);
        // The shortfall is the entire expected profit, scaled by quantity.
        assert_eq!(e.profit_difference_total, Money::new(dec!(-2.10)));
    }

    #[test]
    fn test_fractional_quantity() {
        let p = product("Cheese", dec!(10.00), dec!(14.00));
        let e = compute_item_earnings(&item(&p, dec!(0.250), dec!(14.00)), &p).unwrap();
        assert_eq!(e.total_actual_profit, Money::new(dec!(1.0000)));
    }

    #[test]
    fn test_accumulator_merges_same_product_within_day() {
        let p = product("Rice", dec!(2.00), dec!(3.00));
        let mut acc = EarningsAccumulator::new(day(1), day(1));

        let e1 = compute_item_earnings(&item(&p, dec!(2), dec!(3.00)), &p).unwrap();
        let e2 = compute_item_earnings(&item(&p, dec!(3), dec!(3.00)), &p).unwrap();
        acc.record_item(day(1), &e1);
        acc.record_item(day(1), &e2);

        let report = acc.finish();
        let daily = &report.daily_breakdown[&day(1)];
        let pe = &daily.earnings_by_product[&p.id];
        assert_eq!(pe.quantity_sold, dec!(5));
        assert_eq!(pe.total_actual_profit, Money::new(dec!(5.00)));
        assert_eq!(daily.total_profit_day, Money::new(dec!(5.00)));
    }

    #[test]
    fn test_returns_and_net_profit() {
        let p = product("Rice", dec!(2.00), dec!(3.00));
        let mut acc = EarningsAccumulator::new(day(1), day(2));

        let priced = compute_item_earnings(&item(&p, dec!(10), dec!(3.00)), &p).unwrap();
        let unpriced = compute_item_earnings(&item(&p, dec!(2), dec!(0)), &p).unwrap();
        acc.record_item(day(1), &priced);
        acc.record_item(day(1), &unpriced);
        acc.record_returns(day(1), Money::new(dec!(1.50)));

        let report = acc.finish();
        let daily = &report.daily_breakdown[&day(1)];
        assert_eq!(daily.total_profit_day, Money::new(dec!(10.00)));
        assert_eq!(daily.total_losses_day, Money::new(dec!(4.00)));
        assert_eq!(daily.total_returns_day, Money::new(dec!(1.50)));
        assert_eq!(daily.net_profit_day, Money::new(dec!(4.50)));

        assert_eq!(report.summary.net_profit_after_returns, Money::new(dec!(4.50)));
        assert_eq!(report.summary.days_with_sales, 1);
    }

    #[test]
    fn test_returns_on_day_without_sales_are_ignored() {
        let mut acc = EarningsAccumulator::new(day(1), day(5));
        acc.record_returns(day(3), Money::new(dec!(99.00)));
        let report = acc.finish();
        assert!(report.daily_breakdown.is_empty());
        assert_eq!(report.summary.total_returns_period, Money::ZERO);
    }

    #[test]
    fn test_summary_accumulates_products_across_days() {
        let p = product("Rice", dec!(2.00), dec!(3.00));
        let mut acc = EarningsAccumulator::new(day(1), day(2));

        let e1 = compute_item_earnings(&item(&p, dec!(2), dec!(3.00)), &p).unwrap();
        let e2 = compute_item_earnings(&item(&p, dec!(4), dec!(3.00)), &p).unwrap();
        acc.record_item(day(1), &e1);
        acc.record_item(day(2), &e2);

        let report = acc.finish();
        assert_eq!(report.summary.days_with_sales, 2);
        let pe = &report.summary.earnings_by_product[&p.id];
        assert_eq!(pe.quantity_sold, dec!(6));
        assert_eq!(pe.total_actual_profit, Money::new(dec!(6.00)));
    }

    #[test]
    fn test_empty_window_is_all_zero() {
        let report = EarningsAccumulator::new(day(1), day(7)).finish();
        assert!(report.daily_breakdown.is_empty());
        assert!(report.summary.earnings_by_product.is_empty());
        assert_eq!(report.summary.total_profit_period, Money::ZERO);
        assert_eq!(report.summary.net_profit_after_returns, Money::ZERO);
        assert_eq!(report.summary.days_with_sales, 0);
        assert_eq!(report.summary.start_date, day(1));
        assert_eq!(report.summary.end_date, day(7));
    }

    #[test]
    fn test_rounding_applies_only_at_output() {
        // Three items at a third of a cent of profit each: unrounded sum is
        // 0.999..., which must round once, not three times.
        let p = product("Candy", dec!(1.00), dec!(1.50));
        let mut acc = EarningsAccumulator::new(day(1), day(1));
        for _ in 0..3 {
            let e = compute_item_earnings(&item(&p, dec!(0.333), dec!(2.00)), &p).unwrap();
            acc.record_item(day(1), &e);
        }
        let report = acc.finish();
        // 0.333 * 1.00 * 3 = 0.999 -> 1.00 after one half-up rounding.
        assert_eq!(
            report.daily_breakdown[&day(1)].total_profit_day,
            Money::new(dec!(1.00))
        );
    }
}
