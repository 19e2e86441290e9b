//! Property tests for earnings calculation.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use tienda_shared::types::{Money, ProductId};

use super::calc::{compute_item_earnings, EarningsAccumulator};
use super::types::{ProductInfo, SoldItem};

/// Strategy for cent-precision prices.
fn price_strategy() -> impl Strategy<Value = Money> {
    (1i64..100_000i64).prop_map(|n| Money::new(Decimal::new(n, 2)))
}

/// Strategy for quantities with up to 3 fractional digits, non-zero.
fn quantity_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..50_000i64).prop_map(|n| Decimal::new(n, 3))
}

#[derive(Debug, Clone)]
struct GeneratedSale {
    product: ProductInfo,
    quantity: Decimal,
    real_unit_price: Money,
}

fn sale_strategy() -> impl Strategy<Value = GeneratedSale> {
    (
        price_strategy(),
        price_strategy(),
        quantity_strategy(),
        // Roughly one in five items has no recorded price.
        prop_oneof![
            4 => price_strategy(),
            1 => Just(Money::ZERO),
        ],
    )
        .prop_map(|(purchase, sale, quantity, real)| GeneratedSale {
            product: ProductInfo {
                id: ProductId::new(),
                name: "generated".to_string(),
                purchase_price: purchase,
                sale_price: sale,
            },
            quantity,
            real_unit_price: real,
        })
}

fn window_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 8, 20).unwrap()
}

fn build_report(sales: &[GeneratedSale]) -> super::types::EarningsReport {
    let day = window_day();
    let mut acc = EarningsAccumulator::new(day, day);
    for s in sales {
        let item = SoldItem {
            product_id: s.product.id,
            quantity: s.quantity,
            real_unit_price: s.real_unit_price,
        };
        if let Some(e) = compute_item_earnings(&item, &s.product) {
            acc.record_item(day, &e);
        }
    }
    acc.finish()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Computing the same window twice yields identical reports.
    #[test]
    fn prop_aggregation_is_deterministic(sales in prop::collection::vec(sale_strategy(), 0..24)) {
        let first = build_report(&sales);
        let second = build_report(&sales);
        prop_assert_eq!(first, second);
    }

    /// The day's profit total equals the half-up-rounded sum of the
    /// unrounded per-item profits.
    #[test]
    fn prop_day_total_is_rounded_item_sum(sales in prop::collection::vec(sale_strategy(), 1..24)) {
        let mut expected = Money::ZERO;
        for s in &sales {
            let item = SoldItem {
                product_id: s.product.id,
                quantity: s.quantity,
                real_unit_price: s.real_unit_price,
            };
            if let Some(e) = compute_item_earnings(&item, &s.product) {
                expected += e.total_actual_profit;
            }
        }

        let report = build_report(&sales);
        let day_total = report
            .daily_breakdown
            .get(&window_day())
            .map_or(Money::ZERO, |d| d.total_profit_day);
        prop_assert_eq!(day_total, expected.round_half_up());
    }

    /// Unpriced items always contribute purchase_price * quantity to loss
    /// and nothing to profit.
    #[test]
    fn prop_unpriced_item_is_total_loss(
        purchase in price_strategy(),
        sale in price_strategy(),
        quantity in quantity_strategy(),
    ) {
        let product = ProductInfo {
            id: ProductId::new(),
            name: "generated".to_string(),
            purchase_price: purchase,
            sale_price: sale,
        };
        let item = SoldItem {
            product_id: product.id,
            quantity,
            real_unit_price: Money::ZERO,
        };

        let e = compute_item_earnings(&item, &product).unwrap();
        prop_assert_eq!(e.loss_amount, purchase * quantity);
        prop_assert_eq!(e.total_actual_profit, Money::ZERO);
    }
}
