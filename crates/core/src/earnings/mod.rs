//! Sales earnings aggregation.
//!
//! Computes per-product and per-period profit, loss, and net-of-returns
//! figures from raw sale/order/item rows. The database layer fetches the
//! rows for a day or date range; everything from per-item math to the final
//! report shape lives here and is recomputed fresh per query.
//!
//! Accumulation is unrounded decimal arithmetic throughout; half-up
//! rounding to 2 fractional digits happens once, when the report structs
//! are built.

pub mod calc;
pub mod types;

#[cfg(test)]
mod calc_props;

pub use calc::{compute_item_earnings, EarningsAccumulator};
pub use types::{
    DailyEarnings, EarningsReport, EarningsSummary, ItemEarnings, ProductEarnings, ProductInfo,
    SoldItem,
};
