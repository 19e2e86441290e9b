//! Repository abstractions for data access.

pub mod debt;
pub mod earnings;
pub mod returns;
pub mod sale;

pub use debt::DebtRepository;
pub use earnings::EarningsRepository;
pub use returns::ReturnsRepository;
pub use sale::SaleRepository;

use chrono::{DateTime, Days, FixedOffset, NaiveDate, NaiveTime, TimeDelta};
use tienda_shared::StoreClock;

/// Midnight of a store-local calendar date, as an absolute timestamp.
fn local_midnight(date: NaiveDate, offset: FixedOffset) -> DateTime<FixedOffset> {
    let naive_utc =
        date.and_time(NaiveTime::MIN) - TimeDelta::seconds(i64::from(offset.local_minus_utc()));
    DateTime::from_naive_utc_and_offset(naive_utc, offset)
}

/// Half-open timestamp window `[start 00:00, end+1day 00:00)` covering the
/// inclusive `[start, end]` range of store-local days.
///
/// All day-windowed queries (sales, returns) go through this so that the
/// store's canonical zone decides which day a timestamp belongs to.
pub(crate) fn local_day_window(
    start: NaiveDate,
    end: NaiveDate,
) -> (DateTime<FixedOffset>, DateTime<FixedOffset>) {
    let offset = *StoreClock::now().offset();
    let upper = end.checked_add_days(Days::new(1)).unwrap_or(end);
    (local_midnight(start, offset), local_midnight(upper, offset))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_day_window_spans_whole_days() {
        let start = NaiveDate::from_ymd_opt(2026, 8, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2026, 8, 3).unwrap();
        let (lo, hi) = local_day_window(start, end);

        assert_eq!(StoreClock::local_date(&lo), start);
        // The upper bound is exclusive: the first instant of the next day.
        assert_eq!(
            StoreClock::local_date(&hi),
            end.checked_add_days(Days::new(1)).unwrap()
        );
        assert_eq!((hi - lo).num_hours(), 72);
    }

    #[test]
    fn test_single_day_window() {
        let day = NaiveDate::from_ymd_opt(2026, 8, 15).unwrap();
        let (lo, hi) = local_day_window(day, day);
        assert_eq!((hi - lo).num_hours(), 24);
    }
}
