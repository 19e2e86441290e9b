//! The canonical store clock.
//!
//! Every financial timestamp (movements, debts, sales, returns) is taken in
//! one time zone so that day-boundary aggregation never shifts with the
//! server's locale. The store runs on America/Bogota time.

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use chrono_tz::America::Bogota;

/// Source of "now" for all financial timestamps.
#[derive(Debug, Clone, Copy, Default)]
pub struct StoreClock;

impl StoreClock {
    /// Current instant, expressed in the store's canonical zone.
    #[must_use]
    pub fn now() -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&Bogota).fixed_offset()
    }

    /// Today's calendar date in the store's canonical zone.
    #[must_use]
    pub fn today() -> NaiveDate {
        Utc::now().with_timezone(&Bogota).date_naive()
    }

    /// The store-local calendar date of an arbitrary timestamp.
    ///
    /// Used when bucketing timestamps into days for aggregation.
    #[must_use]
    pub fn local_date(ts: &DateTime<FixedOffset>) -> NaiveDate {
        ts.with_timezone(&Bogota).date_naive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_now_is_bogota_offset() {
        // Bogota has no DST; the offset is always UTC-5.
        let now = StoreClock::now();
        assert_eq!(now.offset().local_minus_utc(), -5 * 3600);
    }

    #[test]
    fn test_local_date_shifts_across_midnight() {
        // 03:00 UTC is 22:00 the previous day in Bogota.
        let utc = Utc.with_ymd_and_hms(2026, 3, 10, 3, 0, 0).unwrap();
        let ts = utc.fixed_offset();
        let date = StoreClock::local_date(&ts);
        assert_eq!(date, NaiveDate::from_ymd_opt(2026, 3, 9).unwrap());
    }

    #[test]
    fn test_today_matches_now() {
        assert_eq!(StoreClock::today(), StoreClock::now().date_naive());
    }
}
