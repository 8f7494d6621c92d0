//! Timestamp utilities
//!
//! Activity timestamps are stored as Unix epoch microseconds so that SQLite
//! orders them numerically.

use chrono::{DateTime, NaiveDate, Utc};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Convert a timestamp to Unix epoch microseconds
pub fn to_micros(timestamp: &DateTime<Utc>) -> i64 {
    timestamp.timestamp_micros()
}

/// Convert Unix epoch microseconds back to a timestamp
///
/// Returns `None` when the value is outside chrono's representable range.
pub fn from_micros(micros: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_micros(micros)
}

/// Half-open microsecond range `[start, end)` covering one UTC calendar day
pub fn day_bounds_micros(day: NaiveDate) -> (i64, i64) {
    let start = day.and_hms_opt(0, 0, 0).map(|t| t.and_utc().timestamp_micros());
    let end = day
        .succ_opt()
        .and_then(|next| next.and_hms_opt(0, 0, 0))
        .map(|t| t.and_utc().timestamp_micros());

    (start.unwrap_or(i64::MIN), end.unwrap_or(i64::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_now_returns_recent_timestamp() {
        let timestamp = now();
        assert!(timestamp.timestamp() > 946_684_800); // 2000-01-01 00:00:00 UTC
        assert!(timestamp.timestamp() < 4_102_444_800); // 2100-01-01 00:00:00 UTC
    }

    #[test]
    fn test_micros_conversion_is_lossless() {
        let ts = Utc.with_ymd_and_hms(2024, 5, 17, 13, 45, 10).unwrap()
            + chrono::Duration::microseconds(123_456);
        let micros = to_micros(&ts);
        assert_eq!(from_micros(micros), Some(ts));
    }

    #[test]
    fn test_day_bounds_cover_exactly_one_day() {
        let day = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        let (start, end) = day_bounds_micros(day);
        assert_eq!(end - start, 86_400 * 1_000_000);

        let noon = Utc.with_ymd_and_hms(2024, 2, 29, 12, 0, 0).unwrap();
        assert!(to_micros(&noon) >= start && to_micros(&noon) < end);

        let next_midnight = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        assert_eq!(to_micros(&next_midnight), end);
    }
}
