//! Time sources and local date helpers.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{Local, NaiveDate, NaiveTime, TimeZone};

/// Milliseconds in one day.
pub const DAY_MS: i64 = 86_400_000;

/// Time used when a legacy log carries a date but no time.
pub const DEFAULT_LOG_TIME: &str = "12:00";

/// Source of "now" in epoch milliseconds.
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> i64;
}

/// Wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Manually advanced clock for simulated time.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    pub fn new(start_millis: i64) -> Self {
        Self {
            now: AtomicI64::new(start_millis),
        }
    }

    pub fn set(&self, millis: i64) {
        self.now.store(millis, Ordering::SeqCst);
    }

    pub fn advance(&self, millis: i64) {
        self.now.fetch_add(millis, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Epoch milliseconds for a `YYYY-MM-DD` date and optional `HH:MM` time in local time.
///
/// A missing or empty time falls back to [`DEFAULT_LOG_TIME`]. Returns `None`
/// when either part does not parse or the local time does not exist.
pub fn local_timestamp(date: &str, time: Option<&str>) -> Option<i64> {
    let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").ok()?;
    let time = match time.map(str::trim) {
        Some(t) if !t.is_empty() => t,
        _ => DEFAULT_LOG_TIME,
    };
    let time = NaiveTime::parse_from_str(time, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(time, "%H:%M:%S"))
        .ok()?;

    Local
        .from_local_datetime(&date.and_time(time))
        .earliest()
        .map(|dt| dt.timestamp_millis())
}

/// Local `(YYYY-MM-DD, HH:MM)` strings for an epoch-millisecond instant.
pub fn local_date_time(millis: i64) -> (String, String) {
    match Local.timestamp_millis_opt(millis).earliest() {
        Some(dt) => (
            dt.format("%Y-%m-%d").to_string(),
            dt.format("%H:%M").to_string(),
        ),
        None => ("1970-01-01".to_string(), DEFAULT_LOG_TIME.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_advances() {
        let clock = ManualClock::new(1_000);
        clock.advance(500);
        assert_eq!(clock.now_millis(), 1_500);
        clock.set(42);
        assert_eq!(clock.now_millis(), 42);
    }

    #[test]
    fn test_local_timestamp_matches_chrono_local() {
        let expected = Local
            .with_ymd_and_hms(2024, 1, 15, 9, 30, 0)
            .earliest()
            .unwrap()
            .timestamp_millis();
        assert_eq!(local_timestamp("2024-01-15", Some("09:30")), Some(expected));
    }

    #[test]
    fn test_local_timestamp_defaults_to_noon() {
        let noon = local_timestamp("2024-01-15", Some("12:00"));
        assert_eq!(local_timestamp("2024-01-15", None), noon);
        assert_eq!(local_timestamp("2024-01-15", Some("")), noon);
    }

    #[test]
    fn test_local_timestamp_rejects_garbage() {
        assert_eq!(local_timestamp("15/01/2024", None), None);
        assert_eq!(local_timestamp("2024-01-15", Some("noon")), None);
    }

    #[test]
    fn test_local_date_time_round_trips_minutes() {
        let ts = local_timestamp("2024-03-02", Some("18:45")).unwrap();
        assert_eq!(
            local_date_time(ts),
            ("2024-03-02".to_string(), "18:45".to_string())
        );
    }
}
