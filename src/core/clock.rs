//! Time sources and quota window boundaries
//!
//! Every time-dependent component reads the current instant through a
//! [`Clock`], so limiter windows, cache TTLs and quota rollover can be driven
//! by a [`ManualClock`] in tests. Instants are milliseconds since the Unix
//! epoch; calendar boundaries are computed in local time.

use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, TimeZone, Timelike};
use std::fmt::Debug;
use std::sync::atomic::{AtomicI64, Ordering};

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Source of the current instant
pub trait Clock: Send + Sync + Debug {
    /// Milliseconds since the Unix epoch
    fn now_ms(&self) -> i64;
}

/// Wall clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Clock that only moves when told to
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    /// Create a clock frozen at `now_ms`
    pub fn new(now_ms: i64) -> Self {
        Self {
            now: AtomicI64::new(now_ms),
        }
    }

    /// Create a clock frozen at the current wall-clock instant
    pub fn starting_now() -> Self {
        Self::new(SystemClock.now_ms())
    }

    /// Move the clock forward
    pub fn advance(&self, ms: i64) {
        self.now.fetch_add(ms, Ordering::SeqCst);
    }

    /// Jump to an absolute instant
    pub fn set(&self, now_ms: i64) {
        self.now.store(now_ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

fn local_datetime(now_ms: i64) -> Option<DateTime<Local>> {
    Local.timestamp_millis_opt(now_ms).earliest()
}

fn local_midnight(date: NaiveDate) -> Option<i64> {
    let naive = date.and_hms_opt(0, 0, 0)?;
    // A DST jump can skip local midnight entirely; fall back to the first valid instant
    Local
        .from_local_datetime(&naive)
        .earliest()
        .or_else(|| Local.from_local_datetime(&(naive + Duration::hours(1))).earliest())
        .map(|dt| dt.timestamp_millis())
}

/// Start of the calendar day after `now_ms`, local time
pub fn next_midnight(now_ms: i64) -> i64 {
    local_datetime(now_ms)
        .and_then(|now| now.date_naive().succ_opt())
        .and_then(local_midnight)
        .unwrap_or(now_ms + DAY_MS)
}

/// First instant of the calendar month after `now_ms`, local time
pub fn next_month_start(now_ms: i64) -> i64 {
    local_datetime(now_ms)
        .and_then(|now| {
            let (year, month) = if now.month() == 12 {
                (now.year() + 1, 1)
            } else {
                (now.year(), now.month() + 1)
            };
            NaiveDate::from_ymd_opt(year, month, 1)
        })
        .and_then(local_midnight)
        .unwrap_or(now_ms + 31 * DAY_MS)
}

/// Local hour of day (0-23)
pub fn local_hour(now_ms: i64) -> u32 {
    local_datetime(now_ms).map(|dt| dt.hour()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local_ms(y: i32, m: u32, d: u32, h: u32, min: u32) -> i64 {
        Local
            .with_ymd_and_hms(y, m, d, h, min, 0)
            .earliest()
            .unwrap()
            .timestamp_millis()
    }

    #[test]
    fn test_manual_clock_advances() {
        let clock = ManualClock::new(1_000);
        clock.advance(500);
        assert_eq!(clock.now_ms(), 1_500);
        clock.set(10);
        assert_eq!(clock.now_ms(), 10);
    }

    #[test]
    fn test_next_midnight_is_start_of_following_day() {
        let now = local_ms(2024, 3, 14, 15, 30);
        assert_eq!(next_midnight(now), local_ms(2024, 3, 15, 0, 0));
    }

    #[test]
    fn test_next_midnight_at_midnight_moves_a_full_day() {
        let now = local_ms(2024, 3, 14, 0, 0);
        assert_eq!(next_midnight(now), local_ms(2024, 3, 15, 0, 0));
    }

    #[test]
    fn test_next_month_start() {
        let now = local_ms(2024, 1, 31, 23, 59);
        assert_eq!(next_month_start(now), local_ms(2024, 2, 1, 0, 0));
    }

    #[test]
    fn test_next_month_start_wraps_year() {
        let now = local_ms(2024, 12, 5, 9, 0);
        assert_eq!(next_month_start(now), local_ms(2025, 1, 1, 0, 0));
    }

    #[test]
    fn test_local_hour() {
        assert_eq!(local_hour(local_ms(2024, 6, 1, 17, 45)), 17);
    }
}
