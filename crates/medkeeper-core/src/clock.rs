//! Wall-clock abstraction and local-time arithmetic.
//!
//! The engine never calls `Utc::now()` directly -- it reads time through the
//! [`Clock`] trait so tests can drive the schedule with a [`ManualClock`].
//! Conversions between user-facing local times and engine-facing UTC
//! instants also live here.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, FixedOffset, NaiveDateTime, NaiveTime, Utc};

/// The fixed 12-hour clock format accepted from users, e.g. "7:12 PM".
const CLOCK_FORMAT: &str = "%I:%M %p";

/// Source of the current instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock backed by system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Settable clock for tests. Clones share the same instant, so a test can
/// keep a handle while the engine owns another.
#[derive(Debug, Clone)]
pub struct ManualClock(Arc<Mutex<DateTime<Utc>>>);

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self(Arc::new(Mutex::new(start)))
    }

    pub fn set(&self, to: DateTime<Utc>) {
        *self.lock() = to;
    }

    pub fn advance(&self, by: Duration) {
        let mut instant = self.lock();
        *instant = *instant + by;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, DateTime<Utc>> {
        self.0.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.lock()
    }
}

/// Build a fixed timezone from an hour offset east of UTC.
pub fn fixed_offset(hours_east: i32) -> FixedOffset {
    FixedOffset::east_opt(hours_east * 3600)
        .unwrap_or(FixedOffset::east_opt(0).expect("zero offset is valid"))
}

/// Parse user input like "7:12 PM" into a time of day.
pub fn parse_clock_time(input: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(&input.trim().to_ascii_uppercase(), CLOCK_FORMAT).ok()
}

/// Render a time of day back in the user-facing format.
pub fn format_clock_time(time: NaiveTime) -> String {
    time.format(CLOCK_FORMAT).to_string()
}

/// Next occurrence of `time_of_day` strictly after `now`: today if the time
/// is still ahead on the local clock, otherwise tomorrow.
pub fn next_occurrence(now: DateTime<Utc>, time_of_day: NaiveTime, tz: FixedOffset) -> DateTime<Utc> {
    let local_now = now.with_timezone(&tz);
    let candidate = local_to_utc(local_now.date_naive().and_time(time_of_day), tz);
    if candidate > now {
        candidate
    } else {
        candidate + Duration::days(1)
    }
}

/// Next day boundary strictly after `now`: local midnight plus
/// `offset_min` minutes.
pub fn next_rollover_after(now: DateTime<Utc>, offset_min: u32, tz: FixedOffset) -> DateTime<Utc> {
    let local_now = now.with_timezone(&tz);
    let boundary = local_now.date_naive().and_time(NaiveTime::MIN) + Duration::minutes(offset_min as i64);
    let boundary = local_to_utc(boundary, tz);
    if boundary > now {
        boundary
    } else {
        boundary + Duration::days(1)
    }
}

fn local_to_utc(local: NaiveDateTime, tz: FixedOffset) -> DateTime<Utc> {
    (local - Duration::seconds(tz.local_minus_utc() as i64)).and_utc()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    #[test]
    fn parses_twelve_hour_times() {
        assert_eq!(
            parse_clock_time("7:12 PM"),
            NaiveTime::from_hms_opt(19, 12, 0)
        );
        assert_eq!(
            parse_clock_time(" 09:00 am "),
            NaiveTime::from_hms_opt(9, 0, 0)
        );
        assert_eq!(
            parse_clock_time("12:30 AM"),
            NaiveTime::from_hms_opt(0, 30, 0)
        );
    }

    #[test]
    fn rejects_malformed_times() {
        assert!(parse_clock_time("25:99").is_none());
        assert!(parse_clock_time("9 PM").is_none());
        assert!(parse_clock_time("13:00 PM").is_none());
        assert!(parse_clock_time("soonish").is_none());
        assert!(parse_clock_time("").is_none());
    }

    #[test]
    fn next_occurrence_later_today() {
        let now = utc(2026, 3, 10, 8, 0);
        let nine = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        assert_eq!(
            next_occurrence(now, nine, fixed_offset(0)),
            utc(2026, 3, 10, 9, 0)
        );
    }

    #[test]
    fn next_occurrence_rolls_to_tomorrow() {
        let now = utc(2026, 3, 10, 10, 0);
        let nine = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        assert_eq!(
            next_occurrence(now, nine, fixed_offset(0)),
            utc(2026, 3, 11, 9, 0)
        );
        // An exact match counts as already passed.
        assert_eq!(
            next_occurrence(utc(2026, 3, 10, 9, 0), nine, fixed_offset(0)),
            utc(2026, 3, 11, 9, 0)
        );
    }

    #[test]
    fn next_occurrence_respects_timezone() {
        // 08:00 UTC is 02:00 in UTC-6, so a 3 AM local reminder is still
        // ahead today and lands at 09:00 UTC.
        let now = utc(2026, 3, 10, 8, 0);
        let three = NaiveTime::from_hms_opt(3, 0, 0).unwrap();
        assert_eq!(
            next_occurrence(now, three, fixed_offset(-6)),
            utc(2026, 3, 10, 9, 0)
        );
    }

    #[test]
    fn rollover_is_midnight_plus_offset() {
        let now = utc(2026, 3, 10, 8, 0);
        assert_eq!(
            next_rollover_after(now, 0, fixed_offset(0)),
            utc(2026, 3, 11, 0, 0)
        );
        assert_eq!(
            next_rollover_after(now, 240, fixed_offset(0)),
            utc(2026, 3, 11, 4, 0)
        );
        // 4 AM boundary still ahead of 2 AM.
        assert_eq!(
            next_rollover_after(utc(2026, 3, 10, 2, 0), 240, fixed_offset(0)),
            utc(2026, 3, 10, 4, 0)
        );
    }
}
