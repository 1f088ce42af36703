//! Timestamp value object for immutable points in time.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// Immutable point in time, always UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a timestamp for the current moment.
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a timestamp from a DateTime<Utc>.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Creates a timestamp from a calendar date and a time of day (UTC).
    pub fn from_date_time(date: NaiveDate, time: NaiveTime) -> Self {
        Self(date.and_time(time).and_utc())
    }

    /// Returns the inner DateTime.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Returns the calendar date (UTC) this instant falls on.
    pub fn date(&self) -> NaiveDate {
        self.0.date_naive()
    }

    /// Minutes elapsed since 00:00 of this instant's day.
    pub fn minutes_of_day(&self) -> u32 {
        let t = self.0.time();
        t.hour() * 60 + t.minute()
    }

    /// Checks if this timestamp is before another.
    pub fn is_before(&self, other: &Timestamp) -> bool {
        self.0 < other.0
    }

    /// Checks if this timestamp is after another.
    pub fn is_after(&self, other: &Timestamp) -> bool {
        self.0 > other.0
    }

    /// Creates a new timestamp by adding the specified number of minutes.
    pub fn add_minutes(&self, minutes: i64) -> Self {
        Self(self.0 + Duration::minutes(minutes))
    }

    /// Creates a new timestamp by adding the specified number of days.
    ///
    /// Negative values subtract days.
    pub fn add_days(&self, days: i64) -> Self {
        Self(self.0 + Duration::days(days))
    }

    /// Inclusive `[00:00:00.000, 23:59:59.999]` window for a calendar day.
    ///
    /// Used for day-scoped appointment queries.
    pub fn day_bounds(date: NaiveDate) -> (Timestamp, Timestamp) {
        let start = date.and_hms_opt(0, 0, 0).expect("valid midnight").and_utc();
        let end = date
            .and_hms_milli_opt(23, 59, 59, 999)
            .expect("valid end of day")
            .and_utc();
        (Self(start), Self(end))
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn day_bounds_cover_full_day() {
        let (start, end) = Timestamp::day_bounds(date(2026, 3, 14));
        assert_eq!(start.minutes_of_day(), 0);
        assert_eq!(end.date(), date(2026, 3, 14));
        assert!(start.is_before(&end));
    }

    #[test]
    fn minutes_of_day_computes_from_midnight() {
        let t = Timestamp::from_date_time(
            date(2026, 3, 14),
            NaiveTime::from_hms_opt(10, 30, 0).unwrap(),
        );
        assert_eq!(t.minutes_of_day(), 630);
    }

    #[test]
    fn add_minutes_moves_forward() {
        let t = Timestamp::from_date_time(
            date(2026, 3, 14),
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        );
        assert_eq!(t.add_minutes(30).minutes_of_day(), 570);
    }

    #[test]
    fn ordering_follows_instants() {
        let a = Timestamp::from_date_time(
            date(2026, 3, 14),
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        );
        let b = a.add_minutes(1);
        assert!(a.is_before(&b));
        assert!(b.is_after(&a));
        assert!(a < b);
    }
}
