//! Shared traits and calendar utilities for budgeting primitives.

use std::fmt;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Exposes a stable identifier for persisted entities.
pub trait Identifiable {
    fn id(&self) -> Uuid;
}

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Signed number of calendar days from `from` to `to`, rounding fractional
/// remainders toward the later boundary.
pub fn ceil_days_between(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    let millis = (to - from).num_milliseconds();
    let days = millis.div_euclid(MILLIS_PER_DAY);
    if millis.rem_euclid(MILLIS_PER_DAY) > 0 {
        days + 1
    } else {
        days
    }
}

/// Shifts a date by whole calendar months, clamping the day-of-month to the
/// last day of the target month.
pub fn shift_months(date: NaiveDate, months: i32) -> NaiveDate {
    let mut year = date.year();
    let mut month = date.month() as i32 + months;
    let mut day = date.day();
    while month > 12 {
        month -= 12;
        year += 1;
    }
    while month < 1 {
        month += 12;
        year -= 1;
    }
    day = day.min(days_in_month(year, month as u32));
    NaiveDate::from_ymd_opt(year, month as u32, day).unwrap()
}

/// Shifts a date by whole calendar years, clamping Feb 29 to Feb 28 when the
/// target year is not a leap year.
pub fn shift_years(date: NaiveDate, years: i32) -> NaiveDate {
    let year = date.year() + years;
    let month = date.month();
    let day = date.day().min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let next_month = if month == 12 { 1 } else { month + 1 };
    let next_year = if month == 12 { year + 1 } else { year };
    let first_next = NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .unwrap_or_else(|| NaiveDate::from_ymd_opt(year, month, 28).unwrap());
    let last_current = first_next - Duration::days(1);
    last_current.day()
}

/// Month shift over an instant, preserving the time of day.
pub fn shift_months_utc(at: DateTime<Utc>, months: i32) -> DateTime<Utc> {
    NaiveDateTime::new(shift_months(at.date_naive(), months), at.time()).and_utc()
}

/// Year shift over an instant, preserving the time of day.
pub fn shift_years_utc(at: DateTime<Utc>, years: i32) -> DateTime<Utc> {
    NaiveDateTime::new(shift_years(at.date_naive(), years), at.time()).and_utc()
}

/// Midnight UTC at the start of the given calendar date.
pub fn at_midnight(date: NaiveDate) -> DateTime<Utc> {
    NaiveDateTime::new(date, chrono::NaiveTime::MIN).and_utc()
}

/// The Sunday on or before the given date. Weeks anchor on Sunday everywhere
/// in this crate.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let offset = date.weekday().num_days_from_sunday() as i64;
    date - Duration::days(offset)
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
/// An inclusive reporting window over UTC instants.
pub struct DateWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, DateWindowError> {
        if end < start {
            return Err(DateWindowError::InvalidRange);
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.start && at <= self.end
    }

    /// The UTC calendar day containing `at`.
    pub fn day_of(at: DateTime<Utc>) -> Self {
        let start = at_midnight(at.date_naive());
        Self {
            start,
            end: start + Duration::days(1) - Duration::nanoseconds(1),
        }
    }

    /// The Sunday-anchored week containing `at`.
    pub fn week_of(at: DateTime<Utc>) -> Self {
        let start = at_midnight(week_start(at.date_naive()));
        Self {
            start,
            end: start + Duration::days(7) - Duration::nanoseconds(1),
        }
    }

    /// The calendar month containing `at`.
    pub fn month_of(at: DateTime<Utc>) -> Self {
        let first = at.date_naive().with_day(1).unwrap();
        let start = at_midnight(first);
        Self {
            start,
            end: at_midnight(shift_months(first, 1)) - Duration::nanoseconds(1),
        }
    }

    /// The calendar year containing `at`.
    pub fn year_of(at: DateTime<Utc>) -> Self {
        let first = NaiveDate::from_ymd_opt(at.date_naive().year(), 1, 1).unwrap();
        let start = at_midnight(first);
        Self {
            start,
            end: at_midnight(shift_years(first, 1)) - Duration::nanoseconds(1),
        }
    }

    /// From the start of the month `months - 1` months back, through `now`.
    pub fn last_months(now: DateTime<Utc>, months: u32) -> Self {
        let span = months.max(1) as i32;
        let first = shift_months(now.date_naive().with_day(1).unwrap(), -(span - 1));
        Self {
            start: at_midnight(first),
            end: now,
        }
    }

    /// From midnight `days - 1` days back, through `now`.
    pub fn last_days(now: DateTime<Utc>, days: u32) -> Self {
        let span = days.max(1) as i64;
        Self {
            start: at_midnight(now.date_naive() - Duration::days(span - 1)),
            end: now,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Errors that can occur when constructing [`DateWindow`] values.
pub enum DateWindowError {
    InvalidRange,
}

impl fmt::Display for DateWindowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateWindowError::InvalidRange => f.write_str("date window end must not precede start"),
        }
    }
}

impl std::error::Error for DateWindowError {}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn instant(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn shift_months_clamps_to_month_end() {
        let jan31 = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
        assert_eq!(
            shift_months(jan31, 1),
            NaiveDate::from_ymd_opt(2025, 2, 28).unwrap()
        );
        // leap year keeps the 29th
        let jan31_leap = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        assert_eq!(
            shift_months(jan31_leap, 1),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
    }

    #[test]
    fn shift_months_crosses_year_boundaries_both_ways() {
        let nov = NaiveDate::from_ymd_opt(2025, 11, 15).unwrap();
        assert_eq!(
            shift_months(nov, 3),
            NaiveDate::from_ymd_opt(2026, 2, 15).unwrap()
        );
        let feb = NaiveDate::from_ymd_opt(2025, 2, 15).unwrap();
        assert_eq!(
            shift_months(feb, -3),
            NaiveDate::from_ymd_opt(2024, 11, 15).unwrap()
        );
    }

    #[test]
    fn ceil_days_rounds_toward_later_boundary() {
        let now = instant(2025, 6, 10, 12);
        assert_eq!(ceil_days_between(now, now), 0);
        assert_eq!(ceil_days_between(now, now + Duration::hours(1)), 1);
        assert_eq!(ceil_days_between(now, now + Duration::days(3)), 3);
        assert_eq!(ceil_days_between(now, now - Duration::days(3)), -3);
        // -2.5 days rounds up to -2
        assert_eq!(
            ceil_days_between(now, now - Duration::days(2) - Duration::hours(12)),
            -2
        );
    }

    #[test]
    fn week_window_starts_on_sunday() {
        // 2025-06-11 is a Wednesday
        let window = DateWindow::week_of(instant(2025, 6, 11, 9));
        assert_eq!(
            window.start.date_naive(),
            NaiveDate::from_ymd_opt(2025, 6, 8).unwrap()
        );
        assert_eq!(
            window.end.date_naive(),
            NaiveDate::from_ymd_opt(2025, 6, 14).unwrap()
        );
    }

    #[test]
    fn month_window_covers_whole_month() {
        let window = DateWindow::month_of(instant(2025, 2, 14, 9));
        assert_eq!(
            window.start.date_naive(),
            NaiveDate::from_ymd_opt(2025, 2, 1).unwrap()
        );
        assert_eq!(
            window.end.date_naive(),
            NaiveDate::from_ymd_opt(2025, 2, 28).unwrap()
        );
        assert!(window.contains(instant(2025, 2, 28, 23)));
        assert!(!window.contains(instant(2025, 3, 1, 0)));
    }

    #[test]
    fn invalid_window_is_rejected() {
        let now = instant(2025, 6, 10, 0);
        assert!(DateWindow::new(now, now - Duration::days(1)).is_err());
        assert!(DateWindow::new(now, now).is_ok());
    }
}
