//! Time-range partitioning for charting.
//!
//! `bucketize` splits an inclusive range into contiguous, non-overlapping
//! buckets whose union covers the range exactly. After a possibly partial
//! first bucket, boundaries align to the period: days at UTC midnight, weeks
//! on Sunday, months on the 1st. Every bucket is materialized even when no
//! record falls inside it.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Duration, Utc};

use moneta_domain::common::{at_midnight, shift_months};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Bucket width for time-series views.
pub enum Granularity {
    Day,
    Week,
    Month,
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Granularity::Day => "day",
            Granularity::Week => "week",
            Granularity::Month => "month",
        };
        f.write_str(label)
    }
}

impl FromStr for Granularity {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "day" => Ok(Granularity::Day),
            "week" => Ok(Granularity::Week),
            "month" => Ok(Granularity::Month),
            other => Err(format!("unrecognized granularity `{other}`")),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
/// One labelled sub-range. `end` sits one nanosecond before the next bucket's
/// `start`, so `start <= t <= end` assigns every timestamp to exactly one
/// bucket.
pub struct PeriodBucket {
    pub label: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl PeriodBucket {
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.start && at <= self.end
    }
}

pub fn bucketize(
    range_start: DateTime<Utc>,
    range_end: DateTime<Utc>,
    granularity: Granularity,
) -> Vec<PeriodBucket> {
    let mut buckets = Vec::new();
    let mut cursor = range_start;
    while cursor <= range_end {
        let boundary = next_boundary(cursor, granularity);
        let end = (boundary - Duration::nanoseconds(1)).min(range_end);
        buckets.push(PeriodBucket {
            label: label_for(granularity, cursor, end),
            start: cursor,
            end,
        });
        cursor = end + Duration::nanoseconds(1);
    }
    buckets
}

/// Start of the period strictly after the one containing `at`.
fn next_boundary(at: DateTime<Utc>, granularity: Granularity) -> DateTime<Utc> {
    let date = at.date_naive();
    match granularity {
        Granularity::Day => at_midnight(date + Duration::days(1)),
        Granularity::Week => {
            let to_sunday = 7 - date.weekday().num_days_from_sunday() as i64;
            at_midnight(date + Duration::days(to_sunday))
        }
        Granularity::Month => at_midnight(shift_months(date.with_day(1).unwrap(), 1)),
    }
}

fn label_for(granularity: Granularity, start: DateTime<Utc>, end: DateTime<Utc>) -> String {
    match granularity {
        Granularity::Day => start.format("%Y-%m-%d").to_string(),
        Granularity::Week => format!("{} - {}", start.format("%b %d"), end.format("%b %d")),
        Granularity::Month => start.format("%b %Y").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Weekday};

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn assert_partition(buckets: &[PeriodBucket], start: DateTime<Utc>, end: DateTime<Utc>) {
        assert!(!buckets.is_empty());
        assert_eq!(buckets[0].start, start);
        assert_eq!(buckets.last().unwrap().end, end);
        for pair in buckets.windows(2) {
            assert_eq!(
                pair[1].start,
                pair[0].end + Duration::nanoseconds(1),
                "buckets must be contiguous and non-overlapping"
            );
        }
    }

    #[test]
    fn day_buckets_partition_the_range() {
        let start = at(2025, 5, 1, 0);
        let end = at(2025, 5, 7, 23);
        let buckets = bucketize(start, end, Granularity::Day);
        assert_eq!(buckets.len(), 7);
        assert_partition(&buckets, start, end);
        assert_eq!(buckets[0].label, "2025-05-01");
    }

    #[test]
    fn week_buckets_align_to_sunday_after_partial_first() {
        // 2025-05-01 is a Thursday.
        let start = at(2025, 5, 1, 0);
        let end = at(2025, 5, 31, 23);
        let buckets = bucketize(start, end, Granularity::Week);
        assert_partition(&buckets, start, end);
        for bucket in &buckets[1..] {
            assert_eq!(bucket.start.date_naive().weekday(), Weekday::Sun);
        }
        assert_eq!(
            buckets[1].start.date_naive(),
            NaiveDate::from_ymd_opt(2025, 5, 4).unwrap()
        );
    }

    #[test]
    fn month_buckets_cover_partial_edges() {
        let start = at(2025, 1, 15, 12);
        let end = at(2025, 4, 10, 6);
        let buckets = bucketize(start, end, Granularity::Month);
        assert_eq!(buckets.len(), 4);
        assert_partition(&buckets, start, end);
        assert_eq!(buckets[0].label, "Jan 2025");
        assert_eq!(buckets[3].label, "Apr 2025");
        assert_eq!(buckets[1].start, at(2025, 2, 1, 0));
    }

    #[test]
    fn every_timestamp_lands_in_exactly_one_bucket() {
        let start = at(2025, 5, 1, 0);
        let end = at(2025, 5, 31, 23);
        let buckets = bucketize(start, end, Granularity::Week);
        let probes = [start, at(2025, 5, 4, 0), at(2025, 5, 10, 23), end];
        for probe in probes {
            let owners = buckets.iter().filter(|b| b.contains(probe)).count();
            assert_eq!(owners, 1, "probe {probe} must belong to one bucket");
        }
    }

    #[test]
    fn inverted_range_yields_no_buckets() {
        let start = at(2025, 5, 2, 0);
        assert!(bucketize(start, start - Duration::days(1), Granularity::Day).is_empty());
    }

    #[test]
    fn single_instant_range_yields_one_bucket() {
        let start = at(2025, 5, 2, 10);
        let buckets = bucketize(start, start, Granularity::Day);
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].start, buckets[0].end);
    }
}
