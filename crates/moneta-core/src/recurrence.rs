//! Due-date advancement for recurring bills.

use chrono::{DateTime, Duration, Utc};

use moneta_domain::common::{shift_months_utc, shift_years_utc};
use moneta_domain::Frequency;

/// Advances a due date by exactly one unit of the given frequency.
///
/// Day-based frequencies add a fixed number of days; month- and year-based
/// frequencies follow calendar arithmetic with the day-of-month clamped to
/// the target month's last day (Jan 31 + 1 month = Feb 28/29). The time of
/// day is preserved.
pub fn advance(date: DateTime<Utc>, frequency: Frequency) -> DateTime<Utc> {
    match frequency {
        Frequency::Daily => date + Duration::days(1),
        Frequency::Weekly => date + Duration::days(7),
        Frequency::Biweekly => date + Duration::days(14),
        Frequency::Monthly => shift_months_utc(date, 1),
        Frequency::Quarterly => shift_months_utc(date, 3),
        Frequency::Biannually => shift_months_utc(date, 6),
        Frequency::Annually => shift_years_utc(date, 1),
    }
}
