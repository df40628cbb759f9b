/// Date and period utilities
///
/// Everything here works in naive local time: callers convert
/// `Local::now().naive_local()` exactly once at the edge, so the engine never
/// mixes UTC and local dates when keying history (a bug class the previous
/// implementation of this app suffered from).

use chrono::{Datelike, NaiveDate, NaiveDateTime};

use crate::domain::{DateKey, ResetFrequency};

/// Canonical date key for an instant's local calendar date
pub fn date_key(at: NaiveDateTime) -> DateKey {
    DateKey::from(at.date())
}

/// ISO-8601 week number (the week containing the first Thursday of the year
/// is week 1; weeks start on Monday)
pub fn iso_week_number(date: NaiveDate) -> u32 {
    date.iso_week().week()
}

/// ISO-8601 week-based year, which differs from the calendar year around
/// year boundaries (e.g. 2023-01-01 belongs to ISO week 52 of 2022)
pub fn iso_week_year(date: NaiveDate) -> i32 {
    date.iso_week().year()
}

/// Whether a period boundary lies between `last` and `now` for the given
/// cadence
///
/// Weekly cadence compares (week-year, week-number) pairs rather than raw day
/// differences, so a habit touched on Sunday rolls over the next Monday even
/// though only one calendar day elapsed.
pub fn period_crossed(frequency: ResetFrequency, last: NaiveDateTime, now: NaiveDateTime) -> bool {
    let last = last.date();
    let now = now.date();
    match frequency {
        ResetFrequency::Daily => last != now,
        ResetFrequency::Weekly => {
            (iso_week_year(last), iso_week_number(last)) != (iso_week_year(now), iso_week_number(now))
        }
        ResetFrequency::Monthly => (last.year(), last.month()) != (now.year(), now.month()),
    }
}
