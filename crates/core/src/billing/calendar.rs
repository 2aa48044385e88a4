//! Billable-day counting.

use chrono::{Datelike, NaiveDate, Weekday};

/// The weekly rest day on which no tuition accrues. Fixed policy, not
/// configurable.
pub const WEEKLY_REST_DAY: Weekday = Weekday::Sun;

/// Counts billable days in `[start, end]`, inclusive of both endpoints.
///
/// A day is billable unless it falls on [`WEEKLY_REST_DAY`]. Returns 0 when
/// `start > end`. Walks the range day by day so month and year boundaries and
/// leap years need no special casing.
#[must_use]
pub fn count_billable_days(start: NaiveDate, end: NaiveDate) -> u32 {
    if start > end {
        return 0;
    }

    let days = start
        .iter_days()
        .take_while(|day| *day <= end)
        .filter(|day| day.weekday() != WEEKLY_REST_DAY)
        .count();

    u32::try_from(days).unwrap_or(u32::MAX)
}
