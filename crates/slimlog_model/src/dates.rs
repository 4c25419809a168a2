//! Day-date helpers.

use chrono::{Days, Local, NaiveDate};

/// Moves a date forward (`add > 0`) or backward (`add < 0`) by whole days.
///
/// Saturates at the calendar limits rather than wrapping.
#[must_use]
pub fn add_days(date: NaiveDate, add: i64) -> NaiveDate {
    let moved = if add >= 0 {
        date.checked_add_days(Days::new(add.unsigned_abs()))
    } else {
        date.checked_sub_days(Days::new(add.unsigned_abs()))
    };
    moved.unwrap_or(date)
}

/// Number of whole days from `date1` to `date2` (negative if `date2` is
/// earlier).
#[must_use]
pub fn date_diff(date1: NaiveDate, date2: NaiveDate) -> i64 {
    (date2 - date1).num_days()
}

/// Today's date in the local timezone.
///
/// Reads the wall clock, so it must never be called from a reducer; mint
/// the date here and carry it in the action instead.
#[must_use]
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
