use chrono::{Datelike, NaiveDate};

/// Returns the first day of the month the given date falls in.
pub fn month_of(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap()
}

/// Advances a first-of-month date by `n` whole months.
pub fn add_months(month: NaiveDate, n: u32) -> NaiveDate {
    let total = month.year() * 12 + month.month0() as i32 + n as i32;
    NaiveDate::from_ymd_opt(total.div_euclid(12), total.rem_euclid(12) as u32 + 1, 1).unwrap()
}

/// Number of whole months covered by a date window, inclusive of both
/// the start and end month. Spans shorter than one month (including
/// inverted windows) count as exactly one.
pub fn months_spanned(start: NaiveDate, end: NaiveDate) -> u32 {
    let span = (end.year() - start.year()) * 12 + end.month() as i32 - start.month() as i32 + 1;
    span.max(1) as u32
}
