use chrono::{Datelike, Days, Months, NaiveDate, Weekday};

use crate::error::DebitScheduleError;
use crate::DebitScheduleResult;

/// Wire format for every calendar date the crate reads or writes.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` string, naming the offending field on failure.
pub fn parse_date(field: &str, value: &str) -> DebitScheduleResult<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|e| {
        DebitScheduleError::DateError(format!("{field}: '{value}' is not a YYYY-MM-DD date ({e})"))
    })
}

pub fn add_days(date: NaiveDate, days: u64) -> DebitScheduleResult<NaiveDate> {
    date.checked_add_days(Days::new(days)).ok_or_else(|| {
        DebitScheduleError::DateError(format!("adding {days} days to {date} overflowed"))
    })
}

/// Calendar-month arithmetic; the day is clamped to the end of shorter months
/// (Jan 31 + 1 month = Feb 28/29).
pub fn add_months(date: NaiveDate, months: u32) -> DebitScheduleResult<NaiveDate> {
    date.checked_add_months(Months::new(months)).ok_or_else(|| {
        DebitScheduleError::DateError(format!("adding {months} months to {date} overflowed"))
    })
}

pub fn is_weekend(date: NaiveDate) -> bool {
    date.weekday() == Weekday::Sat || date.weekday() == Weekday::Sun
}

/// Roll a weekend date forward to the following Monday. Weekdays are returned
/// unchanged.
pub fn roll_to_monday(date: NaiveDate) -> DebitScheduleResult<NaiveDate> {
    if !is_weekend(date) {
        return Ok(date);
    }
    let days_to_monday = 7 - u64::from(date.weekday().num_days_from_monday());
    add_days(date, days_to_monday)
}
