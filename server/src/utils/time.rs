//! Time and calendar-date helpers
//!
//! Calendar dates are persisted as `TEXT 'YYYY-MM-DD'` so that lexicographic
//! order in SQL equals chronological order. Instants are unix seconds.
//! "Today" must be computed once per logical operation and passed down, so
//! streak boundary comparisons stay consistent within an operation.

use chrono::{NaiveDate, Utc};

/// Storage format for calendar dates
pub const DATE_FMT: &str = "%Y-%m-%d";

/// Current calendar date in UTC
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

/// Format a date for storage (`YYYY-MM-DD`)
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FMT).to_string()
}

/// Parse a stored or client-supplied `YYYY-MM-DD` date
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FMT).ok()
}
