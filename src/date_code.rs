//! Day-offset encoding of calendar dates.
//!
//! SQLite has no native date type, so every date is stored as the number of
//! days since 2000-01-01. Dates before the epoch encode to negative values.

use chrono::{Duration, NaiveDate};

use crate::constants::WIRE_DATE_FORMAT;

/// Signed day offset from [`epoch`].
pub type DateCode = i32;

pub fn epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(2000, 1, 1).expect("2000-01-01 is a valid date")
}

pub fn encode(date: NaiveDate) -> DateCode {
    (date - epoch()).num_days() as DateCode
}

/// Returns `None` when the offset falls outside the range chrono can represent.
pub fn decode(code: DateCode) -> Option<NaiveDate> {
    epoch().checked_add_signed(Duration::days(code as i64))
}

/// Parses a `YYYY-MM-DD` string as sent by clients.
pub fn parse_iso(value: &str) -> Option<DateCode> {
    NaiveDate::parse_from_str(value, WIRE_DATE_FORMAT)
        .ok()
        .map(encode)
}

pub fn format_iso(code: DateCode) -> Option<String> {
    decode(code).map(|date| date.format(WIRE_DATE_FORMAT).to_string())
}
