//! Display helpers: date formatting and string-derived colors.

use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike, Utc};
use thiserror::Error;

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("invalid date: {0}")]
    InvalidDate(String),
}

/// Anything `format_date` can turn into a local calendar date/time.
#[derive(Debug, Clone, PartialEq)]
pub enum DateValue {
    /// Already a local wall-clock time.
    Naive(NaiveDateTime),
    Local(DateTime<Local>),
    Utc(DateTime<Utc>),
    /// Unix timestamp in milliseconds.
    Millis(i64),
    /// RFC 3339, `YYYY-MM-DD[T ]HH:MM:SS[.fff]` (local), or `YYYY-MM-DD` (UTC midnight).
    Text(String),
}

impl From<NaiveDateTime> for DateValue {
    fn from(value: NaiveDateTime) -> Self {
        DateValue::Naive(value)
    }
}

impl From<DateTime<Local>> for DateValue {
    fn from(value: DateTime<Local>) -> Self {
        DateValue::Local(value)
    }
}

impl From<DateTime<Utc>> for DateValue {
    fn from(value: DateTime<Utc>) -> Self {
        DateValue::Utc(value)
    }
}

impl From<i64> for DateValue {
    fn from(value: i64) -> Self {
        DateValue::Millis(value)
    }
}

impl From<&str> for DateValue {
    fn from(value: &str) -> Self {
        DateValue::Text(value.to_string())
    }
}

impl From<String> for DateValue {
    fn from(value: String) -> Self {
        DateValue::Text(value)
    }
}

impl DateValue {
    /// Local wall-clock time of this value.
    pub fn to_local(&self) -> Result<NaiveDateTime, FormatError> {
        match self {
            DateValue::Naive(value) => Ok(*value),
            DateValue::Local(value) => Ok(value.naive_local()),
            DateValue::Utc(value) => Ok(value.with_timezone(&Local).naive_local()),
            DateValue::Millis(ms) => DateTime::from_timestamp_millis(*ms)
                .map(|utc| utc.with_timezone(&Local).naive_local())
                .ok_or_else(|| FormatError::InvalidDate(ms.to_string())),
            DateValue::Text(text) => parse_text(text),
        }
    }
}

fn parse_text(text: &str) -> Result<NaiveDateTime, FormatError> {
    let text = text.trim();
    if let Ok(value) = DateTime::parse_from_rfc3339(text) {
        return Ok(value.with_timezone(&Local).naive_local());
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(value) = NaiveDateTime::parse_from_str(text, pattern) {
            return Ok(value);
        }
    }
    // Date-only strings are UTC midnight, as browsers read them.
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        let midnight = date.and_time(NaiveTime::default());
        return Ok(Utc.from_utc_datetime(&midnight).with_timezone(&Local).naive_local());
    }
    Err(FormatError::InvalidDate(text.to_string()))
}

/// Substitute date tokens in `format`.
///
/// Tokens are `YYYY`, `MMM` (month name), `MM`, `DD`, `HH`, `mm`, `ss` and
/// `sss` (milliseconds). Each token replaces only its first occurrence, and
/// tokens are applied in exactly that order, so `ss` consumes the first two
/// characters of a later `sss`.
pub fn format_date(value: impl Into<DateValue>, format: &str) -> Result<String, FormatError> {
    let value = value.into().to_local()?;
    let millis = (value.nanosecond() / 1_000_000).min(999);

    let substitutions = [
        ("YYYY", value.year().to_string()),
        ("MMM", MONTHS[value.month0() as usize].to_string()),
        ("MM", format!("{:02}", value.month())),
        ("DD", format!("{:02}", value.day())),
        ("HH", format!("{:02}", value.hour())),
        ("mm", format!("{:02}", value.minute())),
        ("ss", format!("{:02}", value.second())),
        ("sss", format!("{:03}", millis)),
    ];

    Ok(substitutions
        .iter()
        .fold(format.to_string(), |out, (token, replacement)| {
            out.replacen(token, replacement, 1)
        }))
}

/// Deterministic `#rrggbb` color for a string.
///
/// Hashes the UTF-16 code units with `hash = c + (hash << 5) - hash` in
/// wrapping 32-bit arithmetic, then takes the low three bytes of the hash,
/// least significant first.
pub fn string_to_color(value: &str) -> String {
    let hash = value.encode_utf16().fold(0i32, |hash, unit| {
        i32::from(unit).wrapping_add((hash << 5).wrapping_sub(hash))
    });

    let mut color = String::with_capacity(7);
    color.push('#');
    for i in 0..3 {
        let byte = (hash >> (i * 8)) & 0xff;
        color.push_str(&format!("{byte:02x}"));
    }
    color
}
