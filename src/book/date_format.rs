//! Day-granularity wire format for record dates.
//!
//! Dates are written as `YYYY-MM-DD`. Reading also accepts RFC 3339 timestamps and
//! naive `YYYY-MM-DDTHH:MM:SS` timestamps, keeping only their date part.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

pub const FORMAT: &str = "%Y-%m-%d";

/// Parses a stored date string
///
/// # Example
/// ```rust
/// # use bookshelf::book::date_format::parse;
/// # use chrono::NaiveDate;
/// let expected = NaiveDate::from_ymd_opt(2024, 3, 9);
/// assert_eq!(parse("2024-03-09"), expected);
/// assert_eq!(parse("2024-03-09T17:45:00.000Z"), expected);
/// assert_eq!(parse("09/03/2024"), None);
/// ```
pub fn parse(input: &str) -> Option<NaiveDate> {
    let input = input.trim();

    if let Ok(date) = NaiveDate::parse_from_str(input, FORMAT) {
        return Some(date);
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(input) {
        return Some(timestamp.date_naive());
    }

    return NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|timestamp| timestamp.date());
}

pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&date.format(FORMAT))
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
    let raw = String::deserialize(deserializer)?;

    parse(&raw).ok_or_else(|| D::Error::custom(format!("invalid date: [{raw}]")))
}

pub mod optional {
    use super::*;

    pub fn serialize<S: Serializer>(
        date: &Option<NaiveDate>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match date {
            Some(date) => super::serialize(date, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDate>, D::Error> {
        return match Option::<String>::deserialize(deserializer)? {
            Some(raw) => parse(&raw)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid date: [{raw}]"))),
            None => Ok(None),
        };
    }
}
