//! Calendar dates as they appear in paths and payloads: `YYYY-MM-DD`, nothing else.

use chrono::NaiveDate;
use serde::{de, Deserialize, Deserializer};

use crate::error::AppError;

pub const DATE_FORMAT_MESSAGE: &str = "Invalid date format. Date must be in YYYY-MM-DD format.";

/// Parses a strict ISO calendar date.
///
/// The shape is checked before chrono sees the value, since chrono alone would also
/// take single-digit months and days or a signed year.
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    let bytes = input.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return None;
    }
    let digits_ok = bytes
        .iter()
        .enumerate()
        .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
    if !digits_ok {
        return None;
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d").ok()
}

/// Like [`parse_date`], reporting failure as a client error.
pub fn parse_date_param(input: &str) -> Result<NaiveDate, AppError> {
    parse_date(input).ok_or_else(|| AppError::BadRequest(DATE_FORMAT_MESSAGE.into()))
}

/// `deserialize_with` helper for required date fields.
pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_date(&raw).ok_or_else(|| de::Error::custom(DATE_FORMAT_MESSAGE))
}

/// `deserialize_with` helper for optional date fields; `null` reads as absent.
pub fn deserialize_option<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) => parse_date(&raw)
            .map(Some)
            .ok_or_else(|| de::Error::custom(DATE_FORMAT_MESSAGE)),
    }
}
