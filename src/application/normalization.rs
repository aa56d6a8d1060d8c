//! Canonicalization of the loosely formatted values frontends send.
//!
//! Dates become `YYYY-MM-DD`, times become 24-hour `HH:MM`, and a logical
//! field submitted under several historical names is reduced to the first
//! non-blank spelling.

use chrono::{NaiveDate, NaiveTime};

use crate::shared::{DomainError, DomainResult};

pub const CANONICAL_DATE_FORMAT: &str = "%Y-%m-%d";
pub const CANONICAL_TIME_FORMAT: &str = "%H:%M";

/// Tried in order after the `YYYY-MM-DD` prefix rule.
/// Month-first comes last so `05/04/2025` reads as 5 April.
pub const DATE_FALLBACK_FORMATS: &[&str] = &["%d/%m/%Y", "%d-%m-%Y", "%Y/%m/%d", "%m/%d/%Y"];

pub const TIME_FORMATS: &[&str] = &[
    "%H:%M",
    "%H:%M:%S",
    "%-I:%M %p",
    "%I:%M %p",
    "%-I:%M%p",
    "%I:%M%p",
];

pub fn normalize_date(raw: &str) -> DomainResult<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(DomainError::validation("date is required"));
    }

    // Already canonical, possibly a full timestamp: keep the date part as is.
    let bytes = raw.as_bytes();
    if bytes.len() >= 10 && bytes[4] == b'-' && bytes[7] == b'-' {
        if let Some(prefix) = raw.get(..10) {
            return Ok(prefix.to_string());
        }
    }

    DATE_FALLBACK_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .map(|d| d.format(CANONICAL_DATE_FORMAT).to_string())
        .ok_or_else(|| DomainError::validation("invalid date format; expected YYYY-MM-DD"))
}

pub fn normalize_time(raw: &str) -> DomainResult<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(DomainError::validation("time is required"));
    }

    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(raw, fmt).ok())
        .map(|t| t.format(CANONICAL_TIME_FORMAT).to_string())
        .ok_or_else(|| DomainError::validation("invalid time format; expected HH:MM"))
}

/// First value that is non-blank after trimming, trimmed.
pub fn first_non_blank<I, S>(values: I) -> Option<String>
where
    I: IntoIterator<Item = Option<S>>,
    S: AsRef<str>,
{
    values.into_iter().flatten().find_map(|v| {
        let v = v.as_ref().trim();
        (!v.is_empty()).then(|| v.to_string())
    })
}

/// First non-empty list among the alias spellings.
pub fn first_non_empty<T>(values: impl IntoIterator<Item = Option<Vec<T>>>) -> Vec<T> {
    values
        .into_iter()
        .flatten()
        .find(|v| !v.is_empty())
        .unwrap_or_default()
}

/// Trim an optional free-text field; blank becomes `None`.
pub fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
