//! Conversions between the persisted display format (`DD-MMM-YYYY`) and
//! native date values.
//!
//! Input is lenient: days may or may not be zero-padded and the month
//! abbreviation is matched case-insensitively. Output is always zero-padded
//! with a title-case month, e.g. `06-May-2025`.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

pub const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateError {
    #[error("Invalid date format: {0}")]
    InvalidFormat(String),

    #[error("Unknown month abbreviation: {0}")]
    UnknownMonth(String),

    #[error("Date out of range: {0}")]
    OutOfRange(String),
}

/// Zero-based month index for an abbreviation such as `"May"`.
pub fn month_index(abbreviation: &str) -> Option<u32> {
    MONTHS
        .iter()
        .position(|m| m.eq_ignore_ascii_case(abbreviation))
        .map(|i| i as u32)
}

/// Parse `D-MMM-YYYY` / `DD-MMM-YYYY`.
pub fn parse_display(input: &str) -> Result<NaiveDate, DateError> {
    let trimmed = input.trim();
    let parts: Vec<&str> = trimmed.split('-').collect();
    if parts.len() != 3 {
        return Err(DateError::InvalidFormat(input.to_string()));
    }

    let day: u32 = parts[0]
        .parse()
        .map_err(|_| DateError::InvalidFormat(input.to_string()))?;
    let month = month_index(parts[1]).ok_or_else(|| DateError::UnknownMonth(parts[1].to_string()))?;
    let year: i32 = parts[2]
        .parse()
        .map_err(|_| DateError::InvalidFormat(input.to_string()))?;

    NaiveDate::from_ymd_opt(year, month + 1, day)
        .ok_or_else(|| DateError::OutOfRange(input.to_string()))
}

/// Format as `DD-MMM-YYYY`.
pub fn format_display(date: NaiveDate) -> String {
    format!(
        "{:02}-{}-{:04}",
        date.day(),
        MONTHS[date.month0() as usize],
        date.year()
    )
}

/// Parse whatever a date field may hold: the display format, an ISO date
/// (`2025-05-06`), a naive ISO datetime or an RFC 3339 timestamp as sent by
/// date pickers.
pub fn parse_any(input: &str) -> Result<NaiveDate, DateError> {
    let trimmed = input.trim();

    if let Ok(date) = parse_display(trimmed) {
        return Ok(date);
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S") {
        return Ok(dt.date());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.date_naive());
    }

    Err(DateError::InvalidFormat(input.to_string()))
}

/// Display format -> `YYYY-MM-DD`.
pub fn to_iso(display: &str) -> Result<String, DateError> {
    parse_display(display).map(|d| d.format("%Y-%m-%d").to_string())
}

/// Any accepted representation -> display format.
pub fn from_iso(iso: &str) -> Result<String, DateError> {
    parse_any(iso).map(format_display)
}

/// Canonical display string for change detection, `None` if unparseable.
pub fn canonical(input: &str) -> Option<String> {
    parse_any(input).ok().map(format_display)
}

/// True when both inputs denote the same calendar day. Inputs that do not
/// parse as dates fall back to a raw string comparison.
pub fn same_day(a: &str, b: &str) -> bool {
    match (canonical(a), canonical(b)) {
        (Some(x), Some(y)) => x == y,
        _ => a.trim() == b.trim(),
    }
}
