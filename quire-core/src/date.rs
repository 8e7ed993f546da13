//! Lenient date parsing and display formatting for frontmatter dates.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%B %d, %Y", "%b %d, %Y"];

/// Parse a frontmatter date, returning `None` when no known format matches
pub fn parse_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt);
        }
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// `January 5, 2025`, or the raw value when it does not parse
pub fn format_long(raw: &str) -> String {
    match parse_date(raw) {
        Some(dt) => dt.format("%B %-d, %Y").to_string(),
        None => raw.to_string(),
    }
}

/// `Jan 5`, or the raw value when it does not parse
pub fn format_month_day(raw: &str) -> String {
    match parse_date(raw) {
        Some(dt) => dt.format("%b %-d").to_string(),
        None => raw.to_string(),
    }
}

/// Four-digit year, or `unknown`
pub fn format_year(raw: &str) -> String {
    match parse_date(raw) {
        Some(dt) => dt.format("%Y").to_string(),
        None => "unknown".to_string(),
    }
}

/// ISO 8601 timestamp in UTC for structured data
pub fn to_iso(raw: &str) -> Option<String> {
    parse_date(raw).map(|dt| dt.and_utc().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string())
}
