//! Common validation and parsing helpers for request values

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$")
        .expect("email regex is valid")
});

/// Minimum password length accepted at registration and password change
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Check an email address for a plausible `local@domain.tld` shape
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email.trim())
}

/// True for empty or whitespace-only strings
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// True when an optional string is absent or blank
pub fn is_missing(value: &Option<String>) -> bool {
    value.as_deref().map(is_blank).unwrap_or(true)
}

/// Normalize a list filter: empty strings and `all` mean "no filter"
pub fn normalize_filter(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("all"))
        .map(str::to_string)
}

/// Parse a calendar date given as `YYYY-MM-DD` or as a full timestamp
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_datetime(value).map(|dt| dt.date_naive()))
}

/// Parse a timestamp in one of the accepted formats:
/// `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM:SSZ`, `YYYY-MM-DDTHH:MM:SS` or RFC 3339
pub fn parse_datetime(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Validate a `YYYY-MM` month key as used by monthly reports
pub fn is_valid_month_key(value: &str) -> bool {
    NaiveDate::parse_from_str(&format!("{}-01", value.trim()), "%Y-%m-%d").is_ok()
        && value.trim().len() == 7
}
