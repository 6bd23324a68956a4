//! Small value types shared by several resources.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use agri_shared::validation::{parse_date, parse_datetime};

use crate::errors::ValidationError;

/// A category (or status, or type) with its row count
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    pub name: String,
    pub count: i64,
}

/// A category with row count and summed amount
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryAmount {
    pub category: String,
    pub count: i64,
    pub amount: f64,
}

/// One entry of the dashboard activity feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityItem {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub activity_type: String,
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub entity_type: String,
}

/// Parses an optional date field, rejecting present-but-unparsable values
pub fn optional_date(
    field: &str,
    value: Option<&str>,
) -> Result<Option<NaiveDate>, ValidationError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(raw) => parse_date(raw)
            .map(Some)
            .ok_or_else(|| invalid_date(field, raw)),
    }
}

/// Parses an optional timestamp field
pub fn optional_datetime(
    field: &str,
    value: Option<&str>,
) -> Result<Option<DateTime<Utc>>, ValidationError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(raw) => parse_datetime(raw)
            .map(Some)
            .ok_or_else(|| invalid_date(field, raw)),
    }
}

/// Parses an optional upper bound. A bare `YYYY-MM-DD` covers the whole day,
/// so it resolves to the last millisecond of that day.
pub fn optional_period_end(
    field: &str,
    value: Option<&str>,
) -> Result<Option<DateTime<Utc>>, ValidationError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(raw) => match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            Ok(day) => day
                .and_hms_milli_opt(23, 59, 59, 999)
                .map(|end| Some(Utc.from_utc_datetime(&end)))
                .ok_or_else(|| invalid_date(field, raw)),
            Err(_) => optional_datetime(field, Some(raw)),
        },
    }
}

fn invalid_date(field: &str, raw: &str) -> ValidationError {
    ValidationError::InvalidDate {
        field: field.to_string(),
        value: raw.to_string(),
    }
}

/// Collects the names of blank or absent required text fields
pub(crate) fn missing_text<'a>(fields: &[(&'a str, &Option<String>)]) -> Vec<&'a str> {
    fields
        .iter()
        .filter(|(_, value)| value.as_deref().map(|v| v.trim().is_empty()).unwrap_or(true))
        .map(|(name, _)| *name)
        .collect()
}

/// Trimmed, non-empty text or `None`
pub(crate) fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
