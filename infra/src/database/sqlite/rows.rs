//! Column codecs and error mapping shared by the SQLite repositories

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use sqlx::sqlite::{Sqlite, SqliteRow};
use sqlx::{Decode, Row, Type};
use uuid::Uuid;

use agri_core::domain::entities::common::CategoryCount;
use agri_core::errors::DomainError;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Log a driver error and hide its details behind `DomainError::Internal`
pub(crate) fn db_error(context: &str, e: sqlx::Error) -> DomainError {
    tracing::error!(error = %e, "{}", context);
    DomainError::internal(format!("{}: {}", context, e))
}

/// True when the driver reports a UNIQUE constraint violation
pub(crate) fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_unique_violation())
}

pub(crate) fn ts(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub(crate) fn opt_ts(value: &Option<DateTime<Utc>>) -> Option<String> {
    value.as_ref().map(ts)
}

pub(crate) fn date(value: &NaiveDate) -> String {
    value.format(DATE_FORMAT).to_string()
}

pub(crate) fn opt_date(value: &Option<NaiveDate>) -> Option<String> {
    value.as_ref().map(date)
}

pub(crate) fn column<'r, T>(row: &'r SqliteRow, name: &str) -> Result<T, DomainError>
where
    T: Decode<'r, Sqlite> + Type<Sqlite>,
{
    row.try_get(name)
        .map_err(|e| DomainError::internal(format!("Failed to get {}: {}", name, e)))
}

pub(crate) fn uuid_column(row: &SqliteRow, name: &str) -> Result<Uuid, DomainError> {
    let raw: String = column(row, name)?;
    parse_uuid(name, &raw)
}

pub(crate) fn opt_uuid_column(row: &SqliteRow, name: &str) -> Result<Option<Uuid>, DomainError> {
    let raw: Option<String> = column(row, name)?;
    raw.map(|r| parse_uuid(name, &r)).transpose()
}

pub(crate) fn ts_column(row: &SqliteRow, name: &str) -> Result<DateTime<Utc>, DomainError> {
    let raw: String = column(row, name)?;
    parse_ts(name, &raw)
}

pub(crate) fn opt_ts_column(
    row: &SqliteRow,
    name: &str,
) -> Result<Option<DateTime<Utc>>, DomainError> {
    let raw: Option<String> = column(row, name)?;
    raw.map(|r| parse_ts(name, &r)).transpose()
}

pub(crate) fn date_column(row: &SqliteRow, name: &str) -> Result<NaiveDate, DomainError> {
    let raw: String = column(row, name)?;
    parse_date(name, &raw)
}

pub(crate) fn opt_date_column(
    row: &SqliteRow,
    name: &str,
) -> Result<Option<NaiveDate>, DomainError> {
    let raw: Option<String> = column(row, name)?;
    raw.map(|r| parse_date(name, &r)).transpose()
}

/// Rows of `(name, count)` as produced by a `GROUP BY`
pub(crate) fn category_counts(rows: &[SqliteRow]) -> Result<Vec<CategoryCount>, DomainError> {
    rows.iter()
        .map(|row| {
            Ok(CategoryCount {
                name: column(row, "name")?,
                count: column(row, "count")?,
            })
        })
        .collect()
}

fn parse_uuid(name: &str, raw: &str) -> Result<Uuid, DomainError> {
    Uuid::parse_str(raw).map_err(|e| DomainError::internal(format!("Invalid UUID in {}: {}", name, e)))
}

fn parse_ts(name: &str, raw: &str) -> Result<DateTime<Utc>, DomainError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DomainError::internal(format!("Invalid timestamp in {}: {}", name, e)))
}

fn parse_date(name: &str, raw: &str) -> Result<NaiveDate, DomainError> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|e| DomainError::internal(format!("Invalid date in {}: {}", name, e)))
}
