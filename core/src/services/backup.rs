//! JSON export of a user's rows and validation of uploaded exports

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::errors::{DomainError, DomainResult, ValidationError};
use crate::repositories::Repositories;

pub const BACKUP_VERSION: &str = "1.0";

/// Tables included in every export, in export order
pub const BACKUP_TABLES: [&str; 6] = [
    "lands",
    "livestock",
    "production",
    "transactions",
    "events",
    "notifications",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Backup {
    pub version: String,
    pub created_at: DateTime<Utc>,
    pub user_id: Uuid,
    pub tables: BTreeMap<String, Vec<Value>>,
}

/// Outcome of checking an uploaded export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestoreSummary {
    pub version: String,
    pub created_at: Option<String>,
    pub counts: BTreeMap<String, usize>,
    pub total_records: usize,
    /// Always false; uploaded rows are checked but never written
    pub applied: bool,
}

#[derive(Clone)]
pub struct BackupService {
    repos: Repositories,
}

impl BackupService {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    pub async fn export(&self, user_id: Uuid) -> DomainResult<Backup> {
        let mut tables = BTreeMap::new();
        tables.insert(
            "lands".to_string(),
            to_values(self.repos.lands.list_all(user_id).await?)?,
        );
        tables.insert(
            "livestock".to_string(),
            to_values(self.repos.livestock.list_all(user_id).await?)?,
        );
        tables.insert(
            "production".to_string(),
            to_values(self.repos.production.list_all(user_id).await?)?,
        );
        tables.insert(
            "transactions".to_string(),
            to_values(self.repos.transactions.list_all(user_id).await?)?,
        );
        tables.insert(
            "events".to_string(),
            to_values(self.repos.events.list_all(user_id).await?)?,
        );
        tables.insert(
            "notifications".to_string(),
            to_values(self.repos.notifications.list_all(user_id).await?)?,
        );

        let total: usize = tables.values().map(Vec::len).sum();
        tracing::info!(user_id = %user_id, records = total, "Backup exported");

        Ok(Backup {
            version: BACKUP_VERSION.to_string(),
            created_at: Utc::now(),
            user_id,
            tables,
        })
    }

    /// Checks the shape of an export and counts its rows
    pub fn validate(&self, payload: &Value) -> Result<RestoreSummary, ValidationError> {
        validate_backup(payload)
    }
}

pub fn validate_backup(payload: &Value) -> Result<RestoreSummary, ValidationError> {
    let root = payload
        .as_object()
        .ok_or_else(|| invalid("backup must be a JSON object"))?;
    let tables = root
        .get("tables")
        .and_then(Value::as_object)
        .ok_or_else(|| invalid("backup has no tables object"))?;

    let mut counts = BTreeMap::new();
    for (name, rows) in tables {
        if !BACKUP_TABLES.contains(&name.as_str()) {
            return Err(invalid(format!("unknown table '{}'", name)));
        }
        let rows = rows
            .as_array()
            .ok_or_else(|| invalid(format!("table '{}' must be an array", name)))?;
        if let Some(index) = rows.iter().position(|row| {
            row.get("id").and_then(Value::as_str).and_then(|id| Uuid::parse_str(id).ok()).is_none()
        }) {
            return Err(invalid(format!("row {} of '{}' has no valid id", index, name)));
        }
        counts.insert(name.clone(), rows.len());
    }

    Ok(RestoreSummary {
        version: root
            .get("version")
            .and_then(Value::as_str)
            .unwrap_or(BACKUP_VERSION)
            .to_string(),
        created_at: root
            .get("createdAt")
            .and_then(Value::as_str)
            .map(str::to_string),
        total_records: counts.values().sum(),
        counts,
        applied: false,
    })
}

fn to_values<T: Serialize>(rows: Vec<T>) -> Result<Vec<Value>, DomainError> {
    rows.into_iter()
        .map(|row| serde_json::to_value(row).map_err(|e| DomainError::internal(e.to_string())))
        .collect()
}

fn invalid(message: impl Into<String>) -> ValidationError {
    ValidationError::InvalidBackup {
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_backup_counts_rows() {
        let payload = json!({
            "version": "1.0",
            "createdAt": "2024-05-01T10:00:00Z",
            "tables": {
                "lands": [{"id": Uuid::new_v4().to_string(), "name": "North field"}],
                "events": [],
            }
        });
        let summary = validate_backup(&payload).unwrap();
        assert_eq!(summary.counts["lands"], 1);
        assert_eq!(summary.counts["events"], 0);
        assert_eq!(summary.total_records, 1);
        assert!(!summary.applied);
    }

    #[test]
    fn test_rejects_bad_shapes() {
        assert!(validate_backup(&json!([])).is_err());
        assert!(validate_backup(&json!({"tables": []})).is_err());
        assert!(validate_backup(&json!({"tables": {"users": []}})).is_err());
        assert!(validate_backup(&json!({"tables": {"lands": {}}})).is_err());
        assert!(matches!(
            validate_backup(&json!({"tables": {"lands": [{"id": "nope"}]}})),
            Err(ValidationError::InvalidBackup { .. })
        ));
    }
}
