//! SQLite implementation of the NotificationRepository trait.

use async_trait::async_trait;
use sqlx::sqlite::{Sqlite, SqliteRow};
use sqlx::{QueryBuilder, SqlitePool};
use uuid::Uuid;

use agri_core::domain::entities::notification::{Notification, NotificationFilter};
use agri_core::errors::DomainError;
use agri_core::repositories::NotificationRepository;
use agri_shared::types::{PaginatedResponse, Pagination};

use super::rows::{column, db_error, ts, ts_column, uuid_column};

const NOTIFICATION_COLUMNS: &str = r#"
    id, user_id, title, message, type, priority, is_read,
    related_entity_type, related_entity_id, created_at
"#;

pub struct SqliteNotificationRepository {
    pool: SqlitePool,
}

impl SqliteNotificationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_notification(row: &SqliteRow) -> Result<Notification, DomainError> {
        Ok(Notification {
            id: uuid_column(row, "id")?,
            user_id: uuid_column(row, "user_id")?,
            title: column(row, "title")?,
            message: column(row, "message")?,
            notification_type: column(row, "type")?,
            priority: column(row, "priority")?,
            is_read: column(row, "is_read")?,
            related_entity_type: column(row, "related_entity_type")?,
            related_entity_id: column(row, "related_entity_id")?,
            created_at: ts_column(row, "created_at")?,
        })
    }

    fn push_filters(
        builder: &mut QueryBuilder<'_, Sqlite>,
        user_id: Uuid,
        filter: &NotificationFilter,
    ) {
        builder.push(" WHERE user_id = ").push_bind(user_id.to_string());
        if let Some(notification_type) = &filter.notification_type {
            builder.push(" AND type = ").push_bind(notification_type.clone());
        }
        if let Some(is_read) = filter.is_read {
            builder.push(" AND is_read = ").push_bind(is_read);
        }
    }
}

#[async_trait]
impl NotificationRepository for SqliteNotificationRepository {
    async fn list(
        &self,
        user_id: Uuid,
        filter: &NotificationFilter,
        pagination: Pagination,
    ) -> Result<PaginatedResponse<Notification>, DomainError> {
        let mut count = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM notifications");
        Self::push_filters(&mut count, user_id, filter);
        let total: i64 = count
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("Failed to count notifications", e))?;

        let mut select = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {} FROM notifications",
            NOTIFICATION_COLUMNS
        ));
        Self::push_filters(&mut select, user_id, filter);
        select
            .push(" ORDER BY created_at DESC LIMIT ")
            .push_bind(pagination.limit_i64())
            .push(" OFFSET ")
            .push_bind(pagination.offset());
        let rows = select
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Failed to list notifications", e))?;

        let items = rows
            .iter()
            .map(Self::row_to_notification)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(PaginatedResponse::new(items, pagination, total))
    }

    async fn list_all(&self, user_id: Uuid) -> Result<Vec<Notification>, DomainError> {
        let query = format!(
            "SELECT {} FROM notifications WHERE user_id = ? ORDER BY created_at DESC",
            NOTIFICATION_COLUMNS
        );
        let rows = sqlx::query(&query)
            .bind(user_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Failed to list notifications", e))?;

        rows.iter().map(Self::row_to_notification).collect()
    }

    async fn unread_count(&self, user_id: Uuid) -> Result<i64, DomainError> {
        sqlx::query_scalar("SELECT COUNT(*) FROM notifications WHERE user_id = ? AND is_read = 0")
            .bind(user_id.to_string())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("Failed to count unread notifications", e))
    }

    async fn create(&self, notification: Notification) -> Result<Notification, DomainError> {
        let query = r#"
            INSERT INTO notifications (
                id, user_id, title, message, type, priority, is_read,
                related_entity_type, related_entity_id, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(notification.id.to_string())
            .bind(notification.user_id.to_string())
            .bind(&notification.title)
            .bind(&notification.message)
            .bind(&notification.notification_type)
            .bind(&notification.priority)
            .bind(notification.is_read)
            .bind(&notification.related_entity_type)
            .bind(&notification.related_entity_id)
            .bind(ts(&notification.created_at))
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to create notification", e))?;

        Ok(notification)
    }

    async fn mark_read(&self, user_id: Uuid, id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query("UPDATE notifications SET is_read = 1 WHERE id = ? AND user_id = ?")
            .bind(id.to_string())
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to mark notification read", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn mark_all_read(&self, user_id: Uuid) -> Result<u64, DomainError> {
        let result =
            sqlx::query("UPDATE notifications SET is_read = 1 WHERE user_id = ? AND is_read = 0")
                .bind(user_id.to_string())
                .execute(&self.pool)
                .await
                .map_err(|e| db_error("Failed to mark notifications read", e))?;

        Ok(result.rows_affected())
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = ? AND user_id = ?")
            .bind(id.to_string())
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to delete notification", e))?;

        Ok(result.rows_affected() > 0)
    }
}
