//! SQLite implementation of the EventRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sqlx::sqlite::{Sqlite, SqliteRow};
use sqlx::{QueryBuilder, SqlitePool};
use uuid::Uuid;

use agri_core::domain::entities::common::ActivityItem;
use agri_core::domain::entities::event::{Event, EventFilter, EventStatistics, EventStatus};
use agri_core::errors::{DomainError, ResourceKind};
use agri_core::repositories::EventRepository;
use agri_shared::types::{PaginatedResponse, Pagination};

use super::rows::{
    category_counts, column, db_error, opt_ts, opt_ts_column, ts, ts_column, uuid_column,
};

const EVENT_COLUMNS: &str = r#"
    id, user_id, title, description, type, start_date, end_date, is_all_day, status,
    priority, location, related_entity_type, related_entity_id, created_at, updated_at
"#;

const UPCOMING_WINDOW_DAYS: i64 = 7;

pub struct SqliteEventRepository {
    pool: SqlitePool,
}

impl SqliteEventRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_event(row: &SqliteRow) -> Result<Event, DomainError> {
        let status: String = column(row, "status")?;

        Ok(Event {
            id: uuid_column(row, "id")?,
            user_id: uuid_column(row, "user_id")?,
            title: column(row, "title")?,
            description: column(row, "description")?,
            event_type: column(row, "type")?,
            start_date: ts_column(row, "start_date")?,
            end_date: opt_ts_column(row, "end_date")?,
            is_all_day: column(row, "is_all_day")?,
            status: status
                .parse()
                .map_err(|e| DomainError::internal(format!("Invalid event status: {}", e)))?,
            priority: column(row, "priority")?,
            location: column(row, "location")?,
            related_entity_type: column(row, "related_entity_type")?,
            related_entity_id: column(row, "related_entity_id")?,
            created_at: ts_column(row, "created_at")?,
            updated_at: ts_column(row, "updated_at")?,
        })
    }

    fn push_filters(builder: &mut QueryBuilder<'_, Sqlite>, user_id: Uuid, filter: &EventFilter) {
        builder.push(" WHERE user_id = ").push_bind(user_id.to_string());
        if let Some(event_type) = &filter.event_type {
            builder.push(" AND type = ").push_bind(event_type.clone());
        }
        if let Some(status) = filter.status {
            builder.push(" AND status = ").push_bind(status.as_str());
        }
        if let Some(start) = &filter.start_date {
            builder.push(" AND start_date >= ").push_bind(ts(start));
        }
        if let Some(end) = &filter.end_date {
            builder.push(" AND start_date <= ").push_bind(ts(end));
        }
    }
}

#[async_trait]
impl EventRepository for SqliteEventRepository {
    async fn list(
        &self,
        user_id: Uuid,
        filter: &EventFilter,
        pagination: Pagination,
    ) -> Result<PaginatedResponse<Event>, DomainError> {
        let mut count = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM events");
        Self::push_filters(&mut count, user_id, filter);
        let total: i64 = count
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("Failed to count events", e))?;

        let mut select = QueryBuilder::<Sqlite>::new(format!("SELECT {} FROM events", EVENT_COLUMNS));
        Self::push_filters(&mut select, user_id, filter);
        select
            .push(" ORDER BY start_date ASC LIMIT ")
            .push_bind(pagination.limit_i64())
            .push(" OFFSET ")
            .push_bind(pagination.offset());
        let rows = select
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Failed to list events", e))?;

        let items = rows.iter().map(Self::row_to_event).collect::<Result<Vec<_>, _>>()?;
        Ok(PaginatedResponse::new(items, pagination, total))
    }

    async fn list_all(&self, user_id: Uuid) -> Result<Vec<Event>, DomainError> {
        let query = format!(
            "SELECT {} FROM events WHERE user_id = ? ORDER BY start_date ASC",
            EVENT_COLUMNS
        );
        let rows = sqlx::query(&query)
            .bind(user_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Failed to list events", e))?;

        rows.iter().map(Self::row_to_event).collect()
    }

    async fn find_by_id(&self, user_id: Uuid, id: Uuid) -> Result<Option<Event>, DomainError> {
        let query = format!("SELECT {} FROM events WHERE id = ? AND user_id = ?", EVENT_COLUMNS);
        let row = sqlx::query(&query)
            .bind(id.to_string())
            .bind(user_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to load event", e))?;

        row.as_ref().map(Self::row_to_event).transpose()
    }

    async fn create(&self, event: Event) -> Result<Event, DomainError> {
        let query = r#"
            INSERT INTO events (
                id, user_id, title, description, type, start_date, end_date, is_all_day, status,
                priority, location, related_entity_type, related_entity_id, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(event.id.to_string())
            .bind(event.user_id.to_string())
            .bind(&event.title)
            .bind(&event.description)
            .bind(&event.event_type)
            .bind(ts(&event.start_date))
            .bind(opt_ts(&event.end_date))
            .bind(event.is_all_day)
            .bind(event.status.as_str())
            .bind(&event.priority)
            .bind(&event.location)
            .bind(&event.related_entity_type)
            .bind(&event.related_entity_id)
            .bind(ts(&event.created_at))
            .bind(ts(&event.updated_at))
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to create event", e))?;

        Ok(event)
    }

    async fn update(&self, event: Event) -> Result<Event, DomainError> {
        let query = r#"
            UPDATE events SET
                title = ?, description = ?, type = ?, start_date = ?, end_date = ?,
                is_all_day = ?, status = ?, priority = ?, location = ?, updated_at = ?
            WHERE id = ? AND user_id = ?
        "#;

        let result = sqlx::query(query)
            .bind(&event.title)
            .bind(&event.description)
            .bind(&event.event_type)
            .bind(ts(&event.start_date))
            .bind(opt_ts(&event.end_date))
            .bind(event.is_all_day)
            .bind(event.status.as_str())
            .bind(&event.priority)
            .bind(&event.location)
            .bind(ts(&event.updated_at))
            .bind(event.id.to_string())
            .bind(event.user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to update event", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(ResourceKind::Event));
        }
        Ok(event)
    }

    async fn update_status(
        &self,
        user_id: Uuid,
        id: Uuid,
        status: EventStatus,
    ) -> Result<Option<Event>, DomainError> {
        let result = sqlx::query(
            "UPDATE events SET status = ?, updated_at = ? WHERE id = ? AND user_id = ?",
        )
        .bind(status.as_str())
        .bind(ts(&Utc::now()))
        .bind(id.to_string())
        .bind(user_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to update event status", e))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.find_by_id(user_id, id).await
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM events WHERE id = ? AND user_id = ?")
            .bind(id.to_string())
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to delete event", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn statistics(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<EventStatistics, DomainError> {
        let now_text = ts(&now);
        let horizon = ts(&(now + Duration::days(UPCOMING_WINDOW_DAYS)));

        let (total, pending, completed, overdue, upcoming): (i64, i64, i64, i64, i64) =
            sqlx::query_as(
                r#"
                SELECT COUNT(*),
                       COALESCE(SUM(CASE WHEN status = 'pending' THEN 1 ELSE 0 END), 0),
                       COALESCE(SUM(CASE WHEN status = 'completed' THEN 1 ELSE 0 END), 0),
                       COALESCE(SUM(CASE WHEN status IN ('pending', 'in_progress')
                                          AND start_date < ? THEN 1 ELSE 0 END), 0),
                       COALESCE(SUM(CASE WHEN status IN ('pending', 'in_progress')
                                          AND start_date >= ? AND start_date < ? THEN 1 ELSE 0 END), 0)
                FROM events WHERE user_id = ?
                "#,
            )
            .bind(&now_text)
            .bind(&now_text)
            .bind(&horizon)
            .bind(user_id.to_string())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("Failed to compute event statistics", e))?;

        let rows = sqlx::query(
            r#"
            SELECT type AS name, COUNT(*) AS count FROM events
            WHERE user_id = ?
            GROUP BY type
            ORDER BY count DESC, name
            "#,
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to group events", e))?;

        Ok(EventStatistics {
            total,
            pending,
            completed,
            overdue,
            upcoming,
            by_type: category_counts(&rows)?,
        })
    }

    async fn recent_activity(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<ActivityItem>, DomainError> {
        let query = format!(
            "SELECT {} FROM events WHERE user_id = ? ORDER BY created_at DESC LIMIT ?",
            EVENT_COLUMNS
        );
        let rows = sqlx::query(&query)
            .bind(user_id.to_string())
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Failed to load event activity", e))?;

        rows.iter()
            .map(|row| {
                let event = Self::row_to_event(row)?;
                Ok(ActivityItem {
                    id: event.id,
                    activity_type: "event_scheduled".to_string(),
                    title: event.title,
                    description: format!(
                        "{} on {}",
                        event.event_type,
                        event.start_date.format("%Y-%m-%d")
                    ),
                    date: event.created_at,
                    entity_type: "event".to_string(),
                })
            })
            .collect()
    }
}
