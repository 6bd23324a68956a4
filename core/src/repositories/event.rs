//! Calendar event persistence contract.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use agri_shared::types::{PaginatedResponse, Pagination};

use crate::domain::entities::common::ActivityItem;
use crate::domain::entities::event::{Event, EventFilter, EventStatistics, EventStatus};
use crate::errors::DomainError;

#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Events ordered by start date, soonest first
    async fn list(
        &self,
        user_id: Uuid,
        filter: &EventFilter,
        pagination: Pagination,
    ) -> Result<PaginatedResponse<Event>, DomainError>;

    async fn list_all(&self, user_id: Uuid) -> Result<Vec<Event>, DomainError>;

    async fn find_by_id(&self, user_id: Uuid, id: Uuid) -> Result<Option<Event>, DomainError>;

    async fn create(&self, event: Event) -> Result<Event, DomainError>;

    async fn update(&self, event: Event) -> Result<Event, DomainError>;

    /// # Returns
    /// * `Ok(None)` - No such event for this user
    async fn update_status(
        &self,
        user_id: Uuid,
        id: Uuid,
        status: EventStatus,
    ) -> Result<Option<Event>, DomainError>;

    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<bool, DomainError>;

    /// Counts relative to `now`: overdue means open and already started,
    /// upcoming means open and starting within seven days
    async fn statistics(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<EventStatistics, DomainError>;

    async fn recent_activity(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<ActivityItem>, DomainError>;
}
