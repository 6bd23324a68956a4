//! Notification persistence contract.

use async_trait::async_trait;
use uuid::Uuid;

use agri_shared::types::{PaginatedResponse, Pagination};

use crate::domain::entities::notification::{Notification, NotificationFilter};
use crate::errors::DomainError;

#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Notifications ordered newest first
    async fn list(
        &self,
        user_id: Uuid,
        filter: &NotificationFilter,
        pagination: Pagination,
    ) -> Result<PaginatedResponse<Notification>, DomainError>;

    async fn list_all(&self, user_id: Uuid) -> Result<Vec<Notification>, DomainError>;

    async fn unread_count(&self, user_id: Uuid) -> Result<i64, DomainError>;

    async fn create(&self, notification: Notification) -> Result<Notification, DomainError>;

    /// # Returns
    /// * `Ok(false)` - No such notification for this user
    async fn mark_read(&self, user_id: Uuid, id: Uuid) -> Result<bool, DomainError>;

    /// Number of notifications that changed from unread to read
    async fn mark_all_read(&self, user_id: Uuid) -> Result<u64, DomainError>;

    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<bool, DomainError>;
}
