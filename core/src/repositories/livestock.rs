//! Livestock persistence contract, including health and milk records.

use async_trait::async_trait;
use uuid::Uuid;

use agri_shared::types::{PaginatedResponse, Pagination};

use crate::domain::entities::common::{ActivityItem, CategoryCount};
use crate::domain::entities::livestock::{
    Animal, AnimalFilter, HealthRecord, LivestockStatistics, MilkRecord,
};
use crate::errors::DomainError;

#[async_trait]
pub trait LivestockRepository: Send + Sync {
    async fn list(
        &self,
        user_id: Uuid,
        filter: &AnimalFilter,
        pagination: Pagination,
    ) -> Result<PaginatedResponse<Animal>, DomainError>;

    async fn list_all(&self, user_id: Uuid) -> Result<Vec<Animal>, DomainError>;

    async fn find_by_id(&self, user_id: Uuid, id: Uuid) -> Result<Option<Animal>, DomainError>;

    /// Tag numbers are unique across the whole store
    async fn tag_exists(&self, tag_number: &str) -> Result<bool, DomainError>;

    /// # Returns
    /// * `Err(DomainError::Conflict)` - Tag number already in use
    async fn create(&self, animal: Animal) -> Result<Animal, DomainError>;

    async fn update(&self, animal: Animal) -> Result<Animal, DomainError>;

    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<bool, DomainError>;

    async fn statistics(&self, user_id: Uuid) -> Result<LivestockStatistics, DomainError>;

    /// Distinct animal types with head counts
    async fn categories(&self, user_id: Uuid) -> Result<Vec<CategoryCount>, DomainError>;

    async fn list_health_records(&self, livestock_id: Uuid)
        -> Result<Vec<HealthRecord>, DomainError>;

    async fn add_health_record(&self, record: HealthRecord) -> Result<HealthRecord, DomainError>;

    async fn list_milk_records(&self, livestock_id: Uuid) -> Result<Vec<MilkRecord>, DomainError>;

    async fn add_milk_record(&self, record: MilkRecord) -> Result<MilkRecord, DomainError>;

    /// Most recently registered animals as feed entries
    async fn recent_activity(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<ActivityItem>, DomainError>;
}
