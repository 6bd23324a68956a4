//! Land parcel persistence contract.

use async_trait::async_trait;
use uuid::Uuid;

use agri_shared::types::{PaginatedResponse, Pagination};

use crate::domain::entities::land::{
    Land, LandActivity, LandFilter, LandProductivity, LandStatistics,
};
use crate::errors::DomainError;

/// Every method is scoped to the owning user; rows of other users behave as
/// if they did not exist.
#[async_trait]
pub trait LandRepository: Send + Sync {
    async fn list(
        &self,
        user_id: Uuid,
        filter: &LandFilter,
        pagination: Pagination,
    ) -> Result<PaginatedResponse<Land>, DomainError>;

    /// All lands of a user, newest first (backups and analysis)
    async fn list_all(&self, user_id: Uuid) -> Result<Vec<Land>, DomainError>;

    async fn find_by_id(&self, user_id: Uuid, id: Uuid) -> Result<Option<Land>, DomainError>;

    async fn create(&self, land: Land) -> Result<Land, DomainError>;

    async fn update(&self, land: Land) -> Result<Land, DomainError>;

    /// # Returns
    /// * `Ok(true)` - Land deleted along with its activities
    /// * `Ok(false)` - No such land for this user
    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<bool, DomainError>;

    async fn statistics(&self, user_id: Uuid) -> Result<LandStatistics, DomainError>;

    /// Production totals per land, joined through `production.land_id`
    async fn productivity_analysis(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<LandProductivity>, DomainError>;

    async fn list_activities(&self, land_id: Uuid) -> Result<Vec<LandActivity>, DomainError>;

    /// Stores an activity and stamps the parcel's `last_activity`
    async fn add_activity(&self, activity: LandActivity) -> Result<LandActivity, DomainError>;
}
