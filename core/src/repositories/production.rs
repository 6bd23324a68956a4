//! Production record persistence contract.

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use agri_shared::types::{PaginatedResponse, Pagination};

use crate::domain::entities::common::ActivityItem;
use crate::domain::entities::production::{
    MonthlyProduction, Production, ProductionFilter, ProductionStatistics,
};
use crate::domain::value_objects::DateRange;
use crate::errors::DomainError;

#[async_trait]
pub trait ProductionRepository: Send + Sync {
    async fn list(
        &self,
        user_id: Uuid,
        filter: &ProductionFilter,
        pagination: Pagination,
    ) -> Result<PaginatedResponse<Production>, DomainError>;

    async fn list_all(&self, user_id: Uuid) -> Result<Vec<Production>, DomainError>;

    async fn find_by_id(&self, user_id: Uuid, id: Uuid)
        -> Result<Option<Production>, DomainError>;

    async fn create(&self, production: Production) -> Result<Production, DomainError>;

    async fn update(&self, production: Production) -> Result<Production, DomainError>;

    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<bool, DomainError>;

    async fn statistics(&self, user_id: Uuid) -> Result<ProductionStatistics, DomainError>;

    /// Distinct categories the user has recorded
    async fn categories(&self, user_id: Uuid) -> Result<Vec<String>, DomainError>;

    /// Amount per month and category for records harvested (or created) on or after `since`
    async fn monthly_by_category(
        &self,
        user_id: Uuid,
        since: NaiveDate,
    ) -> Result<Vec<MonthlyProduction>, DomainError>;

    /// Total amount produced within a date range
    async fn total_amount(&self, user_id: Uuid, range: DateRange) -> Result<f64, DomainError>;

    async fn recent_activity(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<ActivityItem>, DomainError>;
}
