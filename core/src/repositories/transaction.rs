//! Financial transaction persistence contract.

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use agri_shared::types::{PaginatedResponse, Pagination};

use crate::domain::entities::common::{ActivityItem, CategoryAmount};
use crate::domain::entities::transaction::{
    FinanceTotals, MonthlyFinance, Transaction, TransactionFilter, TransactionType,
};
use crate::domain::value_objects::DateRange;
use crate::errors::DomainError;

#[async_trait]
pub trait TransactionRepository: Send + Sync {
    async fn list(
        &self,
        user_id: Uuid,
        filter: &TransactionFilter,
        pagination: Pagination,
    ) -> Result<PaginatedResponse<Transaction>, DomainError>;

    async fn list_all(&self, user_id: Uuid) -> Result<Vec<Transaction>, DomainError>;

    async fn find_by_id(&self, user_id: Uuid, id: Uuid)
        -> Result<Option<Transaction>, DomainError>;

    async fn create(&self, transaction: Transaction) -> Result<Transaction, DomainError>;

    async fn update(&self, transaction: Transaction) -> Result<Transaction, DomainError>;

    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<bool, DomainError>;

    /// Income, expense and pending totals for transactions dated within `range`
    async fn totals(&self, user_id: Uuid, range: DateRange) -> Result<FinanceTotals, DomainError>;

    /// Income and expense per `YYYY-MM` for transactions dated on or after `since`.
    /// Months without transactions are omitted.
    async fn monthly(
        &self,
        user_id: Uuid,
        since: NaiveDate,
    ) -> Result<Vec<MonthlyFinance>, DomainError>;

    /// Amount per category of one transaction type since `since`, largest first
    async fn by_category(
        &self,
        user_id: Uuid,
        transaction_type: TransactionType,
        since: NaiveDate,
    ) -> Result<Vec<CategoryAmount>, DomainError>;

    async fn recent_activity(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<ActivityItem>, DomainError>;
}
