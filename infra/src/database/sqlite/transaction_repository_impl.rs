//! SQLite implementation of the TransactionRepository trait.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::sqlite::{Sqlite, SqliteRow};
use sqlx::{QueryBuilder, SqlitePool};
use uuid::Uuid;

use agri_core::domain::entities::common::{ActivityItem, CategoryAmount};
use agri_core::domain::entities::transaction::{
    FinanceTotals, MonthlyFinance, Transaction, TransactionFilter, TransactionType,
    PENDING_STATUS,
};
use agri_core::domain::value_objects::DateRange;
use agri_core::errors::{DomainError, ResourceKind};
use agri_core::repositories::TransactionRepository;
use agri_shared::types::{PaginatedResponse, Pagination};

use super::rows::{column, date, date_column, db_error, ts, ts_column, uuid_column};

const TRANSACTION_COLUMNS: &str = r#"
    id, user_id, type, category, description, amount, currency, date, status,
    payment_method, receipt, notes, created_at, updated_at
"#;

pub struct SqliteTransactionRepository {
    pool: SqlitePool,
}

impl SqliteTransactionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_transaction(row: &SqliteRow) -> Result<Transaction, DomainError> {
        let raw_type: String = column(row, "type")?;
        let transaction_type = raw_type
            .parse::<TransactionType>()
            .map_err(|e| DomainError::internal(format!("Invalid transaction type: {}", e)))?;

        Ok(Transaction {
            id: uuid_column(row, "id")?,
            user_id: uuid_column(row, "user_id")?,
            transaction_type,
            category: column(row, "category")?,
            description: column(row, "description")?,
            amount: column(row, "amount")?,
            currency: column(row, "currency")?,
            date: date_column(row, "date")?,
            status: column(row, "status")?,
            payment_method: column(row, "payment_method")?,
            receipt: column(row, "receipt")?,
            notes: column(row, "notes")?,
            created_at: ts_column(row, "created_at")?,
            updated_at: ts_column(row, "updated_at")?,
        })
    }

    fn push_filters(
        builder: &mut QueryBuilder<'_, Sqlite>,
        user_id: Uuid,
        filter: &TransactionFilter,
    ) {
        builder.push(" WHERE user_id = ").push_bind(user_id.to_string());
        if let Some(transaction_type) = filter.transaction_type {
            builder
                .push(" AND type = ")
                .push_bind(transaction_type.as_str());
        }
        if let Some(category) = &filter.category {
            builder.push(" AND category = ").push_bind(category.clone());
        }
        if let Some(status) = &filter.status {
            builder.push(" AND status = ").push_bind(status.clone());
        }
        if let Some(start) = &filter.start_date {
            builder.push(" AND date >= ").push_bind(date(start));
        }
        if let Some(end) = &filter.end_date {
            builder.push(" AND date <= ").push_bind(date(end));
        }
    }
}

#[async_trait]
impl TransactionRepository for SqliteTransactionRepository {
    async fn list(
        &self,
        user_id: Uuid,
        filter: &TransactionFilter,
        pagination: Pagination,
    ) -> Result<PaginatedResponse<Transaction>, DomainError> {
        let mut count = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM transactions");
        Self::push_filters(&mut count, user_id, filter);
        let total: i64 = count
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("Failed to count transactions", e))?;

        let mut select = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {} FROM transactions",
            TRANSACTION_COLUMNS
        ));
        Self::push_filters(&mut select, user_id, filter);
        select
            .push(" ORDER BY date DESC, created_at DESC LIMIT ")
            .push_bind(pagination.limit_i64())
            .push(" OFFSET ")
            .push_bind(pagination.offset());
        let rows = select
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Failed to list transactions", e))?;

        let items = rows
            .iter()
            .map(Self::row_to_transaction)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(PaginatedResponse::new(items, pagination, total))
    }

    async fn list_all(&self, user_id: Uuid) -> Result<Vec<Transaction>, DomainError> {
        let query = format!(
            "SELECT {} FROM transactions WHERE user_id = ? ORDER BY date DESC, created_at DESC",
            TRANSACTION_COLUMNS
        );
        let rows = sqlx::query(&query)
            .bind(user_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Failed to list transactions", e))?;

        rows.iter().map(Self::row_to_transaction).collect()
    }

    async fn find_by_id(
        &self,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Transaction>, DomainError> {
        let query = format!(
            "SELECT {} FROM transactions WHERE id = ? AND user_id = ?",
            TRANSACTION_COLUMNS
        );
        let row = sqlx::query(&query)
            .bind(id.to_string())
            .bind(user_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to load transaction", e))?;

        row.as_ref().map(Self::row_to_transaction).transpose()
    }

    async fn create(&self, transaction: Transaction) -> Result<Transaction, DomainError> {
        let query = r#"
            INSERT INTO transactions (
                id, user_id, type, category, description, amount, currency, date, status,
                payment_method, receipt, notes, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(transaction.id.to_string())
            .bind(transaction.user_id.to_string())
            .bind(transaction.transaction_type.as_str())
            .bind(&transaction.category)
            .bind(&transaction.description)
            .bind(transaction.amount)
            .bind(&transaction.currency)
            .bind(date(&transaction.date))
            .bind(&transaction.status)
            .bind(&transaction.payment_method)
            .bind(&transaction.receipt)
            .bind(&transaction.notes)
            .bind(ts(&transaction.created_at))
            .bind(ts(&transaction.updated_at))
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to create transaction", e))?;

        Ok(transaction)
    }

    async fn update(&self, transaction: Transaction) -> Result<Transaction, DomainError> {
        let query = r#"
            UPDATE transactions SET
                type = ?, category = ?, description = ?, amount = ?, currency = ?, date = ?,
                status = ?, payment_method = ?, receipt = ?, notes = ?, updated_at = ?
            WHERE id = ? AND user_id = ?
        "#;

        let result = sqlx::query(query)
            .bind(transaction.transaction_type.as_str())
            .bind(&transaction.category)
            .bind(&transaction.description)
            .bind(transaction.amount)
            .bind(&transaction.currency)
            .bind(date(&transaction.date))
            .bind(&transaction.status)
            .bind(&transaction.payment_method)
            .bind(&transaction.receipt)
            .bind(&transaction.notes)
            .bind(ts(&transaction.updated_at))
            .bind(transaction.id.to_string())
            .bind(transaction.user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to update transaction", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(ResourceKind::Transaction));
        }
        Ok(transaction)
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM transactions WHERE id = ? AND user_id = ?")
            .bind(id.to_string())
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to delete transaction", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn totals(&self, user_id: Uuid, range: DateRange) -> Result<FinanceTotals, DomainError> {
        let (income, expense, pending, count): (f64, f64, f64, i64) = sqlx::query_as(
            r#"
            SELECT COALESCE(SUM(CASE WHEN type = 'income' THEN amount ELSE 0.0 END), 0.0),
                   COALESCE(SUM(CASE WHEN type = 'expense' THEN amount ELSE 0.0 END), 0.0),
                   COALESCE(SUM(CASE WHEN status = ? THEN amount ELSE 0.0 END), 0.0),
                   COUNT(*)
            FROM transactions
            WHERE user_id = ? AND date >= ? AND date < ?
            "#,
        )
        .bind(PENDING_STATUS)
        .bind(user_id.to_string())
        .bind(date(&range.start))
        .bind(date(&range.end))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("Failed to compute finance totals", e))?;

        Ok(FinanceTotals {
            income,
            expense,
            pending,
            count,
        })
    }

    async fn monthly(
        &self,
        user_id: Uuid,
        since: NaiveDate,
    ) -> Result<Vec<MonthlyFinance>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT strftime('%Y-%m', date) AS month,
                   COALESCE(SUM(CASE WHEN type = 'income' THEN amount ELSE 0.0 END), 0.0) AS income,
                   COALESCE(SUM(CASE WHEN type = 'expense' THEN amount ELSE 0.0 END), 0.0) AS expense
            FROM transactions
            WHERE user_id = ? AND date >= ?
            GROUP BY month
            ORDER BY month
            "#,
        )
        .bind(user_id.to_string())
        .bind(date(&since))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to group transactions by month", e))?;

        rows.iter()
            .map(|row| {
                Ok(MonthlyFinance {
                    month: column(row, "month")?,
                    income: column(row, "income")?,
                    expense: column(row, "expense")?,
                })
            })
            .collect()
    }

    async fn by_category(
        &self,
        user_id: Uuid,
        transaction_type: TransactionType,
        since: NaiveDate,
    ) -> Result<Vec<CategoryAmount>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT category, COUNT(*) AS count, COALESCE(SUM(amount), 0.0) AS amount
            FROM transactions
            WHERE user_id = ? AND type = ? AND date >= ?
            GROUP BY category
            ORDER BY amount DESC
            "#,
        )
        .bind(user_id.to_string())
        .bind(transaction_type.as_str())
        .bind(date(&since))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to group transactions by category", e))?;

        rows.iter()
            .map(|row| {
                Ok(CategoryAmount {
                    category: column(row, "category")?,
                    count: column(row, "count")?,
                    amount: column(row, "amount")?,
                })
            })
            .collect()
    }

    async fn recent_activity(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<ActivityItem>, DomainError> {
        let query = format!(
            "SELECT {} FROM transactions WHERE user_id = ? ORDER BY created_at DESC LIMIT ?",
            TRANSACTION_COLUMNS
        );
        let rows = sqlx::query(&query)
            .bind(user_id.to_string())
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Failed to load transaction activity", e))?;

        rows.iter()
            .map(|row| {
                let transaction = Self::row_to_transaction(row)?;
                let title = match transaction.transaction_type {
                    TransactionType::Income => "Income recorded",
                    TransactionType::Expense => "Expense recorded",
                };
                Ok(ActivityItem {
                    id: transaction.id,
                    activity_type: format!("transaction_{}", transaction.transaction_type),
                    title: title.to_string(),
                    description: format!(
                        "{} ({:.2} {})",
                        transaction.description, transaction.amount, transaction.currency
                    ),
                    date: transaction.created_at,
                    entity_type: "transaction".to_string(),
                })
            })
            .collect()
    }
}
