//! SQLite implementation of the ProductionRepository trait.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::sqlite::{Sqlite, SqliteRow};
use sqlx::{QueryBuilder, SqlitePool};
use uuid::Uuid;

use agri_core::domain::entities::common::{ActivityItem, CategoryAmount};
use agri_core::domain::entities::production::{
    MonthlyProduction, Production, ProductionFilter, ProductionStatistics,
};
use agri_core::domain::value_objects::DateRange;
use agri_core::errors::{DomainError, ResourceKind};
use agri_core::repositories::ProductionRepository;
use agri_shared::types::{PaginatedResponse, Pagination};

use super::rows::{
    column, date, db_error, opt_date, opt_date_column, opt_uuid_column, ts, ts_column,
    uuid_column,
};

const PRODUCTION_COLUMNS: &str = r#"
    id, user_id, land_id, name, category, amount, unit, harvest_date, quality,
    storage_location, status, price, notes, created_at, updated_at
"#;

/// Harvest date, or the creation day for records without one
const EFFECTIVE_DATE: &str = "COALESCE(harvest_date, substr(created_at, 1, 10))";

pub struct SqliteProductionRepository {
    pool: SqlitePool,
}

impl SqliteProductionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_production(row: &SqliteRow) -> Result<Production, DomainError> {
        Ok(Production {
            id: uuid_column(row, "id")?,
            user_id: uuid_column(row, "user_id")?,
            land_id: opt_uuid_column(row, "land_id")?,
            name: column(row, "name")?,
            category: column(row, "category")?,
            amount: column(row, "amount")?,
            unit: column(row, "unit")?,
            harvest_date: opt_date_column(row, "harvest_date")?,
            quality: column(row, "quality")?,
            storage_location: column(row, "storage_location")?,
            status: column(row, "status")?,
            price: column(row, "price")?,
            notes: column(row, "notes")?,
            created_at: ts_column(row, "created_at")?,
            updated_at: ts_column(row, "updated_at")?,
        })
    }

    fn push_filters(
        builder: &mut QueryBuilder<'_, Sqlite>,
        user_id: Uuid,
        filter: &ProductionFilter,
    ) {
        builder.push(" WHERE user_id = ").push_bind(user_id.to_string());
        if let Some(category) = &filter.category {
            builder.push(" AND category = ").push_bind(category.clone());
        }
        if let Some(status) = &filter.status {
            builder.push(" AND status = ").push_bind(status.clone());
        }
        if let Some(land_id) = filter.land_id {
            builder.push(" AND land_id = ").push_bind(land_id.to_string());
        }
    }
}

#[async_trait]
impl ProductionRepository for SqliteProductionRepository {
    async fn list(
        &self,
        user_id: Uuid,
        filter: &ProductionFilter,
        pagination: Pagination,
    ) -> Result<PaginatedResponse<Production>, DomainError> {
        let mut count = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM production");
        Self::push_filters(&mut count, user_id, filter);
        let total: i64 = count
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("Failed to count production", e))?;

        let mut select =
            QueryBuilder::<Sqlite>::new(format!("SELECT {} FROM production", PRODUCTION_COLUMNS));
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
            .map_err(|e| db_error("Failed to list production", e))?;

        let items = rows
            .iter()
            .map(Self::row_to_production)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(PaginatedResponse::new(items, pagination, total))
    }

    async fn list_all(&self, user_id: Uuid) -> Result<Vec<Production>, DomainError> {
        let query = format!(
            "SELECT {} FROM production WHERE user_id = ? ORDER BY created_at DESC",
            PRODUCTION_COLUMNS
        );
        let rows = sqlx::query(&query)
            .bind(user_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Failed to list production", e))?;

        rows.iter().map(Self::row_to_production).collect()
    }

    async fn find_by_id(
        &self,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Production>, DomainError> {
        let query = format!(
            "SELECT {} FROM production WHERE id = ? AND user_id = ?",
            PRODUCTION_COLUMNS
        );
        let row = sqlx::query(&query)
            .bind(id.to_string())
            .bind(user_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to load production", e))?;

        row.as_ref().map(Self::row_to_production).transpose()
    }

    async fn create(&self, production: Production) -> Result<Production, DomainError> {
        let query = r#"
            INSERT INTO production (
                id, user_id, land_id, name, category, amount, unit, harvest_date, quality,
                storage_location, status, price, notes, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(production.id.to_string())
            .bind(production.user_id.to_string())
            .bind(production.land_id.map(|id| id.to_string()))
            .bind(&production.name)
            .bind(&production.category)
            .bind(production.amount)
            .bind(&production.unit)
            .bind(opt_date(&production.harvest_date))
            .bind(&production.quality)
            .bind(&production.storage_location)
            .bind(&production.status)
            .bind(production.price)
            .bind(&production.notes)
            .bind(ts(&production.created_at))
            .bind(ts(&production.updated_at))
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to create production", e))?;

        Ok(production)
    }

    async fn update(&self, production: Production) -> Result<Production, DomainError> {
        let query = r#"
            UPDATE production SET
                land_id = ?, name = ?, category = ?, amount = ?, unit = ?, harvest_date = ?,
                quality = ?, storage_location = ?, status = ?, price = ?, notes = ?, updated_at = ?
            WHERE id = ? AND user_id = ?
        "#;

        let result = sqlx::query(query)
            .bind(production.land_id.map(|id| id.to_string()))
            .bind(&production.name)
            .bind(&production.category)
            .bind(production.amount)
            .bind(&production.unit)
            .bind(opt_date(&production.harvest_date))
            .bind(&production.quality)
            .bind(&production.storage_location)
            .bind(&production.status)
            .bind(production.price)
            .bind(&production.notes)
            .bind(ts(&production.updated_at))
            .bind(production.id.to_string())
            .bind(production.user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to update production", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(ResourceKind::Production));
        }
        Ok(production)
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM production WHERE id = ? AND user_id = ?")
            .bind(id.to_string())
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to delete production", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn statistics(&self, user_id: Uuid) -> Result<ProductionStatistics, DomainError> {
        let (total_products, total_amount, total_value): (i64, f64, f64) = sqlx::query_as(
            r#"
            SELECT COUNT(*),
                   COALESCE(SUM(amount), 0.0),
                   COALESCE(SUM(amount * COALESCE(price, 0.0)), 0.0)
            FROM production WHERE user_id = ?
            "#,
        )
        .bind(user_id.to_string())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("Failed to compute production statistics", e))?;

        let rows = sqlx::query(
            r#"
            SELECT category, COUNT(*) AS count, COALESCE(SUM(amount), 0.0) AS amount
            FROM production WHERE user_id = ?
            GROUP BY category
            ORDER BY amount DESC
            "#,
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to group production", e))?;

        let by_category = rows
            .iter()
            .map(|row| {
                Ok(CategoryAmount {
                    category: column(row, "category")?,
                    count: column(row, "count")?,
                    amount: column(row, "amount")?,
                })
            })
            .collect::<Result<Vec<_>, DomainError>>()?;

        Ok(ProductionStatistics {
            total_products,
            total_amount,
            total_value,
            by_category,
        })
    }

    async fn categories(&self, user_id: Uuid) -> Result<Vec<String>, DomainError> {
        sqlx::query_scalar(
            "SELECT DISTINCT category FROM production WHERE user_id = ? ORDER BY category",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list production categories", e))
    }

    async fn monthly_by_category(
        &self,
        user_id: Uuid,
        since: NaiveDate,
    ) -> Result<Vec<MonthlyProduction>, DomainError> {
        let query = format!(
            r#"
            SELECT strftime('%Y-%m', {date}) AS month, category,
                   COALESCE(SUM(amount), 0.0) AS amount
            FROM production
            WHERE user_id = ? AND {date} >= ?
            GROUP BY month, category
            ORDER BY month, category
            "#,
            date = EFFECTIVE_DATE
        );
        let rows = sqlx::query(&query)
            .bind(user_id.to_string())
            .bind(date(&since))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Failed to group production by month", e))?;

        rows.iter()
            .map(|row| {
                Ok(MonthlyProduction {
                    month: column(row, "month")?,
                    category: column(row, "category")?,
                    amount: column(row, "amount")?,
                })
            })
            .collect()
    }

    async fn total_amount(&self, user_id: Uuid, range: DateRange) -> Result<f64, DomainError> {
        let query = format!(
            "SELECT COALESCE(SUM(amount), 0.0) FROM production WHERE user_id = ? AND {date} >= ? AND {date} < ?",
            date = EFFECTIVE_DATE
        );
        sqlx::query_scalar(&query)
            .bind(user_id.to_string())
            .bind(date(&range.start))
            .bind(date(&range.end))
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("Failed to sum production", e))
    }

    async fn recent_activity(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<ActivityItem>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, amount, unit, created_at FROM production
            WHERE user_id = ?
            ORDER BY created_at DESC
            LIMIT ?
            "#,
        )
        .bind(user_id.to_string())
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to load production activity", e))?;

        rows.iter()
            .map(|row| {
                let name: String = column(row, "name")?;
                let amount: f64 = column(row, "amount")?;
                let unit: String = column(row, "unit")?;
                Ok(ActivityItem {
                    id: uuid_column(row, "id")?,
                    activity_type: "production_added".to_string(),
                    title: "Production recorded".to_string(),
                    description: format!("{}: {} {}", name, amount, unit),
                    date: ts_column(row, "created_at")?,
                    entity_type: "production".to_string(),
                })
            })
            .collect()
    }
}
