//! SQLite implementation of the LandRepository trait.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{Sqlite, SqliteRow};
use sqlx::{QueryBuilder, SqlitePool};
use uuid::Uuid;

use agri_core::domain::entities::land::{
    CropShare, GeoLocation, Land, LandActivity, LandFilter, LandProductivity, LandStatistics,
};
use agri_core::errors::{DomainError, ResourceKind};
use agri_core::repositories::LandRepository;
use agri_shared::types::{PaginatedResponse, Pagination};

use super::rows::{
    column, db_error, opt_date, opt_date_column, opt_ts, opt_ts_column, ts, ts_column,
    uuid_column,
};

const LAND_COLUMNS: &str = r#"
    id, user_id, name, area, unit, crop, status, last_activity, productivity,
    latitude, longitude, address, soil_type, irrigation_type, created_at, updated_at
"#;

pub struct SqliteLandRepository {
    pool: SqlitePool,
}

impl SqliteLandRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_land(row: &SqliteRow) -> Result<Land, DomainError> {
        let latitude: Option<f64> = column(row, "latitude")?;
        let longitude: Option<f64> = column(row, "longitude")?;
        let location = match (latitude, longitude) {
            (Some(latitude), Some(longitude)) => Some(GeoLocation {
                latitude,
                longitude,
                address: column(row, "address")?,
            }),
            _ => None,
        };

        Ok(Land {
            id: uuid_column(row, "id")?,
            user_id: uuid_column(row, "user_id")?,
            name: column(row, "name")?,
            area: column(row, "area")?,
            unit: column(row, "unit")?,
            crop: column(row, "crop")?,
            status: column(row, "status")?,
            last_activity: opt_ts_column(row, "last_activity")?,
            productivity: column(row, "productivity")?,
            location,
            soil_type: column(row, "soil_type")?,
            irrigation_type: column(row, "irrigation_type")?,
            created_at: ts_column(row, "created_at")?,
            updated_at: ts_column(row, "updated_at")?,
        })
    }

    fn row_to_activity(row: &SqliteRow) -> Result<LandActivity, DomainError> {
        Ok(LandActivity {
            id: uuid_column(row, "id")?,
            land_id: uuid_column(row, "land_id")?,
            activity_type: column(row, "type")?,
            description: column(row, "description")?,
            scheduled_date: opt_date_column(row, "scheduled_date")?,
            actual_date: opt_date_column(row, "actual_date")?,
            notes: column(row, "notes")?,
            cost: column(row, "cost")?,
            result: column(row, "result")?,
            created_at: ts_column(row, "created_at")?,
        })
    }

    fn push_filters(builder: &mut QueryBuilder<'_, Sqlite>, user_id: Uuid, filter: &LandFilter) {
        builder.push(" WHERE user_id = ").push_bind(user_id.to_string());
        if let Some(status) = &filter.status {
            builder.push(" AND status = ").push_bind(status.clone());
        }
        if let Some(crop) = &filter.crop {
            builder.push(" AND crop = ").push_bind(crop.clone());
        }
        if let Some(search) = &filter.search {
            builder
                .push(" AND name LIKE ")
                .push_bind(format!("%{}%", search));
        }
    }
}

#[async_trait]
impl LandRepository for SqliteLandRepository {
    async fn list(
        &self,
        user_id: Uuid,
        filter: &LandFilter,
        pagination: Pagination,
    ) -> Result<PaginatedResponse<Land>, DomainError> {
        let mut count = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM lands");
        Self::push_filters(&mut count, user_id, filter);
        let total: i64 = count
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("Failed to count lands", e))?;

        let mut select = QueryBuilder::<Sqlite>::new(format!("SELECT {} FROM lands", LAND_COLUMNS));
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
            .map_err(|e| db_error("Failed to list lands", e))?;

        let items = rows.iter().map(Self::row_to_land).collect::<Result<Vec<_>, _>>()?;
        Ok(PaginatedResponse::new(items, pagination, total))
    }

    async fn list_all(&self, user_id: Uuid) -> Result<Vec<Land>, DomainError> {
        let query = format!(
            "SELECT {} FROM lands WHERE user_id = ? ORDER BY created_at DESC",
            LAND_COLUMNS
        );
        let rows = sqlx::query(&query)
            .bind(user_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Failed to list lands", e))?;

        rows.iter().map(Self::row_to_land).collect()
    }

    async fn find_by_id(&self, user_id: Uuid, id: Uuid) -> Result<Option<Land>, DomainError> {
        let query = format!("SELECT {} FROM lands WHERE id = ? AND user_id = ?", LAND_COLUMNS);
        let row = sqlx::query(&query)
            .bind(id.to_string())
            .bind(user_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to load land", e))?;

        row.as_ref().map(Self::row_to_land).transpose()
    }

    async fn create(&self, land: Land) -> Result<Land, DomainError> {
        let query = r#"
            INSERT INTO lands (
                id, user_id, name, area, unit, crop, status, last_activity, productivity,
                latitude, longitude, address, soil_type, irrigation_type, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;
        let location = land.location.as_ref();

        sqlx::query(query)
            .bind(land.id.to_string())
            .bind(land.user_id.to_string())
            .bind(&land.name)
            .bind(land.area)
            .bind(&land.unit)
            .bind(&land.crop)
            .bind(&land.status)
            .bind(opt_ts(&land.last_activity))
            .bind(land.productivity)
            .bind(location.map(|l| l.latitude))
            .bind(location.map(|l| l.longitude))
            .bind(location.and_then(|l| l.address.clone()))
            .bind(&land.soil_type)
            .bind(&land.irrigation_type)
            .bind(ts(&land.created_at))
            .bind(ts(&land.updated_at))
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to create land", e))?;

        Ok(land)
    }

    async fn update(&self, land: Land) -> Result<Land, DomainError> {
        let query = r#"
            UPDATE lands SET
                name = ?, area = ?, unit = ?, crop = ?, status = ?, productivity = ?,
                latitude = ?, longitude = ?, address = ?, soil_type = ?, irrigation_type = ?,
                updated_at = ?
            WHERE id = ? AND user_id = ?
        "#;
        let location = land.location.as_ref();

        let result = sqlx::query(query)
            .bind(&land.name)
            .bind(land.area)
            .bind(&land.unit)
            .bind(&land.crop)
            .bind(&land.status)
            .bind(land.productivity)
            .bind(location.map(|l| l.latitude))
            .bind(location.map(|l| l.longitude))
            .bind(location.and_then(|l| l.address.clone()))
            .bind(&land.soil_type)
            .bind(&land.irrigation_type)
            .bind(ts(&land.updated_at))
            .bind(land.id.to_string())
            .bind(land.user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to update land", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(ResourceKind::Land));
        }
        Ok(land)
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM lands WHERE id = ? AND user_id = ?")
            .bind(id.to_string())
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to delete land", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn statistics(&self, user_id: Uuid) -> Result<LandStatistics, DomainError> {
        let (total_lands, total_area, active_lands, average_productivity): (i64, f64, i64, f64) =
            sqlx::query_as(
                r#"
                SELECT COUNT(*),
                       COALESCE(SUM(area), 0.0),
                       COALESCE(SUM(CASE WHEN status = 'active' THEN 1 ELSE 0 END), 0),
                       COALESCE(AVG(productivity), 0.0)
                FROM lands WHERE user_id = ?
                "#,
            )
            .bind(user_id.to_string())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("Failed to compute land statistics", e))?;

        let rows = sqlx::query(
            r#"
            SELECT crop, COUNT(*) AS count, COALESCE(SUM(area), 0.0) AS area
            FROM lands
            WHERE user_id = ? AND crop IS NOT NULL AND crop != ''
            GROUP BY crop
            ORDER BY area DESC
            "#,
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to compute crop distribution", e))?;

        let crop_distribution = rows
            .iter()
            .map(|row| {
                Ok(CropShare {
                    crop: column(row, "crop")?,
                    count: column(row, "count")?,
                    area: column(row, "area")?,
                })
            })
            .collect::<Result<Vec<_>, DomainError>>()?;

        Ok(LandStatistics {
            total_lands,
            total_area,
            active_lands,
            average_productivity,
            crop_distribution,
        })
    }

    async fn productivity_analysis(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<LandProductivity>, DomainError> {
        let query = format!(
            r#"
            SELECT {}, COALESCE((
                SELECT SUM(p.amount) FROM production p
                WHERE p.land_id = lands.id AND p.user_id = lands.user_id
            ), 0.0) AS total_production
            FROM lands WHERE user_id = ?
            ORDER BY name
            "#,
            LAND_COLUMNS
        );
        let rows = sqlx::query(&query)
            .bind(user_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Failed to analyse land productivity", e))?;

        rows.iter()
            .map(|row| {
                let land = Self::row_to_land(row)?;
                let total: f64 = column(row, "total_production")?;
                Ok(LandProductivity::new(&land, total))
            })
            .collect()
    }

    async fn list_activities(&self, land_id: Uuid) -> Result<Vec<LandActivity>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, land_id, type, description, scheduled_date, actual_date,
                   notes, cost, result, created_at
            FROM land_activities
            WHERE land_id = ?
            ORDER BY created_at DESC
            "#,
        )
        .bind(land_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list land activities", e))?;

        rows.iter().map(Self::row_to_activity).collect()
    }

    async fn add_activity(&self, activity: LandActivity) -> Result<LandActivity, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("Failed to begin transaction", e))?;

        sqlx::query(
            r#"
            INSERT INTO land_activities (
                id, land_id, type, description, scheduled_date, actual_date,
                notes, cost, result, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(activity.id.to_string())
        .bind(activity.land_id.to_string())
        .bind(&activity.activity_type)
        .bind(&activity.description)
        .bind(opt_date(&activity.scheduled_date))
        .bind(opt_date(&activity.actual_date))
        .bind(&activity.notes)
        .bind(activity.cost)
        .bind(&activity.result)
        .bind(ts(&activity.created_at))
        .execute(&mut *tx)
        .await
        .map_err(|e| db_error("Failed to add land activity", e))?;

        let now = ts(&Utc::now());
        sqlx::query("UPDATE lands SET last_activity = ?, updated_at = ? WHERE id = ?")
            .bind(&now)
            .bind(&now)
            .bind(activity.land_id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("Failed to stamp land activity", e))?;

        tx.commit()
            .await
            .map_err(|e| db_error("Failed to commit land activity", e))?;

        Ok(activity)
    }
}
