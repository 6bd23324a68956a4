//! SQLite implementation of the LivestockRepository trait.

use async_trait::async_trait;
use sqlx::sqlite::{Sqlite, SqliteRow};
use sqlx::{QueryBuilder, SqlitePool};
use uuid::Uuid;

use agri_core::domain::entities::common::{ActivityItem, CategoryCount};
use agri_core::domain::entities::livestock::{
    Animal, AnimalFilter, HealthRecord, LivestockStatistics, MilkRecord,
};
use agri_core::errors::{DomainError, ResourceKind};
use agri_core::repositories::LivestockRepository;
use agri_shared::types::{PaginatedResponse, Pagination};

use super::rows::{
    category_counts, column, date, date_column, db_error, is_unique_violation, opt_date,
    opt_date_column, ts, ts_column, uuid_column,
};

const ANIMAL_COLUMNS: &str = r#"
    id, user_id, tag_number, type, breed, gender, birth_date, weight, health_status,
    location, mother, father, notes, created_at, updated_at
"#;

pub struct SqliteLivestockRepository {
    pool: SqlitePool,
}

impl SqliteLivestockRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_animal(row: &SqliteRow) -> Result<Animal, DomainError> {
        Ok(Animal {
            id: uuid_column(row, "id")?,
            user_id: uuid_column(row, "user_id")?,
            tag_number: column(row, "tag_number")?,
            animal_type: column(row, "type")?,
            breed: column(row, "breed")?,
            gender: column(row, "gender")?,
            birth_date: opt_date_column(row, "birth_date")?,
            weight: column(row, "weight")?,
            health_status: column(row, "health_status")?,
            location: column(row, "location")?,
            mother: column(row, "mother")?,
            father: column(row, "father")?,
            notes: column(row, "notes")?,
            created_at: ts_column(row, "created_at")?,
            updated_at: ts_column(row, "updated_at")?,
        })
    }

    fn row_to_health_record(row: &SqliteRow) -> Result<HealthRecord, DomainError> {
        Ok(HealthRecord {
            id: uuid_column(row, "id")?,
            livestock_id: uuid_column(row, "livestock_id")?,
            record_type: column(row, "type")?,
            description: column(row, "description")?,
            date: date_column(row, "date")?,
            veterinarian: column(row, "veterinarian")?,
            cost: column(row, "cost")?,
            notes: column(row, "notes")?,
            next_checkup: opt_date_column(row, "next_checkup")?,
            created_at: ts_column(row, "created_at")?,
        })
    }

    fn row_to_milk_record(row: &SqliteRow) -> Result<MilkRecord, DomainError> {
        Ok(MilkRecord {
            id: uuid_column(row, "id")?,
            livestock_id: uuid_column(row, "livestock_id")?,
            date: date_column(row, "date")?,
            amount: column(row, "amount")?,
            quality: column(row, "quality")?,
            notes: column(row, "notes")?,
            created_at: ts_column(row, "created_at")?,
        })
    }

    fn push_filters(builder: &mut QueryBuilder<'_, Sqlite>, user_id: Uuid, filter: &AnimalFilter) {
        builder.push(" WHERE user_id = ").push_bind(user_id.to_string());
        if let Some(animal_type) = &filter.animal_type {
            builder.push(" AND type = ").push_bind(animal_type.clone());
        }
        if let Some(status) = &filter.health_status {
            builder.push(" AND health_status = ").push_bind(status.clone());
        }
        if let Some(search) = &filter.search {
            let pattern = format!("%{}%", search);
            builder
                .push(" AND (tag_number LIKE ")
                .push_bind(pattern.clone())
                .push(" OR breed LIKE ")
                .push_bind(pattern)
                .push(")");
        }
    }

    async fn grouped_counts(&self, user_id: Uuid, column: &str) -> Result<Vec<CategoryCount>, DomainError> {
        let query = format!(
            "SELECT {col} AS name, COUNT(*) AS count FROM livestock WHERE user_id = ? GROUP BY {col} ORDER BY count DESC, name",
            col = column
        );
        let rows = sqlx::query(&query)
            .bind(user_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Failed to group livestock", e))?;

        category_counts(&rows)
    }
}

#[async_trait]
impl LivestockRepository for SqliteLivestockRepository {
    async fn list(
        &self,
        user_id: Uuid,
        filter: &AnimalFilter,
        pagination: Pagination,
    ) -> Result<PaginatedResponse<Animal>, DomainError> {
        let mut count = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM livestock");
        Self::push_filters(&mut count, user_id, filter);
        let total: i64 = count
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("Failed to count livestock", e))?;

        let mut select =
            QueryBuilder::<Sqlite>::new(format!("SELECT {} FROM livestock", ANIMAL_COLUMNS));
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
            .map_err(|e| db_error("Failed to list livestock", e))?;

        let items = rows.iter().map(Self::row_to_animal).collect::<Result<Vec<_>, _>>()?;
        Ok(PaginatedResponse::new(items, pagination, total))
    }

    async fn list_all(&self, user_id: Uuid) -> Result<Vec<Animal>, DomainError> {
        let query = format!(
            "SELECT {} FROM livestock WHERE user_id = ? ORDER BY created_at DESC",
            ANIMAL_COLUMNS
        );
        let rows = sqlx::query(&query)
            .bind(user_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Failed to list livestock", e))?;

        rows.iter().map(Self::row_to_animal).collect()
    }

    async fn find_by_id(&self, user_id: Uuid, id: Uuid) -> Result<Option<Animal>, DomainError> {
        let query = format!(
            "SELECT {} FROM livestock WHERE id = ? AND user_id = ?",
            ANIMAL_COLUMNS
        );
        let row = sqlx::query(&query)
            .bind(id.to_string())
            .bind(user_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to load animal", e))?;

        row.as_ref().map(Self::row_to_animal).transpose()
    }

    async fn tag_exists(&self, tag_number: &str) -> Result<bool, DomainError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM livestock WHERE tag_number = ?")
            .bind(tag_number)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("Failed to check tag number", e))?;

        Ok(count > 0)
    }

    async fn create(&self, animal: Animal) -> Result<Animal, DomainError> {
        let query = r#"
            INSERT INTO livestock (
                id, user_id, tag_number, type, breed, gender, birth_date, weight, health_status,
                location, mother, father, notes, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(animal.id.to_string())
            .bind(animal.user_id.to_string())
            .bind(&animal.tag_number)
            .bind(&animal.animal_type)
            .bind(&animal.breed)
            .bind(&animal.gender)
            .bind(opt_date(&animal.birth_date))
            .bind(animal.weight)
            .bind(&animal.health_status)
            .bind(&animal.location)
            .bind(&animal.mother)
            .bind(&animal.father)
            .bind(&animal.notes)
            .bind(ts(&animal.created_at))
            .bind(ts(&animal.updated_at))
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    DomainError::Conflict {
                        resource: ResourceKind::Animal,
                        message: format!("tag number {} already exists", animal.tag_number),
                    }
                } else {
                    db_error("Failed to create animal", e)
                }
            })?;

        Ok(animal)
    }

    async fn update(&self, animal: Animal) -> Result<Animal, DomainError> {
        let query = r#"
            UPDATE livestock SET
                tag_number = ?, type = ?, breed = ?, gender = ?, birth_date = ?, weight = ?,
                health_status = ?, location = ?, mother = ?, father = ?, notes = ?, updated_at = ?
            WHERE id = ? AND user_id = ?
        "#;

        let result = sqlx::query(query)
            .bind(&animal.tag_number)
            .bind(&animal.animal_type)
            .bind(&animal.breed)
            .bind(&animal.gender)
            .bind(opt_date(&animal.birth_date))
            .bind(animal.weight)
            .bind(&animal.health_status)
            .bind(&animal.location)
            .bind(&animal.mother)
            .bind(&animal.father)
            .bind(&animal.notes)
            .bind(ts(&animal.updated_at))
            .bind(animal.id.to_string())
            .bind(animal.user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    DomainError::Conflict {
                        resource: ResourceKind::Animal,
                        message: format!("tag number {} already exists", animal.tag_number),
                    }
                } else {
                    db_error("Failed to update animal", e)
                }
            })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(ResourceKind::Animal));
        }
        Ok(animal)
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM livestock WHERE id = ? AND user_id = ?")
            .bind(id.to_string())
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to delete animal", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn statistics(&self, user_id: Uuid) -> Result<LivestockStatistics, DomainError> {
        let (total, average_weight): (i64, f64) = sqlx::query_as(
            "SELECT COUNT(*), COALESCE(AVG(weight), 0.0) FROM livestock WHERE user_id = ?",
        )
        .bind(user_id.to_string())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("Failed to compute livestock statistics", e))?;

        Ok(LivestockStatistics {
            total,
            by_health_status: self.grouped_counts(user_id, "health_status").await?,
            by_type: self.grouped_counts(user_id, "type").await?,
            average_weight,
        })
    }

    async fn categories(&self, user_id: Uuid) -> Result<Vec<CategoryCount>, DomainError> {
        self.grouped_counts(user_id, "type").await
    }

    async fn list_health_records(
        &self,
        livestock_id: Uuid,
    ) -> Result<Vec<HealthRecord>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, livestock_id, type, description, date, veterinarian, cost, notes,
                   next_checkup, created_at
            FROM health_records
            WHERE livestock_id = ?
            ORDER BY date DESC, created_at DESC
            "#,
        )
        .bind(livestock_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list health records", e))?;

        rows.iter().map(Self::row_to_health_record).collect()
    }

    async fn add_health_record(&self, record: HealthRecord) -> Result<HealthRecord, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO health_records (
                id, livestock_id, type, description, date, veterinarian, cost, notes,
                next_checkup, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(record.id.to_string())
        .bind(record.livestock_id.to_string())
        .bind(&record.record_type)
        .bind(&record.description)
        .bind(date(&record.date))
        .bind(&record.veterinarian)
        .bind(record.cost)
        .bind(&record.notes)
        .bind(opt_date(&record.next_checkup))
        .bind(ts(&record.created_at))
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to add health record", e))?;

        Ok(record)
    }

    async fn list_milk_records(&self, livestock_id: Uuid) -> Result<Vec<MilkRecord>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, livestock_id, date, amount, quality, notes, created_at
            FROM milk_production
            WHERE livestock_id = ?
            ORDER BY date DESC, created_at DESC
            "#,
        )
        .bind(livestock_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list milk records", e))?;

        rows.iter().map(Self::row_to_milk_record).collect()
    }

    async fn add_milk_record(&self, record: MilkRecord) -> Result<MilkRecord, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO milk_production (id, livestock_id, date, amount, quality, notes, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(record.id.to_string())
        .bind(record.livestock_id.to_string())
        .bind(date(&record.date))
        .bind(record.amount)
        .bind(&record.quality)
        .bind(&record.notes)
        .bind(ts(&record.created_at))
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to add milk record", e))?;

        Ok(record)
    }

    async fn recent_activity(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<ActivityItem>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, tag_number, type, created_at FROM livestock
            WHERE user_id = ?
            ORDER BY created_at DESC
            LIMIT ?
            "#,
        )
        .bind(user_id.to_string())
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to load livestock activity", e))?;

        rows.iter()
            .map(|row| {
                let tag: String = column(row, "tag_number")?;
                let animal_type: String = column(row, "type")?;
                Ok(ActivityItem {
                    id: uuid_column(row, "id")?,
                    activity_type: "livestock_added".to_string(),
                    title: "New animal registered".to_string(),
                    description: format!("{} #{}", animal_type, tag),
                    date: ts_column(row, "created_at")?,
                    entity_type: "livestock".to_string(),
                })
            })
            .collect()
    }
}
