//! SQLite implementation of the UserRepository trait.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::SqlitePool;
use uuid::Uuid;

use agri_core::domain::entities::user::{User, UserRole};
use agri_core::errors::{AuthError, DomainError, ResourceKind};
use agri_core::repositories::UserRepository;

use super::rows::{column, db_error, is_unique_violation, ts, ts_column, uuid_column};

const USER_COLUMNS: &str = r#"
    id, name, email, password, avatar, role, farm_name, location,
    is_verified, created_at, updated_at
"#;

/// SQLite implementation of UserRepository
pub struct SqliteUserRepository {
    /// Database connection pool
    pool: SqlitePool,
}

impl SqliteUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Convert database row to User entity
    fn row_to_user(row: &SqliteRow) -> Result<User, DomainError> {
        let role: String = column(row, "role")?;

        Ok(User {
            id: uuid_column(row, "id")?,
            name: column(row, "name")?,
            email: column(row, "email")?,
            password_hash: column(row, "password")?,
            avatar: column(row, "avatar")?,
            role: role.parse().unwrap_or(UserRole::Farmer),
            farm_name: column(row, "farm_name")?,
            location: column(row, "location")?,
            is_verified: column(row, "is_verified")?,
            created_at: ts_column(row, "created_at")?,
            updated_at: ts_column(row, "updated_at")?,
        })
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        let query = format!("SELECT {} FROM users WHERE id = ? LIMIT 1", USER_COLUMNS);

        let result = sqlx::query(&query)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to load user", e))?;

        result.as_ref().map(Self::row_to_user).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let query = format!("SELECT {} FROM users WHERE email = ? LIMIT 1", USER_COLUMNS);

        let result = sqlx::query(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to load user by email", e))?;

        result.as_ref().map(Self::row_to_user).transpose()
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        let query = r#"
            INSERT INTO users (
                id, name, email, password, avatar, role, farm_name, location,
                is_verified, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(user.id.to_string())
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(&user.avatar)
            .bind(user.role.as_str())
            .bind(&user.farm_name)
            .bind(&user.location)
            .bind(user.is_verified)
            .bind(ts(&user.created_at))
            .bind(ts(&user.updated_at))
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    DomainError::Auth(AuthError::EmailExists)
                } else {
                    db_error("Failed to create user", e)
                }
            })?;

        tracing::info!(user_id = %user.id, "User created");
        Ok(user)
    }

    async fn update(&self, mut user: User) -> Result<User, DomainError> {
        user.updated_at = Utc::now();

        let query = r#"
            UPDATE users SET
                name = ?,
                avatar = ?,
                role = ?,
                farm_name = ?,
                location = ?,
                is_verified = ?,
                updated_at = ?
            WHERE id = ?
        "#;

        let result = sqlx::query(query)
            .bind(&user.name)
            .bind(&user.avatar)
            .bind(user.role.as_str())
            .bind(&user.farm_name)
            .bind(&user.location)
            .bind(user.is_verified)
            .bind(ts(&user.updated_at))
            .bind(user.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to update user", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(ResourceKind::User));
        }
        Ok(user)
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<(), DomainError> {
        let result = sqlx::query("UPDATE users SET password = ?, updated_at = ? WHERE id = ?")
            .bind(password_hash)
            .bind(ts(&Utc::now()))
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to update password", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(ResourceKind::User));
        }
        Ok(())
    }
}
