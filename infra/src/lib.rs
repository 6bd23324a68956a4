//! # Infrastructure Layer
//!
//! Concrete storage for the farm management backend. It provides the
//! SQLite connection pool, the idempotent schema bootstrap and `sqlx`
//! implementations of every repository contract defined in `agri_core`.

pub mod database;

use std::sync::Arc;

use sqlx::SqlitePool;

use agri_core::repositories::Repositories;

pub use database::{initialize_schema, DatabasePool, PoolStatistics};
use database::sqlite::{
    SqliteEventRepository, SqliteLandRepository, SqliteLivestockRepository,
    SqliteNotificationRepository, SqliteProductionRepository, SqliteTransactionRepository,
    SqliteUserRepository,
};

/// Builds the full repository set over one pool
pub fn build_repositories(pool: &SqlitePool) -> Repositories {
    Repositories {
        users: Arc::new(SqliteUserRepository::new(pool.clone())),
        lands: Arc::new(SqliteLandRepository::new(pool.clone())),
        livestock: Arc::new(SqliteLivestockRepository::new(pool.clone())),
        production: Arc::new(SqliteProductionRepository::new(pool.clone())),
        transactions: Arc::new(SqliteTransactionRepository::new(pool.clone())),
        events: Arc::new(SqliteEventRepository::new(pool.clone())),
        notifications: Arc::new(SqliteNotificationRepository::new(pool.clone())),
    }
}

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection or query error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Schema bootstrap error
    #[error("Schema error: {0}")]
    Schema(String),
}
