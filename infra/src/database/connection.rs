//! Database connection pool management
//!
//! Wraps a SQLx SQLite pool with configurable limits, health checks and an
//! in-memory variant for tests.

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{ConnectOptions, Row, SqlitePool};

use agri_shared::config::DatabaseConfig;

use crate::InfrastructureError;

/// URL of a private in-memory database
pub const IN_MEMORY_URL: &str = "sqlite::memory:";

/// Shared SQLite pool plus the settings it was opened with
#[derive(Clone)]
pub struct DatabasePool {
    pool: SqlitePool,
    config: DatabaseConfig,
}

impl DatabasePool {
    /// Opens the SQLite file named by `config.url` in WAL mode
    ///
    /// In-memory URLs are routed to the single-connection variant.
    pub async fn new(config: DatabaseConfig) -> Result<Self, InfrastructureError> {
        tracing::info!(
            max_connections = config.max_connections,
            "Opening SQLite pool"
        );

        if is_in_memory(&config.url) {
            return Self::in_memory_with(config).await;
        }

        let mut connect_options = Self::connect_options(&config)?
            .create_if_missing(config.create_if_missing)
            .journal_mode(SqliteJournalMode::Wal);
        if !config.enable_logging {
            connect_options = connect_options.disable_statement_logging();
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections.max(1))
            .acquire_timeout(Duration::from_secs(config.connect_timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .connect_with(connect_options)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to open SQLite pool");
                InfrastructureError::Database(e)
            })?;

        tracing::info!("SQLite pool ready");

        Ok(Self { pool, config })
    }

    /// Private in-memory database, used by tests
    pub async fn in_memory() -> Result<Self, InfrastructureError> {
        Self::in_memory_with(DatabaseConfig {
            url: IN_MEMORY_URL.to_string(),
            max_connections: 1,
            ..DatabaseConfig::default()
        })
        .await
    }

    // Every connection to `sqlite::memory:` opens a fresh database, so the
    // pool holds exactly one connection and never recycles it.
    async fn in_memory_with(config: DatabaseConfig) -> Result<Self, InfrastructureError> {
        let connect_options = Self::connect_options(&config)?.disable_statement_logging();

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(connect_options)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to open in-memory database");
                InfrastructureError::Database(e)
            })?;

        Ok(Self { pool, config })
    }

    fn connect_options(config: &DatabaseConfig) -> Result<SqliteConnectOptions, InfrastructureError> {
        SqliteConnectOptions::from_str(&config.url)
            .map(|options| options.foreign_keys(true))
            .map_err(|e| InfrastructureError::Config(format!("Invalid database URL: {}", e)))
    }

    /// Handle passed to the repositories and the schema bootstrap
    pub fn get_pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    /// `SELECT 1` round trip; `Ok(false)` if the answer is not 1
    pub async fn health_check(&self) -> Result<bool, InfrastructureError> {
        let row = sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Database health check failed");
                InfrastructureError::Database(e)
            })?;

        let healthy = row.try_get::<i64, _>(0).map(|v| v == 1).unwrap_or(false);
        if !healthy {
            tracing::warn!("Database health check returned an unexpected row");
        }
        Ok(healthy)
    }

    /// Snapshot of the pool counters shown by `/settings/system-info`
    pub fn get_statistics(&self) -> PoolStatistics {
        PoolStatistics {
            connections: self.pool.size(),
            idle_connections: self.pool.num_idle(),
            max_connections: self.pool.options().get_max_connections(),
        }
    }

    /// Waits for checked-out connections to return, then closes them
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("SQLite pool closed");
    }
}

fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStatistics {
    /// Open connections, idle or checked out
    pub connections: u32,
    pub idle_connections: usize,
    pub max_connections: u32,
}

impl std::fmt::Display for PoolStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{} connections open, {} idle",
            self.connections, self.max_connections, self.idle_connections
        )
    }
}
