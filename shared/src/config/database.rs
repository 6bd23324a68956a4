//! Database configuration module

use serde::{Deserialize, Serialize};

/// Default on-disk database file
pub const DEFAULT_DB_PATH: &str = "./agri_management.db";

/// Database configuration for SQLite connections
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Database connection URL (`sqlite://path` or `sqlite::memory:`)
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Connection timeout in seconds
    pub connect_timeout: u64,

    /// Create the database file when it does not exist
    #[serde(default = "default_create_if_missing")]
    pub create_if_missing: bool,

    /// Enable SQL statement logging
    #[serde(default)]
    pub enable_logging: bool,

    /// Slow query threshold in milliseconds
    #[serde(default = "default_slow_query_threshold")]
    pub slow_query_threshold: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: sqlite_url(DEFAULT_DB_PATH),
            max_connections: 5,
            connect_timeout: 30,
            create_if_missing: default_create_if_missing(),
            enable_logging: false,
            slow_query_threshold: default_slow_query_threshold(),
        }
    }
}

impl DatabaseConfig {
    /// Create from environment variables
    ///
    /// `DATABASE_URL` wins over `DB_PATH`; both fall back to
    /// `./agri_management.db`.
    pub fn from_env() -> Self {
        let url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|u| !u.trim().is_empty())
            .or_else(|| {
                std::env::var("DB_PATH")
                    .ok()
                    .filter(|p| !p.trim().is_empty())
                    .map(|p| sqlite_url(&p))
            })
            .unwrap_or_else(|| sqlite_url(DEFAULT_DB_PATH));
        let max_connections = std::env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "5".to_string())
            .parse()
            .unwrap_or(5);
        let connect_timeout = std::env::var("DATABASE_CONNECT_TIMEOUT")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .unwrap_or(30);
        let enable_logging = std::env::var("DATABASE_LOGGING")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        Self {
            url,
            max_connections,
            connect_timeout,
            enable_logging,
            ..Default::default()
        }
    }

    /// Create a new database configuration with URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Private in-memory database; one connection so every query sees the
    /// same schema
    pub fn in_memory() -> Self {
        Self {
            url: String::from("sqlite::memory:"),
            max_connections: 1,
            ..Default::default()
        }
    }

    /// Set the maximum number of connections
    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Enable SQL query logging
    pub fn with_logging(mut self, enable: bool) -> Self {
        self.enable_logging = enable;
        self
    }

    /// Check whether this configuration points at an in-memory database
    pub fn is_in_memory(&self) -> bool {
        self.url.contains(":memory:") || self.url.contains("mode=memory")
    }
}

fn sqlite_url(path: &str) -> String {
    if path.starts_with("sqlite:") {
        path.to_string()
    } else {
        format!("sqlite://{}", path)
    }
}

fn default_create_if_missing() -> bool {
    true
}

fn default_slow_query_threshold() -> u64 {
    1000 // 1 second
}
