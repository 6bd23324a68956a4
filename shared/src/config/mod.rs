//! Configuration module with business-specific sub-modules
//!
//! - `auth` - JWT signing, token lifetime and password hashing
//! - `database` - SQLite connection and pool configuration
//! - `environment` - Environment detection
//! - `logging` - Tracing subscriber settings
//! - `server` - HTTP server and CORS configuration

pub mod auth;
pub mod database;
pub mod environment;
pub mod logging;
pub mod server;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use auth::{AuthConfig, JwtConfig};
pub use database::DatabaseConfig;
pub use environment::Environment;
pub use logging::{LogFormat, LoggingConfig};
pub use server::{CorsConfig, ServerConfig};

/// Configuration problems that must stop the process from starting
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("JWT_SECRET is unset or uses the built-in default; refusing to start in {0}")]
    InsecureJwtSecret(Environment),

    #[error("Invalid configuration value for {key}: {message}")]
    Invalid { key: String, message: String },
}

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Authentication configuration
    pub auth: AuthConfig,

    /// CORS configuration
    #[serde(default)]
    pub cors: CorsConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let env = Environment::default();
        Self {
            environment: env,
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            auth: AuthConfig::default(),
            cors: CorsConfig::default(),
            logging: LoggingConfig::for_environment(env),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// Call `dotenvy::dotenv()` first if a `.env` file should be honoured.
    pub fn from_env() -> Self {
        let environment = Environment::from_env();
        Self {
            environment,
            server: ServerConfig::from_env(),
            database: DatabaseConfig::from_env(),
            auth: AuthConfig::from_env(),
            cors: CorsConfig::from_env(),
            logging: LoggingConfig::from_env(environment),
        }
    }

    /// Configuration for tests: in-memory database, cheap bcrypt, fixed secret
    pub fn for_tests() -> Self {
        Self {
            environment: Environment::Staging,
            database: DatabaseConfig::in_memory(),
            auth: AuthConfig {
                jwt: JwtConfig::new("test-secret-for-integration-tests"),
                ..AuthConfig::default()
            }
            .with_bcrypt_cost(4),
            ..Self::default()
        }
    }

    /// Check the configuration for unsafe values
    ///
    /// The default JWT secret is rejected in production and reported with a
    /// warning everywhere else.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.jwt.is_using_default_secret() {
            if self.environment.is_production() {
                return Err(ConfigError::InsecureJwtSecret(self.environment));
            }
            tracing::warn!(
                environment = %self.environment,
                "JWT_SECRET is not set; tokens are signed with the public default secret"
            );
        }

        if self.auth.jwt.expiry_seconds <= 0 {
            return Err(ConfigError::Invalid {
                key: "JWT_EXPIRY".to_string(),
                message: "token lifetime must be positive".to_string(),
            });
        }

        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid {
                key: "DATABASE_MAX_CONNECTIONS".to_string(),
                message: "at least one connection is required".to_string(),
            });
        }

        Ok(())
    }
}
