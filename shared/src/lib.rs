//! Shared configuration, envelope types and helpers for the farm management server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration loaded from the environment
//! - Error codes and the response envelope
//! - Pagination types
//! - Parsing and validation helpers

pub mod config;
pub mod errors;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, AuthConfig, ConfigError, CorsConfig, DatabaseConfig, Environment, JwtConfig,
    LogFormat, LoggingConfig, ServerConfig,
};
pub use errors::error_codes;
pub use types::{ApiResponse, ErrorDetail, PaginatedResponse, Pagination, PaginationMeta};
pub use utils::{duration, validation};
