//! Database module - SQLite implementations using SQLx
//!
//! - Connection pool management
//! - Schema bootstrap
//! - Repository implementations

pub mod connection;
pub mod schema;
pub mod sqlite;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use connection::{DatabasePool, PoolStatistics};
pub use schema::initialize_schema;
