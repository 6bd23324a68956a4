//! Unit tests for database connection pool

use agri_shared::config::DatabaseConfig;

use crate::database::connection::{DatabasePool, PoolStatistics};

#[tokio::test]
async fn test_pool_creation_with_invalid_url() {
    let config = DatabaseConfig {
        url: "invalid://url".to_string(),
        max_connections: 1,
        connect_timeout: 5,
        ..DatabaseConfig::default()
    };

    let result = DatabasePool::new(config).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_in_memory_pool_health_check() {
    let pool = DatabasePool::in_memory().await.unwrap();
    assert!(pool.health_check().await.unwrap());
    assert_eq!(pool.get_statistics().max_connections, 1);
}

#[tokio::test]
async fn test_memory_url_routes_to_single_connection_pool() {
    let config = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 8,
        ..DatabaseConfig::default()
    };

    let pool = DatabasePool::new(config).await.unwrap();
    assert_eq!(pool.get_statistics().max_connections, 1);
}

#[tokio::test]
async fn test_foreign_keys_enabled() {
    let pool = DatabasePool::in_memory().await.unwrap();
    let enabled: i64 = sqlx::query_scalar("PRAGMA foreign_keys")
        .fetch_one(pool.get_pool())
        .await
        .unwrap();
    assert_eq!(enabled, 1);
}

#[test]
fn test_pool_statistics_display() {
    let stats = PoolStatistics {
        connections: 5,
        idle_connections: 3,
        max_connections: 10,
    };

    let display = format!("{}", stats);
    assert!(display.contains("5/10"));
    assert!(display.contains("3 idle"));
}
