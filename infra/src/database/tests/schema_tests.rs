//! Schema bootstrap tests

use crate::database::connection::DatabasePool;
use crate::database::schema::{initialize_schema, table_names};

async fn existing_tables(pool: &DatabasePool) -> Vec<String> {
    sqlx::query_scalar("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
        .fetch_all(pool.get_pool())
        .await
        .unwrap()
}

#[tokio::test]
async fn test_creates_all_tables() {
    let pool = DatabasePool::in_memory().await.unwrap();
    initialize_schema(pool.get_pool()).await.unwrap();

    let tables = existing_tables(&pool).await;
    for name in table_names() {
        assert!(tables.iter().any(|t| t == name), "missing table {}", name);
    }
    assert_eq!(table_names().count(), 10);
}

#[tokio::test]
async fn test_bootstrap_is_idempotent() {
    let pool = DatabasePool::in_memory().await.unwrap();
    initialize_schema(pool.get_pool()).await.unwrap();
    initialize_schema(pool.get_pool()).await.unwrap();

    let indexes: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'index' AND name LIKE 'idx_%'",
    )
    .fetch_one(pool.get_pool())
    .await
    .unwrap();
    assert_eq!(indexes, 12);
}

#[tokio::test]
async fn test_transaction_type_is_constrained() {
    let pool = DatabasePool::in_memory().await.unwrap();
    initialize_schema(pool.get_pool()).await.unwrap();

    sqlx::query(
        "INSERT INTO users (id, name, email, password, created_at, updated_at) VALUES ('u1', 'A', 'a@b.co', 'x', 'now', 'now')",
    )
    .execute(pool.get_pool())
    .await
    .unwrap();

    let result = sqlx::query(
        r#"INSERT INTO transactions (id, user_id, type, category, description, amount, date, created_at, updated_at)
           VALUES ('t1', 'u1', 'gift', 'x', 'x', 1.0, '2024-01-01', 'now', 'now')"#,
    )
    .execute(pool.get_pool())
    .await;
    assert!(result.is_err());
}
