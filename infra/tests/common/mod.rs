//! Shared fixtures for repository integration tests

#![allow(dead_code)]

use agri_core::domain::entities::user::User;
use agri_core::repositories::Repositories;
use agri_infra::{build_repositories, initialize_schema, DatabasePool};
use uuid::Uuid;

pub struct TestDb {
    pub pool: DatabasePool,
    pub repos: Repositories,
}

pub async fn setup() -> TestDb {
    let pool = DatabasePool::in_memory().await.expect("in-memory pool");
    initialize_schema(pool.get_pool()).await.expect("schema");
    let repos = build_repositories(pool.get_pool());
    TestDb { pool, repos }
}

/// Inserts a user and returns its id
pub async fn seed_user(db: &TestDb, email: &str) -> Uuid {
    let user = User::new("Test Farmer".to_string(), email.to_string(), "hash".to_string());
    db.repos.users.create(user).await.expect("user").id
}
