//! Unit tests for mock user repository

use uuid::Uuid;

use crate::domain::entities::user::User;
use crate::errors::{AuthError, DomainError};
use crate::repositories::user::{MockUserRepository, UserRepository};

fn user(email: &str) -> User {
    User::new("Test".to_string(), email.to_string(), "hash".to_string())
}

#[tokio::test]
async fn test_mock_repository_create_and_find() {
    let repo = MockUserRepository::new();
    let user = user("a@example.com");

    let created = repo.create(user.clone()).await.unwrap();
    assert_eq!(created.id, user.id);

    let found = repo.find_by_id(user.id).await.unwrap();
    assert_eq!(found.map(|u| u.id), Some(user.id));

    let by_email = repo.find_by_email("a@example.com").await.unwrap();
    assert!(by_email.is_some());
    assert!(repo.exists_by_email("a@example.com").await.unwrap());
    assert!(!repo.exists_by_email("b@example.com").await.unwrap());
}

#[tokio::test]
async fn test_mock_repository_rejects_duplicate_email() {
    let repo = MockUserRepository::new();
    repo.create(user("dup@example.com")).await.unwrap();

    let result = repo.create(user("dup@example.com")).await;
    assert!(matches!(result, Err(DomainError::Auth(AuthError::EmailExists))));
    assert_eq!(repo.len().await, 1);
}

#[tokio::test]
async fn test_mock_repository_update_password() {
    let repo = MockUserRepository::new();
    let user = repo.create(user("pw@example.com")).await.unwrap();

    repo.update_password(user.id, "new-hash").await.unwrap();
    let stored = repo.find_by_id(user.id).await.unwrap().unwrap();
    assert_eq!(stored.password_hash, "new-hash");

    let missing = repo.update_password(Uuid::new_v4(), "x").await;
    assert!(matches!(missing, Err(DomainError::NotFound { .. })));
}
