//! User repository trait defining the interface for account persistence.
//!
//! The trait is async-first and object safe so the application state can
//! hold it as `Arc<dyn UserRepository>`.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::user::User;
use crate::errors::DomainError;

/// Repository trait for User entity persistence operations
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by their unique identifier
    ///
    /// # Returns
    /// * `Ok(Some(User))` - User found
    /// * `Ok(None)` - No user with that id
    /// * `Err(DomainError)` - Storage failure
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError>;

    /// Find a user by email address (exact match on the normalized email)
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Persist a new user
    ///
    /// # Returns
    /// * `Ok(User)` - The stored user
    /// * `Err(DomainError::Auth(AuthError::EmailExists))` - Email already taken
    async fn create(&self, user: User) -> Result<User, DomainError>;

    /// Store profile fields of an existing user
    ///
    /// # Returns
    /// * `Ok(User)` - The updated user
    /// * `Err(DomainError::NotFound)` - No such user
    async fn update(&self, user: User) -> Result<User, DomainError>;

    /// Replace the password hash of a user
    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<(), DomainError>;

    /// Check whether an email address is already registered
    async fn exists_by_email(&self, email: &str) -> Result<bool, DomainError> {
        Ok(self.find_by_email(email).await?.is_some())
    }
}
