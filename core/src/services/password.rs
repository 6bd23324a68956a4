//! One-way password hashing with bcrypt

use agri_shared::config::auth::DEFAULT_BCRYPT_COST;

use crate::errors::{AuthError, DomainError};

/// Salted bcrypt hasher
///
/// Hashing at the default cost takes on the order of a second, so async
/// callers should go through [`PasswordHasher::hash_blocking`] and
/// [`PasswordHasher::verify_blocking`], which move the work off the runtime.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(DEFAULT_BCRYPT_COST)
    }
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash a plaintext password with a fresh salt
    pub fn hash(&self, plaintext: &str) -> Result<String, AuthError> {
        bcrypt::hash(plaintext, self.cost).map_err(|e| AuthError::HashingFailed {
            message: e.to_string(),
        })
    }

    /// Check a candidate against a stored hash
    ///
    /// Mismatches and malformed hashes both yield `false`.
    pub fn verify(&self, plaintext: &str, hash: &str) -> bool {
        bcrypt::verify(plaintext, hash).unwrap_or(false)
    }

    /// [`hash`](Self::hash) on the blocking thread pool
    pub async fn hash_blocking(&self, plaintext: String) -> Result<String, DomainError> {
        let hasher = *self;
        tokio::task::spawn_blocking(move || hasher.hash(&plaintext))
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Password hashing task failed: {}", e),
            })?
            .map_err(DomainError::from)
    }

    /// [`verify`](Self::verify) on the blocking thread pool
    pub async fn verify_blocking(&self, plaintext: String, hash: String) -> Result<bool, DomainError> {
        let hasher = *self;
        tokio::task::spawn_blocking(move || hasher.verify(&plaintext, &hash))
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Password verification task failed: {}", e),
            })
    }
}
