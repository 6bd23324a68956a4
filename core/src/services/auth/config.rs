//! Configuration for the authentication service

use agri_shared::validation::MIN_PASSWORD_LENGTH;

/// Configuration for the authentication service
#[derive(Debug, Clone)]
pub struct AuthServiceConfig {
    /// Minimum length accepted for new passwords
    pub min_password_length: usize,
}

impl Default for AuthServiceConfig {
    fn default() -> Self {
        Self {
            min_password_length: MIN_PASSWORD_LENGTH,
        }
    }
}
