//! Main authentication service implementation

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use agri_shared::validation::{is_blank, is_valid_email};

use crate::domain::entities::token::Claims;
use crate::domain::entities::user::{ProfileUpdate, User};
use crate::domain::value_objects::AuthResponse;
use crate::errors::{AuthError, DomainError, DomainResult, ValidationError};
use crate::repositories::UserRepository;
use crate::services::password::PasswordHasher;
use crate::services::token::TokenService;

use super::config::AuthServiceConfig;

/// Registration payload
#[derive(Debug, Clone, Default)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub farm_name: Option<String>,
    pub location: Option<String>,
}

/// Authentication service for the account lifecycle
pub struct AuthService {
    /// User repository for database operations
    user_repository: Arc<dyn UserRepository>,
    /// Token service for JWT management
    token_service: Arc<TokenService>,
    hasher: PasswordHasher,
    config: AuthServiceConfig,
}

impl AuthService {
    /// Create a new authentication service
    ///
    /// # Arguments
    ///
    /// * `user_repository` - Repository for user data persistence
    /// * `token_service` - Service for JWT token management
    /// * `hasher` - Password hasher (cost comes from configuration)
    /// * `config` - Service configuration
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        token_service: Arc<TokenService>,
        hasher: PasswordHasher,
        config: AuthServiceConfig,
    ) -> Self {
        Self {
            user_repository,
            token_service,
            hasher,
            config,
        }
    }

    pub fn token_service(&self) -> &Arc<TokenService> {
        &self.token_service
    }

    /// Register a new farmer account and sign it in
    ///
    /// # Errors
    ///
    /// * `ValidationError::InvalidRequest` - Missing name, bad email or short password
    /// * `AuthError::PasswordMismatch` - Confirmation differs from the password
    /// * `AuthError::EmailExists` - Email already registered
    pub async fn register(&self, request: RegisterRequest) -> DomainResult<AuthResponse> {
        let email = normalize_email(&request.email);

        if is_blank(&request.name) || email.is_empty() || request.password.is_empty() {
            return Err(ValidationError::invalid_request("name, email and password are required").into());
        }
        if !is_valid_email(&email) {
            return Err(ValidationError::invalid_request("email address is not valid").into());
        }
        self.check_password_length(&request.password)?;
        if request.password != request.confirm_password {
            return Err(AuthError::PasswordMismatch.into());
        }

        if self.user_repository.exists_by_email(&email).await? {
            return Err(AuthError::EmailExists.into());
        }

        let password_hash = self.hasher.hash_blocking(request.password).await?;
        let user = User::new(request.name.trim().to_string(), email, password_hash)
            .with_farm(trim_optional(request.farm_name), trim_optional(request.location));
        let user = self.user_repository.create(user).await?;

        info!(user_id = %user.id, "User registered");
        self.sign_in(user)
    }

    /// Authenticate with email and password
    ///
    /// Unknown emails and wrong passwords fail identically.
    pub async fn login(&self, email: &str, password: &str) -> DomainResult<AuthResponse> {
        let email = normalize_email(email);
        if email.is_empty() || password.is_empty() {
            return Err(ValidationError::invalid_request("email and password are required").into());
        }

        let user = match self.user_repository.find_by_email(&email).await? {
            Some(user) => user,
            None => {
                warn!("Login attempt for unknown email");
                return Err(AuthError::InvalidCredentials.into());
            }
        };

        let valid = self
            .hasher
            .verify_blocking(password.to_string(), user.password_hash.clone())
            .await?;
        if !valid {
            warn!(user_id = %user.id, "Login failed: wrong password");
            return Err(AuthError::InvalidCredentials.into());
        }

        info!(user_id = %user.id, "User logged in");
        self.sign_in(user)
    }

    /// Exchange a token close to expiry for a new one
    pub fn refresh(&self, token: &str) -> DomainResult<String> {
        Ok(self.token_service.refresh(token)?)
    }

    /// Current user's profile
    pub async fn profile(&self, user_id: Uuid) -> DomainResult<User> {
        self.user_repository
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AuthError::UserNotFound.into())
    }

    /// Update name, farm name, location or avatar
    pub async fn update_profile(&self, user_id: Uuid, update: ProfileUpdate) -> DomainResult<User> {
        let mut user = self.profile(user_id).await?;
        user.apply_profile(update);
        self.user_repository.update(user).await
    }

    /// Change the password after re-checking the current one
    ///
    /// # Errors
    ///
    /// * `AuthError::MissingCurrentPassword` / `AuthError::MissingNewPassword`
    /// * `ValidationError::InvalidRequest` - New password too short
    /// * `AuthError::InvalidCurrentPassword` - Current password does not match
    pub async fn change_password(
        &self,
        user_id: Uuid,
        current_password: &str,
        new_password: &str,
    ) -> DomainResult<()> {
        if current_password.is_empty() {
            return Err(AuthError::MissingCurrentPassword.into());
        }
        if new_password.is_empty() {
            return Err(AuthError::MissingNewPassword.into());
        }
        self.check_password_length(new_password)?;

        let user = self.profile(user_id).await?;
        let valid = self
            .hasher
            .verify_blocking(current_password.to_string(), user.password_hash.clone())
            .await?;
        if !valid {
            return Err(AuthError::InvalidCurrentPassword.into());
        }

        let password_hash = self.hasher.hash_blocking(new_password.to_string()).await?;
        self.user_repository
            .update_password(user_id, &password_hash)
            .await?;

        info!(user_id = %user_id, "Password changed");
        Ok(())
    }

    /// Revoke the presented token and the rest of its session
    ///
    /// Without a denylist the token stays valid until it expires and the
    /// client is expected to discard it.
    pub fn logout(&self, claims: &Claims) {
        if self.token_service.revoke(claims) {
            info!(user_id = %claims.user_id, "Token revoked on logout");
        } else {
            info!(user_id = %claims.user_id, "Logout without denylist, token left to expire");
        }
    }

    fn sign_in(&self, user: User) -> DomainResult<AuthResponse> {
        let (token, refresh_token) = self
            .token_service
            .issue_pair(user.id, &user.email, user.role)?;
        Ok(AuthResponse::new(user, token, refresh_token))
    }

    fn check_password_length(&self, password: &str) -> Result<(), DomainError> {
        if password.chars().count() < self.config.min_password_length {
            return Err(ValidationError::invalid_request(format!(
                "password must be at least {} characters",
                self.config.min_password_length
            ))
            .into());
        }
        Ok(())
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn trim_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
