//! Configuration for the token service

use agri_shared::config::auth::{
    JwtConfig, DEFAULT_JWT_ISSUER, DEFAULT_REFRESH_WINDOW_SECS, DEFAULT_TOKEN_EXPIRY_SECS,
};

/// Configuration for the token service
#[derive(Debug, Clone)]
pub struct TokenServiceConfig {
    /// HMAC signing secret
    pub jwt_secret: String,
    /// Issuer written into and required from every token
    pub issuer: String,
    /// Token lifetime in seconds
    pub expiry_seconds: i64,
    /// Refresh is refused while more than this many seconds remain
    pub refresh_window_seconds: i64,
}

impl TokenServiceConfig {
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            ..Default::default()
        }
    }

    pub fn with_expiry_seconds(mut self, seconds: i64) -> Self {
        self.expiry_seconds = seconds;
        self
    }
}

impl Default for TokenServiceConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            issuer: DEFAULT_JWT_ISSUER.to_string(),
            expiry_seconds: DEFAULT_TOKEN_EXPIRY_SECS,
            refresh_window_seconds: DEFAULT_REFRESH_WINDOW_SECS,
        }
    }
}

impl From<&JwtConfig> for TokenServiceConfig {
    fn from(config: &JwtConfig) -> Self {
        Self {
            jwt_secret: config.secret.clone(),
            issuer: config.issuer.clone(),
            expiry_seconds: config.expiry_seconds,
            refresh_window_seconds: config.refresh_window_seconds,
        }
    }
}
