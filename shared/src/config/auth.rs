//! Authentication and authorization configuration

use serde::{Deserialize, Serialize};

use crate::utils::duration::parse_duration;

/// Secret used when `JWT_SECRET` is not set. Tokens signed with it are
/// forgeable by anyone who has read this file.
pub const DEFAULT_JWT_SECRET: &str = "default-secret-key";

/// Issuer claim written into every token
pub const DEFAULT_JWT_ISSUER: &str = "agri-management-api";

/// Default token lifetime (24 hours)
pub const DEFAULT_TOKEN_EXPIRY_SECS: i64 = 24 * 60 * 60;

/// A token may only be refreshed once this little lifetime remains
pub const DEFAULT_REFRESH_WINDOW_SECS: i64 = 15 * 60;

/// bcrypt work factor for stored passwords
pub const DEFAULT_BCRYPT_COST: u32 = 14;

/// JWT authentication configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// HMAC secret used to sign and verify tokens
    pub secret: String,

    /// Token lifetime in seconds
    pub expiry_seconds: i64,

    /// Remaining lifetime (seconds) under which refresh is allowed
    #[serde(default = "default_refresh_window")]
    pub refresh_window_seconds: i64,

    /// JWT issuer claim
    pub issuer: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::from(DEFAULT_JWT_SECRET),
            expiry_seconds: DEFAULT_TOKEN_EXPIRY_SECS,
            refresh_window_seconds: default_refresh_window(),
            issuer: String::from(DEFAULT_JWT_ISSUER),
        }
    }
}

impl JwtConfig {
    /// Create a new JWT configuration with secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    /// Set token expiry in minutes
    pub fn with_expiry_minutes(mut self, minutes: i64) -> Self {
        self.expiry_seconds = minutes * 60;
        self
    }

    /// Set token expiry in seconds
    pub fn with_expiry_seconds(mut self, seconds: i64) -> Self {
        self.expiry_seconds = seconds;
        self
    }

    /// Check if using default secret (security warning)
    pub fn is_using_default_secret(&self) -> bool {
        self.secret.is_empty() || self.secret == DEFAULT_JWT_SECRET
    }
}

/// Complete authentication configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// JWT configuration
    pub jwt: JwtConfig,

    /// bcrypt cost factor
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,

    /// Track revoked token ids so logout invalidates the presented token
    #[serde(default = "default_denylist_enabled")]
    pub denylist_enabled: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt: JwtConfig::default(),
            bcrypt_cost: default_bcrypt_cost(),
            denylist_enabled: default_denylist_enabled(),
        }
    }
}

impl AuthConfig {
    /// Create from environment variables
    ///
    /// `JWT_EXPIRY` accepts duration strings (`24h`, `15m`, `1h30m`); an
    /// unparsable or zero value falls back to 24 hours with a warning.
    pub fn from_env() -> Self {
        let secret = std::env::var("JWT_SECRET")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_JWT_SECRET.to_string());

        let expiry_seconds = match std::env::var("JWT_EXPIRY") {
            Ok(raw) => match parse_duration(&raw) {
                Ok(d) if d.as_secs() > 0 => d.as_secs() as i64,
                Ok(_) => {
                    tracing::warn!("JWT_EXPIRY must be positive, using 24h");
                    DEFAULT_TOKEN_EXPIRY_SECS
                }
                Err(e) => {
                    tracing::warn!("Invalid JWT_EXPIRY ({}), using 24h", e);
                    DEFAULT_TOKEN_EXPIRY_SECS
                }
            },
            Err(_) => DEFAULT_TOKEN_EXPIRY_SECS,
        };

        let bcrypt_cost = std::env::var("BCRYPT_COST")
            .ok()
            .and_then(|c| c.parse().ok())
            .filter(|c| (4..=31).contains(c))
            .unwrap_or(DEFAULT_BCRYPT_COST);

        let denylist_enabled = std::env::var("JWT_DENYLIST_ENABLED")
            .map(|v| v != "false" && v != "0")
            .unwrap_or(true);

        Self {
            jwt: JwtConfig {
                secret,
                expiry_seconds,
                refresh_window_seconds: default_refresh_window(),
                issuer: String::from(DEFAULT_JWT_ISSUER),
            },
            bcrypt_cost,
            denylist_enabled,
        }
    }

    /// Override the bcrypt cost (tests use the minimum cost of 4)
    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }
}

fn default_refresh_window() -> i64 {
    DEFAULT_REFRESH_WINDOW_SECS
}

fn default_bcrypt_cost() -> u32 {
    DEFAULT_BCRYPT_COST
}

fn default_denylist_enabled() -> bool {
    true
}
