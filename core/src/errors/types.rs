//! Error types for authentication, token handling and input validation
//!
//! Messages here are developer-facing. The presentation layer decides which
//! code and status a client sees.

use std::fmt;

use thiserror::Error;

/// Authentication and account errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Email already registered")]
    EmailExists,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("User not found")]
    UserNotFound,

    #[error("Current password is required")]
    MissingCurrentPassword,

    #[error("New password is required")]
    MissingNewPassword,

    #[error("Current password is incorrect")]
    InvalidCurrentPassword,

    #[error("Password hashing failed: {message}")]
    HashingFailed { message: String },
}

/// Why a session token was rejected
///
/// Clients only ever see `INVALID_TOKEN`; the variant is kept for logs and
/// for the refresh endpoint, which reports `StillValid` separately.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    /// Not a JWT, undecodable payload, missing claims or wrong issuer
    #[error("Malformed token")]
    Malformed,

    /// Signed with an algorithm outside the HMAC family
    #[error("Unexpected signing algorithm")]
    WrongAlgorithm,

    #[error("Invalid token signature")]
    BadSignature,

    #[error("Token expired")]
    Expired,

    #[error("Token not yet valid")]
    NotYetValid,

    #[error("Token revoked")]
    Revoked,

    /// Refresh requested while the token still has plenty of lifetime left
    #[error("Token is not close enough to expiry to be refreshed")]
    StillValid,

    #[error("Token generation failed")]
    GenerationFailed,
}

impl TokenError {
    /// Short tag used in log fields
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenError::Malformed => "malformed",
            TokenError::WrongAlgorithm => "wrong_algorithm",
            TokenError::BadSignature => "bad_signature",
            TokenError::Expired => "expired",
            TokenError::NotYetValid => "not_yet_valid",
            TokenError::Revoked => "revoked",
            TokenError::StillValid => "still_valid",
            TokenError::GenerationFailed => "generation_failed",
        }
    }
}

/// Input validation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Generic malformed request (bad email, short password, missing body fields)
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("Missing required fields: {}", fields.join(", "))]
    MissingFields { fields: Vec<String> },

    #[error("Invalid status: {value}")]
    InvalidStatus { value: String },

    #[error("Invalid type: {value}")]
    InvalidType { value: String },

    #[error("Invalid date for {field}: {value}")]
    InvalidDate { field: String, value: String },

    #[error("Referenced land does not exist")]
    InvalidLand,

    #[error("Latitude and longitude are required")]
    MissingCoordinates,

    #[error("Coordinates out of range")]
    InvalidCoordinates,

    #[error("Unsupported format: {format}")]
    UnsupportedFormat { format: String },

    #[error("Both period1 and period2 are required")]
    MissingPeriods,

    #[error("Invalid period: {value}")]
    InvalidPeriod { value: String },

    #[error("Invalid backup: {message}")]
    InvalidBackup { message: String },
}

impl ValidationError {
    pub fn invalid_request(message: impl Into<String>) -> Self {
        ValidationError::InvalidRequest {
            message: message.into(),
        }
    }

    pub fn missing_fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ValidationError::MissingFields {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }
}

/// Resource kinds that can be missing or conflicting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    User,
    Land,
    Animal,
    Production,
    Transaction,
    Event,
    Notification,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResourceKind::User => "User",
            ResourceKind::Land => "Land",
            ResourceKind::Animal => "Animal",
            ResourceKind::Production => "Production record",
            ResourceKind::Transaction => "Transaction",
            ResourceKind::Event => "Event",
            ResourceKind::Notification => "Notification",
        };
        f.write_str(name)
    }
}
