//! Error codes shared by the API layer and its clients
//!
//! Codes are stable strings; clients branch on them, so renaming one is a
//! breaking change.

/// Machine-readable codes placed in `error.code` of the envelope
pub mod error_codes {
    // Authentication middleware
    pub const MISSING_TOKEN: &str = "MISSING_TOKEN";
    pub const INVALID_TOKEN_FORMAT: &str = "INVALID_TOKEN_FORMAT";
    pub const INVALID_TOKEN: &str = "INVALID_TOKEN";
    pub const TOKEN_STILL_VALID: &str = "TOKEN_STILL_VALID";
    pub const UNAUTHORIZED: &str = "UNAUTHORIZED";

    // Account management
    pub const PASSWORD_MISMATCH: &str = "PASSWORD_MISMATCH";
    pub const EMAIL_EXISTS: &str = "EMAIL_EXISTS";
    pub const INVALID_CREDENTIALS: &str = "INVALID_CREDENTIALS";
    pub const USER_NOT_FOUND: &str = "USER_NOT_FOUND";
    pub const MISSING_CURRENT_PASSWORD: &str = "MISSING_CURRENT_PASSWORD";
    pub const MISSING_NEW_PASSWORD: &str = "MISSING_NEW_PASSWORD";
    pub const INVALID_CURRENT_PASSWORD: &str = "INVALID_CURRENT_PASSWORD";
    pub const HASH_ERROR: &str = "HASH_ERROR";
    pub const TOKEN_ERROR: &str = "TOKEN_ERROR";

    // Request validation
    pub const INVALID_REQUEST: &str = "INVALID_REQUEST";
    pub const MISSING_FIELDS: &str = "MISSING_FIELDS";
    pub const INVALID_STATUS: &str = "INVALID_STATUS";
    pub const INVALID_TYPE: &str = "INVALID_TYPE";
    pub const INVALID_DATE: &str = "INVALID_DATE";
    pub const INVALID_LAND: &str = "INVALID_LAND";
    pub const MISSING_COORDINATES: &str = "MISSING_COORDINATES";
    pub const INVALID_COORDINATES: &str = "INVALID_COORDINATES";
    pub const UNSUPPORTED_FORMAT: &str = "UNSUPPORTED_FORMAT";
    pub const MISSING_PERIODS: &str = "MISSING_PERIODS";
    pub const INVALID_PERIOD: &str = "INVALID_PERIOD";
    pub const INVALID_BACKUP: &str = "INVALID_BACKUP";

    // Resources
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const LAND_NOT_FOUND: &str = "LAND_NOT_FOUND";
    pub const ANIMAL_NOT_FOUND: &str = "ANIMAL_NOT_FOUND";
    pub const PRODUCTION_NOT_FOUND: &str = "PRODUCTION_NOT_FOUND";
    pub const TRANSACTION_NOT_FOUND: &str = "TRANSACTION_NOT_FOUND";
    pub const EVENT_NOT_FOUND: &str = "EVENT_NOT_FOUND";
    pub const NOTIFICATION_NOT_FOUND: &str = "NOTIFICATION_NOT_FOUND";
    pub const TAG_EXISTS: &str = "TAG_EXISTS";
    pub const CONFLICT: &str = "CONFLICT";

    // Server side
    pub const DATABASE_ERROR: &str = "DATABASE_ERROR";
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
}
