//! HTTP error type and the single mapping from domain errors to responses

use std::fmt;

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use agri_core::errors::{AuthError, DomainError, ResourceKind, TokenError, ValidationError};
use agri_shared::error_codes;
use agri_shared::types::{ApiResponse, ErrorDetail};
use serde_json::{json, Value};

use crate::middleware::request_id::RequestId;

/// Error rendered as the standard envelope
#[derive(Debug, Clone)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
    pub details: Option<Value>,
    pub request_id: Option<String>,
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            details: None,
            request_id: None,
        }
    }

    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, code, message)
    }

    pub fn unauthorized(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, code, message)
    }

    pub fn not_found(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, code, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, error_codes::INTERNAL_ERROR, message)
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn with_request_id(mut self, request_id: &RequestId) -> Self {
        self.request_id = Some(request_id.to_string());
        self
    }

    /// Not-found error for a resource kind
    pub fn missing(resource: ResourceKind) -> Self {
        let code = match resource {
            ResourceKind::User => error_codes::USER_NOT_FOUND,
            ResourceKind::Land => error_codes::LAND_NOT_FOUND,
            ResourceKind::Animal => error_codes::ANIMAL_NOT_FOUND,
            ResourceKind::Production => error_codes::PRODUCTION_NOT_FOUND,
            ResourceKind::Transaction => error_codes::TRANSACTION_NOT_FOUND,
            ResourceKind::Event => error_codes::EVENT_NOT_FOUND,
            ResourceKind::Notification => error_codes::NOTIFICATION_NOT_FOUND,
        };
        Self::not_found(code, format!("{} not found", resource))
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        self.status
    }

    fn error_response(&self) -> HttpResponse {
        let mut detail = ErrorDetail::new(self.code, self.message.clone());
        if let Some(details) = &self.details {
            detail = detail.with_details(details.clone());
        }
        let mut body = ApiResponse::<()>::error(detail);
        if let Some(request_id) = &self.request_id {
            body = body.with_request_id(request_id.clone());
        }
        HttpResponse::build(self.status).json(body)
    }
}

impl From<DomainError> for ApiError {
    fn from(error: DomainError) -> Self {
        map_domain_error(error)
    }
}

impl From<ValidationError> for ApiError {
    fn from(error: ValidationError) -> Self {
        map_validation_error(error)
    }
}

/// Maps every domain error to its status and client-facing code
pub fn map_domain_error(error: DomainError) -> ApiError {
    match error {
        DomainError::Auth(auth) => map_auth_error(auth),
        DomainError::Token(token) => map_token_error(token),
        DomainError::ValidationErr(validation) => map_validation_error(validation),
        DomainError::Validation { message } => {
            ApiError::bad_request(error_codes::INVALID_REQUEST, message)
        }
        DomainError::NotFound { resource } => ApiError::missing(resource),
        DomainError::Conflict { resource, message } => match resource {
            ResourceKind::Animal => ApiError::new(StatusCode::CONFLICT, error_codes::TAG_EXISTS, message),
            _ => ApiError::new(StatusCode::CONFLICT, error_codes::CONFLICT, message),
        },
        DomainError::Unauthorized => {
            ApiError::unauthorized(error_codes::UNAUTHORIZED, "Authentication required")
        }
        DomainError::Internal { message } => {
            tracing::error!(error = %message, "Internal error");
            ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                error_codes::DATABASE_ERROR,
                "The request could not be completed",
            )
        }
    }
}

fn map_auth_error(error: AuthError) -> ApiError {
    let message = error.to_string();
    match error {
        AuthError::PasswordMismatch => ApiError::bad_request(error_codes::PASSWORD_MISMATCH, message),
        AuthError::EmailExists => {
            ApiError::new(StatusCode::CONFLICT, error_codes::EMAIL_EXISTS, message)
        }
        AuthError::InvalidCredentials => {
            ApiError::unauthorized(error_codes::INVALID_CREDENTIALS, message)
        }
        AuthError::UserNotFound => ApiError::not_found(error_codes::USER_NOT_FOUND, message),
        AuthError::MissingCurrentPassword => {
            ApiError::bad_request(error_codes::MISSING_CURRENT_PASSWORD, message)
        }
        AuthError::MissingNewPassword => {
            ApiError::bad_request(error_codes::MISSING_NEW_PASSWORD, message)
        }
        AuthError::InvalidCurrentPassword => {
            ApiError::bad_request(error_codes::INVALID_CURRENT_PASSWORD, message)
        }
        AuthError::HashingFailed { message } => {
            tracing::error!(error = %message, "Password hashing failed");
            ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                error_codes::HASH_ERROR,
                "Password could not be processed",
            )
        }
    }
}

/// Token failures collapse to `INVALID_TOKEN`, except the two the client can act on
fn map_token_error(error: TokenError) -> ApiError {
    match error {
        TokenError::StillValid => ApiError::unauthorized(
            error_codes::TOKEN_STILL_VALID,
            "Token is not close enough to expiry to be refreshed",
        ),
        TokenError::GenerationFailed => ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            error_codes::TOKEN_ERROR,
            "Token could not be generated",
        ),
        other => {
            tracing::warn!(reason = other.as_str(), "Token rejected");
            ApiError::unauthorized(error_codes::INVALID_TOKEN, "Invalid or expired token")
        }
    }
}

fn map_validation_error(error: ValidationError) -> ApiError {
    let message = error.to_string();
    match error {
        ValidationError::InvalidRequest { .. } => {
            ApiError::bad_request(error_codes::INVALID_REQUEST, message)
        }
        ValidationError::MissingFields { fields } => {
            ApiError::bad_request(error_codes::MISSING_FIELDS, message)
                .with_details(json!({ "fields": fields }))
        }
        ValidationError::InvalidStatus { .. } => {
            ApiError::bad_request(error_codes::INVALID_STATUS, message)
        }
        ValidationError::InvalidType { .. } => ApiError::bad_request(error_codes::INVALID_TYPE, message),
        ValidationError::InvalidDate { field, .. } => {
            ApiError::bad_request(error_codes::INVALID_DATE, message)
                .with_details(json!({ "field": field }))
        }
        ValidationError::InvalidLand => ApiError::bad_request(error_codes::INVALID_LAND, message),
        ValidationError::MissingCoordinates => {
            ApiError::bad_request(error_codes::MISSING_COORDINATES, message)
        }
        ValidationError::InvalidCoordinates => {
            ApiError::bad_request(error_codes::INVALID_COORDINATES, message)
        }
        ValidationError::UnsupportedFormat { .. } => {
            ApiError::bad_request(error_codes::UNSUPPORTED_FORMAT, message)
        }
        ValidationError::MissingPeriods => {
            ApiError::bad_request(error_codes::MISSING_PERIODS, message)
        }
        ValidationError::InvalidPeriod { .. } => {
            ApiError::bad_request(error_codes::INVALID_PERIOD, message)
        }
        ValidationError::InvalidBackup { .. } => {
            ApiError::bad_request(error_codes::INVALID_BACKUP, message)
        }
    }
}

/// Attaches the request id while converting a domain failure
pub trait ResultExt<T> {
    fn or_api(self, request_id: &RequestId) -> ApiResult<T>;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: Into<ApiError>,
{
    fn or_api(self, request_id: &RequestId) -> ApiResult<T> {
        self.map_err(|e| e.into().with_request_id(request_id))
    }
}

/// Turns an empty lookup into the resource's not-found error
pub trait OptionExt<T> {
    fn or_missing(self, resource: ResourceKind, request_id: &RequestId) -> ApiResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn or_missing(self, resource: ResourceKind, request_id: &RequestId) -> ApiResult<T> {
        self.ok_or_else(|| ApiError::missing(resource).with_request_id(request_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_errors_collapse_to_invalid_token() {
        for error in [
            TokenError::Malformed,
            TokenError::BadSignature,
            TokenError::Expired,
            TokenError::Revoked,
            TokenError::WrongAlgorithm,
        ] {
            let api = map_domain_error(error.into());
            assert_eq!(api.status, StatusCode::UNAUTHORIZED);
            assert_eq!(api.code, error_codes::INVALID_TOKEN);
        }
    }

    #[test]
    fn test_still_valid_has_its_own_code() {
        let api = map_domain_error(TokenError::StillValid.into());
        assert_eq!(api.code, error_codes::TOKEN_STILL_VALID);
    }

    #[test]
    fn test_resource_not_found_codes() {
        assert_eq!(ApiError::missing(ResourceKind::Land).code, error_codes::LAND_NOT_FOUND);
        assert_eq!(
            map_domain_error(DomainError::not_found(ResourceKind::Event)).code,
            error_codes::EVENT_NOT_FOUND
        );
    }

    #[test]
    fn test_auth_error_statuses() {
        let exists = map_domain_error(AuthError::EmailExists.into());
        assert_eq!(exists.status, StatusCode::CONFLICT);
        let creds = map_domain_error(AuthError::InvalidCredentials.into());
        assert_eq!(creds.status, StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_missing_fields_carry_details() {
        let api = map_domain_error(ValidationError::missing_fields(["name", "area"]).into());
        assert_eq!(api.code, error_codes::MISSING_FIELDS);
        assert_eq!(api.details, Some(json!({ "fields": ["name", "area"] })));
    }

    #[test]
    fn test_tag_conflict() {
        let api = map_domain_error(DomainError::Conflict {
            resource: ResourceKind::Animal,
            message: "tag in use".to_string(),
        });
        assert_eq!(api.status, StatusCode::CONFLICT);
        assert_eq!(api.code, error_codes::TAG_EXISTS);
    }
}
