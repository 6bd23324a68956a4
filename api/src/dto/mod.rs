//! Request and response payloads owned by the HTTP layer

pub mod auth;
pub mod query;

use actix_web::http::StatusCode;
use agri_shared::error_codes;
use serde::{Deserialize, Serialize};
use serde_json::json;
use validator::Validate;

use crate::handlers::error::{ApiError, ApiResult};
use crate::middleware::request_id::RequestId;

/// Body of `PATCH /calendar/events/{id}/status`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusUpdateRequest {
    pub status: Option<String>,
}

/// Runs `validator` rules and reports the offending fields as `INVALID_REQUEST`
pub fn validate_payload<T: Validate>(payload: &T, request_id: &RequestId) -> ApiResult<()> {
    payload.validate().map_err(|errors| {
        let mut fields: Vec<String> = errors
            .field_errors()
            .keys()
            .map(|field| field.to_string())
            .collect();
        fields.sort();

        ApiError::new(
            StatusCode::BAD_REQUEST,
            error_codes::INVALID_REQUEST,
            format!("Invalid value for: {}", fields.join(", ")),
        )
        .with_details(json!({ "fields": fields }))
        .with_request_id(request_id)
    })
}
