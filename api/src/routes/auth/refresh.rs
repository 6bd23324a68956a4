use actix_web::{web, HttpResponse};
use agri_shared::error_codes;

use crate::app::AppState;
use crate::dto::auth::{RefreshTokenRequest, RefreshTokenResponse};
use crate::handlers::{response, ApiError, ApiResult, ResultExt};
use crate::middleware::RequestId;

/// Handler for POST /api/v1/auth/refresh
///
/// # Request Body
///
/// ```json
/// { "refreshToken": "eyJ..." }
/// ```
///
/// ## Errors
/// - 400 Bad Request: `MISSING_TOKEN`
/// - 401 Unauthorized: `TOKEN_STILL_VALID` when more than the refresh window remains,
///   `INVALID_TOKEN` for anything else
pub async fn refresh(
    state: web::Data<AppState>,
    request_id: RequestId,
    body: web::Json<RefreshTokenRequest>,
) -> ApiResult<HttpResponse> {
    let token = body
        .refresh_token
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| {
            ApiError::bad_request(error_codes::MISSING_TOKEN, "Refresh token is required")
                .with_request_id(&request_id)
        })?;

    let token = state.auth.refresh(token).or_api(&request_id)?;

    Ok(response::ok_with_message(
        RefreshTokenResponse { token },
        "Token refreshed",
        &request_id,
    ))
}
