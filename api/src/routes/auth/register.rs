use actix_web::{web, HttpResponse};

use crate::app::AppState;
use crate::dto::auth::RegisterRequest;
use crate::dto::validate_payload;
use crate::handlers::{response, ApiResult, ResultExt};
use crate::middleware::RequestId;

/// Handler for POST /api/v1/auth/register
///
/// Creates a farmer account and signs it in.
///
/// # Request Body
///
/// ```json
/// {
///     "name": "Alice",
///     "email": "alice@example.com",
///     "password": "secret123",
///     "confirmPassword": "secret123",
///     "farmName": "Green Acres",
///     "location": "Konya"
/// }
/// ```
///
/// # Response
///
/// ## Success (201 Created)
/// ```json
/// { "success": true, "data": { "user": {...}, "token": "eyJ...", "refreshToken": "eyJ..." } }
/// ```
///
/// ## Errors
/// - 400 Bad Request: `INVALID_REQUEST` or `PASSWORD_MISMATCH`
/// - 409 Conflict: `EMAIL_EXISTS`
pub async fn register(
    state: web::Data<AppState>,
    request_id: RequestId,
    body: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let body = body.into_inner().trimmed();
    validate_payload(&body, &request_id)?;

    let auth = state.auth.register(body.into()).await.or_api(&request_id)?;

    Ok(response::created(auth, "Registration successful", &request_id))
}
