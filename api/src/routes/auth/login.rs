use actix_web::{web, HttpResponse};

use crate::app::AppState;
use crate::dto::auth::LoginRequest;
use crate::dto::validate_payload;
use crate::handlers::{response, ApiResult, ResultExt};
use crate::middleware::RequestId;

/// Handler for POST /api/v1/auth/login
///
/// Unknown emails and wrong passwords both answer 401 `INVALID_CREDENTIALS`.
pub async fn login(
    state: web::Data<AppState>,
    request_id: RequestId,
    body: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let body = body.into_inner().trimmed();
    validate_payload(&body, &request_id)?;

    let auth = state
        .auth
        .login(&body.email, &body.password)
        .await
        .or_api(&request_id)?;

    Ok(response::ok_with_message(auth, "Login successful", &request_id))
}
