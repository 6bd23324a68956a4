use actix_web::{web, HttpResponse};
use agri_core::domain::entities::user::ProfileUpdate;

use crate::app::AppState;
use crate::dto::auth::ChangePasswordRequest;
use crate::handlers::{response, ApiResult, ResultExt};
use crate::middleware::{AuthContext, RequestId};

/// Handler for GET /api/v1/auth/profile
pub async fn get_profile(
    state: web::Data<AppState>,
    auth: AuthContext,
    request_id: RequestId,
) -> ApiResult<HttpResponse> {
    let user = state.auth.profile(auth.user_id).await.or_api(&request_id)?;
    Ok(response::ok(user, &request_id))
}

/// Handler for PUT /api/v1/auth/profile
///
/// Only `name`, `farmName`, `location` and `avatar` are taken from the body.
pub async fn update_profile(
    state: web::Data<AppState>,
    auth: AuthContext,
    request_id: RequestId,
    body: web::Json<ProfileUpdate>,
) -> ApiResult<HttpResponse> {
    let user = state
        .auth
        .update_profile(auth.user_id, body.into_inner())
        .await
        .or_api(&request_id)?;
    Ok(response::ok_with_message(user, "Profile updated", &request_id))
}

/// Handler for PUT /api/v1/auth/change-password
pub async fn change_password(
    state: web::Data<AppState>,
    auth: AuthContext,
    request_id: RequestId,
    body: web::Json<ChangePasswordRequest>,
) -> ApiResult<HttpResponse> {
    state
        .auth
        .change_password(auth.user_id, &body.current_password, &body.new_password)
        .await
        .or_api(&request_id)?;
    Ok(response::message("Password changed", &request_id))
}
