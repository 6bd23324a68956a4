use actix_web::{web, HttpResponse};

use crate::app::AppState;
use crate::handlers::response;
use crate::middleware::{AuthContext, RequestId};

/// Handler for POST /api/v1/auth/logout
///
/// Revokes the presented token and its session. Any later request carrying
/// it, or the refresh token from the same sign-in, is answered with 401
/// `INVALID_TOKEN`.
pub async fn logout(
    state: web::Data<AppState>,
    auth: AuthContext,
    request_id: RequestId,
) -> HttpResponse {
    state.auth.logout(&auth.claims);
    response::message("Logged out", &request_id)
}
