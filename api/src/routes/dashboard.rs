//! Dashboard summary, activity feed and charts

use actix_web::{web, HttpResponse};
use chrono::Utc;

use crate::app::AppState;
use crate::dto::query::{LimitQuery, MonthsQuery};
use crate::handlers::{response, ApiResult, ResultExt};
use crate::middleware::{AuthContext, RequestId};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/summary", web::get().to(summary))
        .route("/recent-activities", web::get().to(recent_activities))
        .route("/charts/income-expense", web::get().to(income_expense_chart))
        .route("/charts/production", web::get().to(production_chart));
}

pub async fn summary(
    state: web::Data<AppState>,
    auth: AuthContext,
    request_id: RequestId,
) -> ApiResult<HttpResponse> {
    let summary = state
        .dashboard
        .summary(auth.user_id, Utc::now().date_naive())
        .await
        .or_api(&request_id)?;
    Ok(response::ok(summary, &request_id))
}

pub async fn recent_activities(
    state: web::Data<AppState>,
    auth: AuthContext,
    request_id: RequestId,
    query: web::Query<LimitQuery>,
) -> ApiResult<HttpResponse> {
    let activities = state
        .dashboard
        .recent_activities(auth.user_id, query.value())
        .await
        .or_api(&request_id)?;
    Ok(response::ok(activities, &request_id))
}

pub async fn income_expense_chart(
    state: web::Data<AppState>,
    auth: AuthContext,
    request_id: RequestId,
    query: web::Query<MonthsQuery>,
) -> ApiResult<HttpResponse> {
    let points = state
        .dashboard
        .income_expense_chart(auth.user_id, Utc::now().date_naive(), query.value())
        .await
        .or_api(&request_id)?;
    Ok(response::ok(points, &request_id))
}

pub async fn production_chart(
    state: web::Data<AppState>,
    auth: AuthContext,
    request_id: RequestId,
    query: web::Query<MonthsQuery>,
) -> ApiResult<HttpResponse> {
    let points = state
        .dashboard
        .production_chart(auth.user_id, Utc::now().date_naive(), query.value())
        .await
        .or_api(&request_id)?;
    Ok(response::ok(points, &request_id))
}
