//! Generated reports, performance scores and month comparisons

use actix_web::{web, HttpResponse};
use agri_core::services::GenerateReportRequest;
use chrono::Utc;

use crate::app::AppState;
use crate::dto::query::{ComparisonQuery, ReportCatalogQuery};
use crate::handlers::{response, ApiResult, ResultExt};
use crate::middleware::{AuthContext, RequestId};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::get().to(catalog))
        .route("/", web::get().to(catalog))
        .route("/generate", web::post().to(generate))
        .route("/performance", web::get().to(performance))
        .route("/comparison", web::get().to(comparison));
}

pub async fn catalog(
    state: web::Data<AppState>,
    request_id: RequestId,
    query: web::Query<ReportCatalogQuery>,
) -> ApiResult<HttpResponse> {
    let reports = state
        .reports
        .catalog(query.report_type.as_deref())
        .or_api(&request_id)?;
    Ok(response::ok(reports, &request_id))
}

/// Only the `json` format is produced
pub async fn generate(
    state: web::Data<AppState>,
    auth: AuthContext,
    request_id: RequestId,
    body: web::Json<GenerateReportRequest>,
) -> ApiResult<HttpResponse> {
    let report = state
        .reports
        .generate(auth.user_id, body.into_inner(), Utc::now().date_naive())
        .await
        .or_api(&request_id)?;
    Ok(response::created(report, "Report generated", &request_id))
}

pub async fn performance(
    state: web::Data<AppState>,
    auth: AuthContext,
    request_id: RequestId,
) -> ApiResult<HttpResponse> {
    let metrics = state
        .reports
        .performance(auth.user_id, Utc::now().date_naive())
        .await
        .or_api(&request_id)?;
    Ok(response::ok(metrics, &request_id))
}

pub async fn comparison(
    state: web::Data<AppState>,
    auth: AuthContext,
    request_id: RequestId,
    query: web::Query<ComparisonQuery>,
) -> ApiResult<HttpResponse> {
    let comparison = state
        .reports
        .comparison(
            auth.user_id,
            query.period1.as_deref(),
            query.period2.as_deref(),
        )
        .await
        .or_api(&request_id)?;
    Ok(response::ok(comparison, &request_id))
}
