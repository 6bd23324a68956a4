//! Application preferences, system information and data export

use actix_web::{web, HttpResponse};
use agri_core::services::SettingsUpdate;
use serde::Serialize;
use serde_json::Value;

use crate::app::AppState;
use crate::handlers::{response, ApiResult, ResultExt};
use crate::middleware::{AuthContext, RequestId};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource(vec!["", "/"])
            .route(web::get().to(get_settings))
            .route(web::put().to(update_settings)),
    )
    .route("/system-info", web::get().to(system_info))
    .route("/backup", web::post().to(backup))
    .route("/restore", web::post().to(restore));
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseInfo {
    pub status: &'static str,
    pub connections: u32,
    pub idle_connections: usize,
    pub max_connections: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemInfo {
    pub version: &'static str,
    pub api_version: &'static str,
    pub environment: String,
    pub uptime_seconds: i64,
    pub database: DatabaseInfo,
}

pub async fn get_settings(
    state: web::Data<AppState>,
    auth: AuthContext,
    request_id: RequestId,
) -> HttpResponse {
    response::ok(state.settings.get(auth.user_id).await, &request_id)
}

pub async fn update_settings(
    state: web::Data<AppState>,
    auth: AuthContext,
    request_id: RequestId,
    body: web::Json<SettingsUpdate>,
) -> ApiResult<HttpResponse> {
    let settings = state
        .settings
        .update(auth.user_id, body.into_inner())
        .await
        .or_api(&request_id)?;
    Ok(response::ok_with_message(settings, "Settings updated", &request_id))
}

pub async fn system_info(state: web::Data<AppState>, request_id: RequestId) -> HttpResponse {
    let stats = state.pool.get_statistics();
    let info = SystemInfo {
        version: env!("CARGO_PKG_VERSION"),
        api_version: agri_shared::types::API_VERSION,
        environment: state.config.environment.to_string(),
        uptime_seconds: state.uptime_seconds(),
        database: DatabaseInfo {
            status: state.database_status().await,
            connections: stats.connections,
            idle_connections: stats.idle_connections,
            max_connections: stats.max_connections,
        },
    };
    response::ok(info, &request_id)
}

/// JSON export of every row the caller owns
pub async fn backup(
    state: web::Data<AppState>,
    auth: AuthContext,
    request_id: RequestId,
) -> ApiResult<HttpResponse> {
    let backup = state.backup.export(auth.user_id).await.or_api(&request_id)?;
    tracing::info!(user_id = %auth.user_id, "Backup exported");
    Ok(response::ok_with_message(backup, "Backup created", &request_id))
}

/// Checks an uploaded export and reports what it holds; nothing is written
pub async fn restore(
    state: web::Data<AppState>,
    auth: AuthContext,
    request_id: RequestId,
    body: web::Json<Value>,
) -> ApiResult<HttpResponse> {
    let summary = state.backup.validate(&body).or_api(&request_id)?;
    tracing::info!(
        user_id = %auth.user_id,
        records = summary.total_records,
        "Backup validated"
    );
    Ok(response::ok_with_message(
        summary,
        "Backup is valid; no data was changed",
        &request_id,
    ))
}
