//! In-app notifications and delivery preferences

use actix_web::{web, HttpResponse};
use agri_core::domain::entities::notification::Notification;
use agri_core::errors::ResourceKind;
use agri_core::services::NotificationSettingsUpdate;
use agri_shared::types::PaginatedResponse;
use serde::Serialize;
use uuid::Uuid;

use crate::app::AppState;
use crate::dto::query::NotificationQuery;
use crate::handlers::{response, ApiResult, OptionExt, ResultExt};
use crate::middleware::{AuthContext, RequestId};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::get().to(list_notifications))
        .route("/", web::get().to(list_notifications))
        .route("/mark-all-read", web::patch().to(mark_all_read))
        .service(
            web::resource("/settings")
                .route(web::get().to(get_settings))
                .route(web::put().to(update_settings)),
        )
        .route("/{id}/read", web::patch().to(mark_read))
        .route("/{id}", web::delete().to(delete_notification));
}

/// A page of notifications with the caller's unread total
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPage {
    #[serde(flatten)]
    pub page: PaginatedResponse<Notification>,
    pub unread_count: i64,
}

#[derive(Debug, Serialize)]
pub struct MarkAllRead {
    pub updated: u64,
}

pub async fn list_notifications(
    state: web::Data<AppState>,
    auth: AuthContext,
    request_id: RequestId,
    query: web::Query<NotificationQuery>,
) -> ApiResult<HttpResponse> {
    let filter = query.filter().or_api(&request_id)?;
    let page = state
        .repos
        .notifications
        .list(auth.user_id, &filter, query.pagination())
        .await
        .or_api(&request_id)?;
    let unread_count = state
        .repos
        .notifications
        .unread_count(auth.user_id)
        .await
        .or_api(&request_id)?;

    Ok(response::ok(NotificationPage { page, unread_count }, &request_id))
}

pub async fn mark_read(
    state: web::Data<AppState>,
    auth: AuthContext,
    request_id: RequestId,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let updated = state
        .repos
        .notifications
        .mark_read(auth.user_id, path.into_inner())
        .await
        .or_api(&request_id)?;
    updated.then_some(()).or_missing(ResourceKind::Notification, &request_id)?;
    Ok(response::message("Notification marked as read", &request_id))
}

pub async fn mark_all_read(
    state: web::Data<AppState>,
    auth: AuthContext,
    request_id: RequestId,
) -> ApiResult<HttpResponse> {
    let updated = state
        .repos
        .notifications
        .mark_all_read(auth.user_id)
        .await
        .or_api(&request_id)?;
    Ok(response::ok_with_message(
        MarkAllRead { updated },
        "All notifications marked as read",
        &request_id,
    ))
}

pub async fn delete_notification(
    state: web::Data<AppState>,
    auth: AuthContext,
    request_id: RequestId,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let deleted = state
        .repos
        .notifications
        .delete(auth.user_id, path.into_inner())
        .await
        .or_api(&request_id)?;
    deleted.then_some(()).or_missing(ResourceKind::Notification, &request_id)?;
    Ok(response::message("Notification deleted", &request_id))
}

pub async fn get_settings(
    state: web::Data<AppState>,
    auth: AuthContext,
    request_id: RequestId,
) -> HttpResponse {
    let settings = state.settings.notification_settings(auth.user_id).await;
    response::ok(settings, &request_id)
}

pub async fn update_settings(
    state: web::Data<AppState>,
    auth: AuthContext,
    request_id: RequestId,
    body: web::Json<NotificationSettingsUpdate>,
) -> ApiResult<HttpResponse> {
    let settings = state
        .settings
        .update_notification_settings(auth.user_id, body.into_inner())
        .await
        .or_api(&request_id)?;
    Ok(response::ok_with_message(
        settings,
        "Notification settings updated",
        &request_id,
    ))
}
