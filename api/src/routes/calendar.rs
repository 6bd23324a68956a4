//! Farm calendar events

use actix_web::{web, HttpResponse};
use agri_core::domain::entities::event::{Event, EventStatus, EventUpdate, NewEvent};
use agri_core::errors::ResourceKind;
use chrono::Utc;
use uuid::Uuid;

use crate::app::AppState;
use crate::dto::query::EventQuery;
use crate::dto::StatusUpdateRequest;
use crate::handlers::{response, ApiResult, OptionExt, ResultExt};
use crate::middleware::{AuthContext, RequestId};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/statistics", web::get().to(statistics))
        .service(
            web::resource("/events")
                .route(web::get().to(list_events))
                .route(web::post().to(create_event)),
        )
        .service(
            web::resource("/events/{id}")
                .route(web::get().to(get_event))
                .route(web::put().to(update_event))
                .route(web::delete().to(delete_event)),
        )
        .route("/events/{id}/status", web::patch().to(update_status));
}

async fn owned_event(
    state: &AppState,
    auth: &AuthContext,
    id: Uuid,
    request_id: &RequestId,
) -> ApiResult<Event> {
    state
        .repos
        .events
        .find_by_id(auth.user_id, id)
        .await
        .or_api(request_id)?
        .or_missing(ResourceKind::Event, request_id)
}

pub async fn list_events(
    state: web::Data<AppState>,
    auth: AuthContext,
    request_id: RequestId,
    query: web::Query<EventQuery>,
) -> ApiResult<HttpResponse> {
    let filter = query.filter().or_api(&request_id)?;
    let page = state
        .repos
        .events
        .list(auth.user_id, &filter, query.pagination())
        .await
        .or_api(&request_id)?;
    Ok(response::ok(page, &request_id))
}

pub async fn get_event(
    state: web::Data<AppState>,
    auth: AuthContext,
    request_id: RequestId,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let event = owned_event(&state, &auth, path.into_inner(), &request_id).await?;
    Ok(response::ok(event, &request_id))
}

pub async fn create_event(
    state: web::Data<AppState>,
    auth: AuthContext,
    request_id: RequestId,
    body: web::Json<NewEvent>,
) -> ApiResult<HttpResponse> {
    let event = body.into_inner().into_event(auth.user_id).or_api(&request_id)?;
    let event = state.repos.events.create(event).await.or_api(&request_id)?;

    tracing::info!(user_id = %auth.user_id, event_id = %event.id, "Event scheduled");
    Ok(response::created(event, "Event created", &request_id))
}

pub async fn update_event(
    state: web::Data<AppState>,
    auth: AuthContext,
    request_id: RequestId,
    path: web::Path<Uuid>,
    body: web::Json<EventUpdate>,
) -> ApiResult<HttpResponse> {
    let mut event = owned_event(&state, &auth, path.into_inner(), &request_id).await?;
    body.into_inner().apply(&mut event).or_api(&request_id)?;

    let event = state.repos.events.update(event).await.or_api(&request_id)?;
    Ok(response::ok_with_message(event, "Event updated", &request_id))
}

/// Moves an event between `pending`, `in_progress`, `completed` and `cancelled`
pub async fn update_status(
    state: web::Data<AppState>,
    auth: AuthContext,
    request_id: RequestId,
    path: web::Path<Uuid>,
    body: web::Json<StatusUpdateRequest>,
) -> ApiResult<HttpResponse> {
    let status: EventStatus = body
        .status
        .as_deref()
        .unwrap_or_default()
        .parse()
        .or_api(&request_id)?;

    let event = state
        .repos
        .events
        .update_status(auth.user_id, path.into_inner(), status)
        .await
        .or_api(&request_id)?
        .or_missing(ResourceKind::Event, &request_id)?;
    Ok(response::ok_with_message(event, "Event status updated", &request_id))
}

pub async fn delete_event(
    state: web::Data<AppState>,
    auth: AuthContext,
    request_id: RequestId,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let deleted = state
        .repos
        .events
        .delete(auth.user_id, path.into_inner())
        .await
        .or_api(&request_id)?;
    deleted.then_some(()).or_missing(ResourceKind::Event, &request_id)?;
    Ok(response::message("Event deleted", &request_id))
}

pub async fn statistics(
    state: web::Data<AppState>,
    auth: AuthContext,
    request_id: RequestId,
) -> ApiResult<HttpResponse> {
    let stats = state
        .repos
        .events
        .statistics(auth.user_id, Utc::now())
        .await
        .or_api(&request_id)?;
    Ok(response::ok(stats, &request_id))
}
