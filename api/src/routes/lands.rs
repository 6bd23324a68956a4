//! Land parcels and their field activities

use actix_web::{web, HttpResponse};
use agri_core::domain::entities::land::{LandUpdate, NewLand, NewLandActivity};
use agri_core::errors::ResourceKind;
use uuid::Uuid;

use crate::app::AppState;
use crate::dto::query::LandQuery;
use crate::handlers::{response, ApiResult, OptionExt, ResultExt};
use crate::middleware::{AuthContext, RequestId};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource(vec!["", "/"])
            .route(web::get().to(list_lands))
            .route(web::post().to(create_land)),
    )
    .route("/statistics", web::get().to(statistics))
    .route("/productivity-analysis", web::get().to(productivity_analysis))
    .service(
        web::resource("/{id}")
            .route(web::get().to(get_land))
            .route(web::put().to(update_land))
            .route(web::delete().to(delete_land)),
    )
    .service(
        web::resource("/{id}/activities")
            .route(web::get().to(list_activities))
            .route(web::post().to(add_activity)),
    );
}

pub async fn list_lands(
    state: web::Data<AppState>,
    auth: AuthContext,
    request_id: RequestId,
    query: web::Query<LandQuery>,
) -> ApiResult<HttpResponse> {
    let page = state
        .repos
        .lands
        .list(auth.user_id, &query.filter(), query.pagination())
        .await
        .or_api(&request_id)?;
    Ok(response::ok(page, &request_id))
}

pub async fn statistics(
    state: web::Data<AppState>,
    auth: AuthContext,
    request_id: RequestId,
) -> ApiResult<HttpResponse> {
    let stats = state
        .repos
        .lands
        .statistics(auth.user_id)
        .await
        .or_api(&request_id)?;
    Ok(response::ok(stats, &request_id))
}

/// Yield per area unit from the production recorded on each parcel
pub async fn productivity_analysis(
    state: web::Data<AppState>,
    auth: AuthContext,
    request_id: RequestId,
) -> ApiResult<HttpResponse> {
    let analysis = state
        .repos
        .lands
        .productivity_analysis(auth.user_id)
        .await
        .or_api(&request_id)?;
    Ok(response::ok(analysis, &request_id))
}

pub async fn get_land(
    state: web::Data<AppState>,
    auth: AuthContext,
    request_id: RequestId,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let land = state
        .repos
        .lands
        .find_by_id(auth.user_id, path.into_inner())
        .await
        .or_api(&request_id)?
        .or_missing(ResourceKind::Land, &request_id)?;
    Ok(response::ok(land, &request_id))
}

pub async fn create_land(
    state: web::Data<AppState>,
    auth: AuthContext,
    request_id: RequestId,
    body: web::Json<NewLand>,
) -> ApiResult<HttpResponse> {
    let land = body.into_inner().into_land(auth.user_id).or_api(&request_id)?;
    let land = state.repos.lands.create(land).await.or_api(&request_id)?;

    tracing::info!(user_id = %auth.user_id, land_id = %land.id, "Land created");
    Ok(response::created(land, "Land created", &request_id))
}

pub async fn update_land(
    state: web::Data<AppState>,
    auth: AuthContext,
    request_id: RequestId,
    path: web::Path<Uuid>,
    body: web::Json<LandUpdate>,
) -> ApiResult<HttpResponse> {
    let mut land = state
        .repos
        .lands
        .find_by_id(auth.user_id, path.into_inner())
        .await
        .or_api(&request_id)?
        .or_missing(ResourceKind::Land, &request_id)?;

    body.into_inner().apply(&mut land).or_api(&request_id)?;
    let land = state.repos.lands.update(land).await.or_api(&request_id)?;
    Ok(response::ok_with_message(land, "Land updated", &request_id))
}

pub async fn delete_land(
    state: web::Data<AppState>,
    auth: AuthContext,
    request_id: RequestId,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    let deleted = state
        .repos
        .lands
        .delete(auth.user_id, id)
        .await
        .or_api(&request_id)?;
    deleted.then_some(()).or_missing(ResourceKind::Land, &request_id)?;

    tracing::info!(user_id = %auth.user_id, land_id = %id, "Land deleted");
    Ok(response::message("Land deleted", &request_id))
}

pub async fn list_activities(
    state: web::Data<AppState>,
    auth: AuthContext,
    request_id: RequestId,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let land = state
        .repos
        .lands
        .find_by_id(auth.user_id, path.into_inner())
        .await
        .or_api(&request_id)?
        .or_missing(ResourceKind::Land, &request_id)?;

    let activities = state
        .repos
        .lands
        .list_activities(land.id)
        .await
        .or_api(&request_id)?;
    Ok(response::ok(activities, &request_id))
}

/// Records field work and stamps the parcel's `lastActivity`
pub async fn add_activity(
    state: web::Data<AppState>,
    auth: AuthContext,
    request_id: RequestId,
    path: web::Path<Uuid>,
    body: web::Json<NewLandActivity>,
) -> ApiResult<HttpResponse> {
    let land = state
        .repos
        .lands
        .find_by_id(auth.user_id, path.into_inner())
        .await
        .or_api(&request_id)?
        .or_missing(ResourceKind::Land, &request_id)?;

    let activity = body.into_inner().into_activity(land.id).or_api(&request_id)?;
    let activity = state
        .repos
        .lands
        .add_activity(activity)
        .await
        .or_api(&request_id)?;
    Ok(response::created(activity, "Activity recorded", &request_id))
}
