//! Harvest and production records

use actix_web::{web, HttpResponse};
use agri_core::domain::entities::production::{
    NewProduction, Production, ProductionUpdate, PRODUCTION_CATEGORIES,
};
use agri_core::errors::{ResourceKind, ValidationError};
use uuid::Uuid;

use crate::app::AppState;
use crate::dto::query::ProductionQuery;
use crate::handlers::{response, ApiResult, OptionExt, ResultExt};
use crate::middleware::{AuthContext, RequestId};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource(vec!["", "/"])
            .route(web::get().to(list_production))
            .route(web::post().to(create_production)),
    )
    .route("/statistics", web::get().to(statistics))
    .route("/categories", web::get().to(categories))
    .service(
        web::resource("/{id}")
            .route(web::get().to(get_production))
            .route(web::put().to(update_production))
            .route(web::delete().to(delete_production)),
    );
}

async fn owned_production(
    state: &AppState,
    auth: &AuthContext,
    id: Uuid,
    request_id: &RequestId,
) -> ApiResult<Production> {
    state
        .repos
        .production
        .find_by_id(auth.user_id, id)
        .await
        .or_api(request_id)?
        .or_missing(ResourceKind::Production, request_id)
}

/// A referenced parcel must belong to the caller
async fn check_land(
    state: &AppState,
    auth: &AuthContext,
    land_id: Option<Uuid>,
    request_id: &RequestId,
) -> ApiResult<()> {
    let Some(land_id) = land_id else {
        return Ok(());
    };
    let land = state
        .repos
        .lands
        .find_by_id(auth.user_id, land_id)
        .await
        .or_api(request_id)?;
    match land {
        Some(_) => Ok(()),
        None => Err(ValidationError::InvalidLand).or_api(request_id),
    }
}

pub async fn list_production(
    state: web::Data<AppState>,
    auth: AuthContext,
    request_id: RequestId,
    query: web::Query<ProductionQuery>,
) -> ApiResult<HttpResponse> {
    let filter = query.filter().or_api(&request_id)?;
    let page = state
        .repos
        .production
        .list(auth.user_id, &filter, query.pagination())
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
        .production
        .statistics(auth.user_id)
        .await
        .or_api(&request_id)?;
    Ok(response::ok(stats, &request_id))
}

/// Fixed catalog followed by the caller's own categories
pub async fn categories(
    state: web::Data<AppState>,
    auth: AuthContext,
    request_id: RequestId,
) -> ApiResult<HttpResponse> {
    let own = state
        .repos
        .production
        .categories(auth.user_id)
        .await
        .or_api(&request_id)?;

    let mut categories: Vec<String> = PRODUCTION_CATEGORIES.iter().map(|c| c.to_string()).collect();
    for category in own {
        if !categories.contains(&category) {
            categories.push(category);
        }
    }
    Ok(response::ok(categories, &request_id))
}

pub async fn get_production(
    state: web::Data<AppState>,
    auth: AuthContext,
    request_id: RequestId,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let production = owned_production(&state, &auth, path.into_inner(), &request_id).await?;
    Ok(response::ok(production, &request_id))
}

pub async fn create_production(
    state: web::Data<AppState>,
    auth: AuthContext,
    request_id: RequestId,
    body: web::Json<NewProduction>,
) -> ApiResult<HttpResponse> {
    let production = body
        .into_inner()
        .into_production(auth.user_id)
        .or_api(&request_id)?;
    check_land(&state, &auth, production.land_id, &request_id).await?;

    let production = state
        .repos
        .production
        .create(production)
        .await
        .or_api(&request_id)?;
    tracing::info!(user_id = %auth.user_id, production_id = %production.id, "Production recorded");
    Ok(response::created(production, "Production created", &request_id))
}

pub async fn update_production(
    state: web::Data<AppState>,
    auth: AuthContext,
    request_id: RequestId,
    path: web::Path<Uuid>,
    body: web::Json<ProductionUpdate>,
) -> ApiResult<HttpResponse> {
    let mut production = owned_production(&state, &auth, path.into_inner(), &request_id).await?;
    let update = body.into_inner();
    check_land(&state, &auth, update.land_id, &request_id).await?;
    update.apply(&mut production).or_api(&request_id)?;

    let production = state
        .repos
        .production
        .update(production)
        .await
        .or_api(&request_id)?;
    Ok(response::ok_with_message(production, "Production updated", &request_id))
}

pub async fn delete_production(
    state: web::Data<AppState>,
    auth: AuthContext,
    request_id: RequestId,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let deleted = state
        .repos
        .production
        .delete(auth.user_id, path.into_inner())
        .await
        .or_api(&request_id)?;
    deleted.then_some(()).or_missing(ResourceKind::Production, &request_id)?;
    Ok(response::message("Production deleted", &request_id))
}
