//! Animals, their health records and milk yields

use actix_web::{web, HttpResponse};
use agri_core::domain::entities::livestock::{
    Animal, AnimalUpdate, NewAnimal, NewHealthRecord, NewMilkRecord,
};
use agri_core::errors::{DomainError, ResourceKind};
use uuid::Uuid;

use crate::app::AppState;
use crate::dto::query::AnimalQuery;
use crate::handlers::{response, ApiResult, OptionExt, ResultExt};
use crate::middleware::{AuthContext, RequestId};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource(vec!["", "/"])
            .route(web::get().to(list_animals))
            .route(web::post().to(create_animal)),
    )
    .route("/statistics", web::get().to(statistics))
    .route("/categories", web::get().to(categories))
    .service(
        web::resource("/{id}")
            .route(web::get().to(get_animal))
            .route(web::put().to(update_animal))
            .route(web::delete().to(delete_animal)),
    )
    .service(
        web::resource("/{id}/health-records")
            .route(web::get().to(list_health_records))
            .route(web::post().to(add_health_record)),
    )
    .service(
        web::resource("/{id}/milk-production")
            .route(web::get().to(list_milk_records))
            .route(web::post().to(add_milk_record)),
    );
}

async fn owned_animal(
    state: &AppState,
    auth: &AuthContext,
    id: Uuid,
    request_id: &RequestId,
) -> ApiResult<Animal> {
    state
        .repos
        .livestock
        .find_by_id(auth.user_id, id)
        .await
        .or_api(request_id)?
        .or_missing(ResourceKind::Animal, request_id)
}

pub async fn list_animals(
    state: web::Data<AppState>,
    auth: AuthContext,
    request_id: RequestId,
    query: web::Query<AnimalQuery>,
) -> ApiResult<HttpResponse> {
    let page = state
        .repos
        .livestock
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
        .livestock
        .statistics(auth.user_id)
        .await
        .or_api(&request_id)?;
    Ok(response::ok(stats, &request_id))
}

pub async fn categories(
    state: web::Data<AppState>,
    auth: AuthContext,
    request_id: RequestId,
) -> ApiResult<HttpResponse> {
    let categories = state
        .repos
        .livestock
        .categories(auth.user_id)
        .await
        .or_api(&request_id)?;
    Ok(response::ok(categories, &request_id))
}

pub async fn get_animal(
    state: web::Data<AppState>,
    auth: AuthContext,
    request_id: RequestId,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let animal = owned_animal(&state, &auth, path.into_inner(), &request_id).await?;
    Ok(response::ok(animal, &request_id))
}

/// Tag numbers are unique across the whole herd registry, not per user
pub async fn create_animal(
    state: web::Data<AppState>,
    auth: AuthContext,
    request_id: RequestId,
    body: web::Json<NewAnimal>,
) -> ApiResult<HttpResponse> {
    let animal = body.into_inner().into_animal(auth.user_id).or_api(&request_id)?;

    let taken = state
        .repos
        .livestock
        .tag_exists(&animal.tag_number)
        .await
        .or_api(&request_id)?;
    if taken {
        return Err(DomainError::Conflict {
            resource: ResourceKind::Animal,
            message: format!("tag number {} already exists", animal.tag_number),
        })
        .or_api(&request_id);
    }

    let animal = state.repos.livestock.create(animal).await.or_api(&request_id)?;
    tracing::info!(user_id = %auth.user_id, animal_id = %animal.id, "Animal registered");
    Ok(response::created(animal, "Animal created", &request_id))
}

pub async fn update_animal(
    state: web::Data<AppState>,
    auth: AuthContext,
    request_id: RequestId,
    path: web::Path<Uuid>,
    body: web::Json<AnimalUpdate>,
) -> ApiResult<HttpResponse> {
    let mut animal = owned_animal(&state, &auth, path.into_inner(), &request_id).await?;
    body.into_inner().apply(&mut animal).or_api(&request_id)?;

    let animal = state.repos.livestock.update(animal).await.or_api(&request_id)?;
    Ok(response::ok_with_message(animal, "Animal updated", &request_id))
}

pub async fn delete_animal(
    state: web::Data<AppState>,
    auth: AuthContext,
    request_id: RequestId,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let deleted = state
        .repos
        .livestock
        .delete(auth.user_id, path.into_inner())
        .await
        .or_api(&request_id)?;
    deleted.then_some(()).or_missing(ResourceKind::Animal, &request_id)?;
    Ok(response::message("Animal deleted", &request_id))
}

pub async fn list_health_records(
    state: web::Data<AppState>,
    auth: AuthContext,
    request_id: RequestId,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let animal = owned_animal(&state, &auth, path.into_inner(), &request_id).await?;
    let records = state
        .repos
        .livestock
        .list_health_records(animal.id)
        .await
        .or_api(&request_id)?;
    Ok(response::ok(records, &request_id))
}

pub async fn add_health_record(
    state: web::Data<AppState>,
    auth: AuthContext,
    request_id: RequestId,
    path: web::Path<Uuid>,
    body: web::Json<NewHealthRecord>,
) -> ApiResult<HttpResponse> {
    let animal = owned_animal(&state, &auth, path.into_inner(), &request_id).await?;
    let record = body.into_inner().into_record(animal.id).or_api(&request_id)?;
    let record = state
        .repos
        .livestock
        .add_health_record(record)
        .await
        .or_api(&request_id)?;
    Ok(response::created(record, "Health record added", &request_id))
}

pub async fn list_milk_records(
    state: web::Data<AppState>,
    auth: AuthContext,
    request_id: RequestId,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let animal = owned_animal(&state, &auth, path.into_inner(), &request_id).await?;
    let records = state
        .repos
        .livestock
        .list_milk_records(animal.id)
        .await
        .or_api(&request_id)?;
    Ok(response::ok(records, &request_id))
}

pub async fn add_milk_record(
    state: web::Data<AppState>,
    auth: AuthContext,
    request_id: RequestId,
    path: web::Path<Uuid>,
    body: web::Json<NewMilkRecord>,
) -> ApiResult<HttpResponse> {
    let animal = owned_animal(&state, &auth, path.into_inner(), &request_id).await?;
    let record = body.into_inner().into_record(animal.id).or_api(&request_id)?;
    let record = state
        .repos
        .livestock
        .add_milk_record(record)
        .await
        .or_api(&request_id)?;
    Ok(response::created(record, "Milk production recorded", &request_id))
}
