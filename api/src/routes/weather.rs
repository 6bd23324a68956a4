//! Weather for a farm location

use actix_web::{web, HttpResponse};
use agri_core::services::weather::DEFAULT_FORECAST_DAYS;
use agri_core::services::Coordinates;
use chrono::Utc;

use crate::app::AppState;
use crate::dto::query::WeatherQuery;
use crate::handlers::{response, ApiResult, ResultExt};
use crate::middleware::RequestId;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/current", web::get().to(current))
        .route("/forecast", web::get().to(forecast))
        .route("/agricultural-alerts", web::get().to(agricultural_alerts));
}

fn coordinates(query: &WeatherQuery, request_id: &RequestId) -> ApiResult<Coordinates> {
    Coordinates::parse(query.lat.as_deref(), query.lon.as_deref()).or_api(request_id)
}

pub async fn current(
    state: web::Data<AppState>,
    request_id: RequestId,
    query: web::Query<WeatherQuery>,
) -> ApiResult<HttpResponse> {
    let location = coordinates(&query, &request_id)?;
    Ok(response::ok(state.weather.current(location, Utc::now()), &request_id))
}

pub async fn forecast(
    state: web::Data<AppState>,
    request_id: RequestId,
    query: web::Query<WeatherQuery>,
) -> ApiResult<HttpResponse> {
    let location = coordinates(&query, &request_id)?;
    let days = query.days().unwrap_or(DEFAULT_FORECAST_DAYS);
    let forecast = state
        .weather
        .forecast(location, Utc::now().date_naive(), days);
    Ok(response::ok(forecast, &request_id))
}

pub async fn agricultural_alerts(
    state: web::Data<AppState>,
    request_id: RequestId,
    query: web::Query<WeatherQuery>,
) -> ApiResult<HttpResponse> {
    let location = coordinates(&query, &request_id)?;
    let alerts = state
        .weather
        .agricultural_alerts(location, Utc::now().date_naive());
    Ok(response::ok(alerts, &request_id))
}
