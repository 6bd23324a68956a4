//! Success envelopes and extractor error handlers

use actix_web::{error, web, HttpRequest, HttpResponse};
use agri_shared::error_codes;
use agri_shared::types::ApiResponse;
use serde::Serialize;

use super::error::ApiError;
use crate::middleware::request_id::RequestId;

/// 200 with `data`
pub fn ok<T: Serialize>(data: T, request_id: &RequestId) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::success(data).with_request_id(request_id.as_str()))
}

/// 200 with `data` and a message
pub fn ok_with_message<T: Serialize>(
    data: T,
    message: &str,
    request_id: &RequestId,
) -> HttpResponse {
    HttpResponse::Ok().json(
        ApiResponse::success(data)
            .with_message(message)
            .with_request_id(request_id.as_str()),
    )
}

/// 201 with `data` and a message
pub fn created<T: Serialize>(data: T, message: &str, request_id: &RequestId) -> HttpResponse {
    HttpResponse::Created().json(
        ApiResponse::success(data)
            .with_message(message)
            .with_request_id(request_id.as_str()),
    )
}

/// 200 with a message only
pub fn message(message: &str, request_id: &RequestId) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::<()>::message(message).with_request_id(request_id.as_str()))
}

/// Malformed JSON bodies become 400 `INVALID_REQUEST` envelopes
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, req| extractor_error(err.to_string(), req))
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, req| extractor_error(err.to_string(), req))
}

pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, req| extractor_error(err.to_string(), req))
}

fn extractor_error(detail: String, req: &HttpRequest) -> error::Error {
    ApiError::bad_request(error_codes::INVALID_REQUEST, "Request could not be parsed")
        .with_details(serde_json::json!({ "reason": detail }))
        .with_request_id(&RequestId::of(req))
        .into()
}
