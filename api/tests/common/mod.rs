//! Shared setup for API integration tests

#![allow(dead_code)]

use actix_web::{http::header, test::TestRequest, web};
use serde_json::{json, Value};

use agri_api::AppState;
use agri_infra::{initialize_schema, DatabasePool};
use agri_shared::config::AppConfig;

pub const PASSWORD: &str = "secret123";

/// Application state over a fresh in-memory database
pub async fn test_state() -> web::Data<AppState> {
    let pool = DatabasePool::in_memory()
        .await
        .expect("Failed to open in-memory database");
    initialize_schema(pool.get_pool())
        .await
        .expect("Failed to bootstrap schema");
    web::Data::new(AppState::new(AppConfig::for_tests(), pool))
}

pub fn register_request(name: &str, email: &str) -> TestRequest {
    TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(json!({
            "name": name,
            "email": email,
            "password": PASSWORD,
            "confirmPassword": PASSWORD,
            "farmName": format!("{} Farm", name),
        }))
}

pub fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {}", token))
}

/// `data.token` of an auth response body
pub fn token_of(body: &Value) -> String {
    body["data"]["token"]
        .as_str()
        .expect("response carries a token")
        .to_string()
}

pub fn get(uri: &str, token: &str) -> TestRequest {
    TestRequest::get().uri(uri).insert_header(bearer(token))
}

pub fn post(uri: &str, token: &str, body: Value) -> TestRequest {
    TestRequest::post()
        .uri(uri)
        .insert_header(bearer(token))
        .set_json(body)
}

pub fn put(uri: &str, token: &str, body: Value) -> TestRequest {
    TestRequest::put()
        .uri(uri)
        .insert_header(bearer(token))
        .set_json(body)
}

pub fn patch(uri: &str, token: &str, body: Value) -> TestRequest {
    TestRequest::patch()
        .uri(uri)
        .insert_header(bearer(token))
        .set_json(body)
}

pub fn delete(uri: &str, token: &str) -> TestRequest {
    TestRequest::delete().uri(uri).insert_header(bearer(token))
}
