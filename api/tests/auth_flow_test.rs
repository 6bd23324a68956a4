//! End-to-end tests for registration, login, refresh and the JWT middleware

mod common;

use std::sync::Arc;

use actix_web::{http::header, http::StatusCode, test};
use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use uuid::Uuid;

use agri_api::create_app;
use agri_core::domain::entities::token::{Claims, JWT_ISSUER};
use agri_core::domain::entities::user::UserRole;
use agri_core::services::{FixedClock, TokenService, TokenServiceConfig};
use agri_shared::config::AppConfig;
use common::{bearer, register_request, test_state, token_of, PASSWORD};

fn token_service_at(now: i64) -> TokenService {
    let config = AppConfig::for_tests();
    TokenService::new(TokenServiceConfig::from(&config.auth.jwt))
        .with_clock(Arc::new(FixedClock::new(now)))
}

#[actix_web::test]
async fn test_alice_registers_and_reaches_protected_route() {
    let app = test::init_service(create_app(test_state().await)).await;

    // 1. Register
    let resp = test::call_service(
        &app,
        register_request("Alice", "alice@example.com").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["user"]["role"], "farmer");
    assert!(body["data"]["user"].get("passwordHash").is_none());
    assert!(body["data"]["refreshToken"].is_string());
    let token = token_of(&body);
    let user_id = body["data"]["user"]["id"].as_str().unwrap().to_string();

    // 2. Protected endpoint with the token
    let req = test::TestRequest::get()
        .uri("/api/v1/auth/profile")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["id"], user_id);
    assert_eq!(body["data"]["email"], "alice@example.com");

    // 3. No header
    let req = test::TestRequest::get().uri("/api/v1/auth/profile").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "MISSING_TOKEN");

    // 4. Garbage token
    let req = test::TestRequest::get()
        .uri("/api/v1/auth/profile")
        .insert_header((header::AUTHORIZATION, "Bearer garbage"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], "INVALID_TOKEN");
}

#[actix_web::test]
async fn test_malformed_authorization_headers() {
    let app = test::init_service(create_app(test_state().await)).await;

    for value in ["Token abc", "Bearer", "bearer abc", "Bearer a b"] {
        let req = test::TestRequest::get()
            .uri("/api/v1/lands")
            .insert_header((header::AUTHORIZATION, value))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "header {:?}", value);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["code"], "INVALID_TOKEN_FORMAT", "header {:?}", value);
    }

    let req = test::TestRequest::get()
        .uri("/api/v1/lands")
        .insert_header((header::AUTHORIZATION, "Bearer "))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["error"]["code"], "INVALID_TOKEN");
}

#[actix_web::test]
async fn test_expired_token_is_rejected() {
    let app = test::init_service(create_app(test_state().await)).await;

    let two_days_ago = Utc::now().timestamp() - 2 * 86_400;
    let token = token_service_at(two_days_ago)
        .issue(Uuid::new_v4(), "old@example.com", UserRole::Farmer)
        .unwrap();

    let req = test::TestRequest::get()
        .uri("/api/v1/dashboard/summary")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], "INVALID_TOKEN");
}

#[actix_web::test]
async fn test_token_signed_with_foreign_secret_is_rejected() {
    let app = test::init_service(create_app(test_state().await)).await;

    let claims = Claims::new(
        Uuid::new_v4(),
        "mallory@example.com",
        UserRole::Admin,
        JWT_ISSUER,
        Utc::now().timestamp(),
        3600,
    );
    let forged = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(b"not-the-server-secret"),
    )
    .unwrap();

    let req = test::TestRequest::get()
        .uri("/api/v1/auth/profile")
        .insert_header(bearer(&forged))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], "INVALID_TOKEN");
}

#[actix_web::test]
async fn test_logout_revokes_presented_token() {
    let app = test::init_service(create_app(test_state().await)).await;
    let body: Value = test::call_and_read_body_json(
        &app,
        register_request("Bob", "bob@example.com").to_request(),
    )
    .await;
    let token = token_of(&body);
    let refresh_token = body["data"]["refreshToken"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/logout")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri("/api/v1/auth/profile")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], "INVALID_TOKEN");

    // The refresh token of the same sign-in is revoked with it
    let req = test::TestRequest::get()
        .uri("/api/v1/auth/profile")
        .insert_header(bearer(&refresh_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/refresh")
        .set_json(json!({ "refreshToken": refresh_token }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], "INVALID_TOKEN");
}

#[actix_web::test]
async fn test_registration_errors() {
    let app = test::init_service(create_app(test_state().await)).await;

    let resp = test::call_service(
        &app,
        register_request("Carol", "carol@example.com").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = test::call_service(
        &app,
        register_request("Carol Again", "Carol@Example.com").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], "EMAIL_EXISTS");

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(json!({
            "name": "Dave",
            "email": "dave@example.com",
            "password": PASSWORD,
            "confirmPassword": "different",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], "PASSWORD_MISMATCH");

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(json!({
            "name": "Eve",
            "email": "not-an-email",
            "password": "abc",
            "confirmPassword": "abc",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], "INVALID_REQUEST");
}

#[actix_web::test]
async fn test_login_checks_credentials() {
    let app = test::init_service(create_app(test_state().await)).await;
    let resp = test::call_service(
        &app,
        register_request("Frank", "  frank@example.com ").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["user"]["email"], "frank@example.com");

    for (email, password) in [
        ("frank@example.com", "wrong-password"),
        ("nobody@example.com", PASSWORD),
    ] {
        let req = test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(json!({ "email": email, "password": password }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["code"], "INVALID_CREDENTIALS");
    }

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({ "email": " FRANK@example.com", "password": PASSWORD }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert!(!token_of(&body).is_empty());
}

#[actix_web::test]
async fn test_refresh_window() {
    let app = test::init_service(create_app(test_state().await)).await;
    let body: Value = test::call_and_read_body_json(
        &app,
        register_request("Grace", "grace@example.com").to_request(),
    )
    .await;
    let fresh = token_of(&body);

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/refresh")
        .set_json(json!({ "refreshToken": fresh }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], "TOKEN_STILL_VALID");

    // Ten minutes of validity left
    let lifetime = AppConfig::for_tests().auth.jwt.expiry_seconds;
    let issued_at = Utc::now().timestamp() - (lifetime - 600);
    let closing = token_service_at(issued_at)
        .issue(Uuid::new_v4(), "grace@example.com", UserRole::Farmer)
        .unwrap();
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/refresh")
        .set_json(json!({ "refreshToken": closing }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    let renewed = token_of(&body);
    assert_ne!(renewed, closing);

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/refresh")
        .set_json(json!({}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], "MISSING_TOKEN");

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/refresh")
        .set_json(json!({ "refreshToken": "garbage" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["error"]["code"], "INVALID_TOKEN");
}

#[actix_web::test]
async fn test_profile_update_and_password_change() {
    let app = test::init_service(create_app(test_state().await)).await;
    let body: Value = test::call_and_read_body_json(
        &app,
        register_request("Heidi", "heidi@example.com").to_request(),
    )
    .await;
    let token = token_of(&body);

    let req = test::TestRequest::put()
        .uri("/api/v1/auth/profile")
        .insert_header(bearer(&token))
        .set_json(json!({ "farmName": "Hill Top", "location": "Bursa" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["farmName"], "Hill Top");
    assert_eq!(body["data"]["name"], "Heidi");

    let cases = [
        (json!({ "newPassword": "newsecret1" }), "MISSING_CURRENT_PASSWORD"),
        (json!({ "currentPassword": PASSWORD }), "MISSING_NEW_PASSWORD"),
        (
            json!({ "currentPassword": PASSWORD, "newPassword": "abc" }),
            "INVALID_REQUEST",
        ),
        (
            json!({ "currentPassword": "wrong-one", "newPassword": "newsecret1" }),
            "INVALID_CURRENT_PASSWORD",
        ),
    ];
    for (payload, code) in cases {
        let req = test::TestRequest::put()
            .uri("/api/v1/auth/change-password")
            .insert_header(bearer(&token))
            .set_json(payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["code"], code);
    }

    let req = test::TestRequest::put()
        .uri("/api/v1/auth/change-password")
        .insert_header(bearer(&token))
        .set_json(json!({ "currentPassword": PASSWORD, "newPassword": "newsecret1" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({ "email": "heidi@example.com", "password": "newsecret1" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_request_id_is_echoed_on_errors() {
    let app = test::init_service(create_app(test_state().await)).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/auth/profile")
        .insert_header(("X-Request-ID", "trace-7"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.headers().get("x-request-id").unwrap(), "trace-7");
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["meta"]["requestId"], "trace-7");
    assert_eq!(body["meta"]["version"], "1.0");
}
