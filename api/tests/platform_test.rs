//! Settings, weather, reports and the unauthenticated surface

mod common;

use actix_web::{http::StatusCode, test};
use serde_json::{json, Value};

use agri_api::create_app;
use common::{get, post, put, register_request, test_state, token_of};

#[actix_web::test]
async fn test_health_and_index() {
    let app = test::init_service(create_app(test_state().await)).await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");
    assert_eq!(body["service"], "agri-management-api");

    let req = test::TestRequest::get().uri("/api/v1").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["success"], true);
    assert!(body["data"]["resources"].is_array());
}

#[actix_web::test]
async fn test_unknown_route_gets_not_found_envelope() {
    let app = test::init_service(create_app(test_state().await)).await;

    let req = test::TestRequest::get().uri("/api/v2/anything").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
    assert!(body["meta"]["timestamp"].is_string());
}

#[actix_web::test]
async fn test_settings_and_system_info() {
    let app = test::init_service(create_app(test_state().await)).await;
    let body: Value = test::call_and_read_body_json(
        &app,
        register_request("Alice", "alice@example.com").to_request(),
    )
    .await;
    let token = token_of(&body);

    let body: Value =
        test::call_and_read_body_json(&app, get("/api/v1/settings", &token).to_request()).await;
    assert_eq!(body["data"]["language"], "tr");
    assert_eq!(body["data"]["currency"], "TRY");

    let body: Value = test::call_and_read_body_json(
        &app,
        put(
            "/api/v1/settings",
            &token,
            json!({ "theme": "dark", "currency": "usd" }),
        )
        .to_request(),
    )
    .await;
    assert_eq!(body["data"]["theme"], "dark");
    assert_eq!(body["data"]["currency"], "USD");
    assert_eq!(body["data"]["language"], "tr");

    let resp = test::call_service(
        &app,
        put("/api/v1/settings", &token, json!({ "theme": "neon" })).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::call_and_read_body_json(
        &app,
        get("/api/v1/settings/system-info", &token).to_request(),
    )
    .await;
    assert_eq!(body["data"]["apiVersion"], "1.0");
    assert_eq!(body["data"]["database"]["status"], "connected");
    assert!(body["data"]["uptimeSeconds"].as_i64().unwrap() >= 0);
}

#[actix_web::test]
async fn test_backup_export_and_restore_check() {
    let app = test::init_service(create_app(test_state().await)).await;
    let body: Value = test::call_and_read_body_json(
        &app,
        register_request("Alice", "alice@example.com").to_request(),
    )
    .await;
    let token = token_of(&body);

    test::call_service(
        &app,
        post(
            "/api/v1/lands",
            &token,
            json!({ "name": "North Field", "area": 10.0, "unit": "decare" }),
        )
        .to_request(),
    )
    .await;

    let body: Value = test::call_and_read_body_json(
        &app,
        post("/api/v1/settings/backup", &token, json!({})).to_request(),
    )
    .await;
    let backup = body["data"].clone();
    assert_eq!(backup["tables"]["lands"].as_array().unwrap().len(), 1);

    let body: Value = test::call_and_read_body_json(
        &app,
        post("/api/v1/settings/restore", &token, backup).to_request(),
    )
    .await;
    assert_eq!(body["data"]["applied"], false);
    assert_eq!(body["data"]["totalRecords"], 1);
    assert_eq!(body["data"]["counts"]["lands"], 1);

    let resp = test::call_service(
        &app,
        post(
            "/api/v1/settings/restore",
            &token,
            json!({ "tables": { "crops": [] } }),
        )
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], "INVALID_BACKUP");
}

#[actix_web::test]
async fn test_weather_requires_valid_coordinates() {
    let app = test::init_service(create_app(test_state().await)).await;
    let body: Value = test::call_and_read_body_json(
        &app,
        register_request("Alice", "alice@example.com").to_request(),
    )
    .await;
    let token = token_of(&body);

    let resp =
        test::call_service(&app, get("/api/v1/weather/current?lat=39.9", &token).to_request())
            .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], "MISSING_COORDINATES");

    let resp = test::call_service(
        &app,
        get("/api/v1/weather/current?lat=95&lon=32.8", &token).to_request(),
    )
    .await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], "INVALID_COORDINATES");

    let first: Value = test::call_and_read_body_json(
        &app,
        get("/api/v1/weather/forecast?lat=39.9&lon=32.8&days=3", &token).to_request(),
    )
    .await;
    assert_eq!(first["data"].as_array().unwrap().len(), 3);
    let second: Value = test::call_and_read_body_json(
        &app,
        get("/api/v1/weather/forecast?lat=39.9&lon=32.8&days=3", &token).to_request(),
    )
    .await;
    assert_eq!(first["data"], second["data"]);

    let body: Value = test::call_and_read_body_json(
        &app,
        get("/api/v1/weather/forecast?lat=39.9&lon=32.8", &token).to_request(),
    )
    .await;
    assert_eq!(body["data"].as_array().unwrap().len(), 7);

    let resp = test::call_service(
        &app,
        get("/api/v1/weather/agricultural-alerts?lat=39.9&lon=32.8", &token).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_reports() {
    let app = test::init_service(create_app(test_state().await)).await;
    let body: Value = test::call_and_read_body_json(
        &app,
        register_request("Alice", "alice@example.com").to_request(),
    )
    .await;
    let token = token_of(&body);

    let body: Value =
        test::call_and_read_body_json(&app, get("/api/v1/reports", &token).to_request()).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 4);

    let cases = [
        (json!({ "type": "financial", "format": "pdf" }), "UNSUPPORTED_FORMAT"),
        (json!({ "type": "financial" }), "MISSING_FIELDS"),
        (json!({ "type": "weather", "format": "json" }), "INVALID_TYPE"),
    ];
    for (payload, code) in cases {
        let resp = test::call_service(
            &app,
            post("/api/v1/reports/generate", &token, payload).to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["code"], code);
    }

    let resp = test::call_service(
        &app,
        post(
            "/api/v1/reports/generate",
            &token,
            json!({ "type": "financial", "period": "quarter", "format": "json" }),
        )
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["type"], "financial");
    assert_eq!(body["data"]["period"], "quarter");
    assert_eq!(body["data"]["format"], "json");

    let resp = test::call_service(
        &app,
        get("/api/v1/reports/comparison?period1=2024-01", &token).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], "MISSING_PERIODS");

    let resp = test::call_service(
        &app,
        get("/api/v1/reports/comparison?period1=2024-01&period2=2024-02", &token).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp =
        test::call_service(&app, get("/api/v1/reports/performance", &token).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
}
