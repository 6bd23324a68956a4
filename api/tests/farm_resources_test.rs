//! Lands, livestock, production and dashboard endpoints

mod common;

use actix_web::{http::StatusCode, test};
use serde_json::{json, Value};

use agri_api::create_app;
use common::{delete, get, post, put, register_request, test_state, token_of};

#[actix_web::test]
async fn test_land_crud_and_activities() {
    let app = test::init_service(create_app(test_state().await)).await;
    let body: Value = test::call_and_read_body_json(
        &app,
        register_request("Alice", "alice@example.com").to_request(),
    )
    .await;
    let token = token_of(&body);

    let resp = test::call_service(
        &app,
        post(
            "/api/v1/lands",
            &token,
            json!({ "name": "North Field", "area": 12.5, "unit": "decare", "crop": "wheat" }),
        )
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["status"], "active");
    let land_id = body["data"]["id"].as_str().unwrap().to_string();

    let resp = test::call_service(
        &app,
        post("/api/v1/lands", &token, json!({ "name": "Nameless" })).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], "MISSING_FIELDS");
    assert_eq!(body["error"]["details"]["fields"], json!(["unit", "area"]));

    let body: Value =
        test::call_and_read_body_json(&app, get("/api/v1/lands?crop=wheat", &token).to_request())
            .await;
    assert_eq!(body["data"]["pagination"]["total"], 1);
    assert_eq!(body["data"]["items"][0]["name"], "North Field");

    let uri = format!("/api/v1/lands/{}", land_id);
    let body: Value = test::call_and_read_body_json(
        &app,
        put(&uri, &token, json!({ "crop": "barley", "productivity": 80.0 })).to_request(),
    )
    .await;
    assert_eq!(body["data"]["crop"], "barley");
    assert_eq!(body["data"]["name"], "North Field");

    let activities = format!("{}/activities", uri);
    let resp = test::call_service(
        &app,
        post(
            &activities,
            &token,
            json!({ "type": "irrigation", "description": "Drip line check", "cost": 150.0 }),
        )
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value =
        test::call_and_read_body_json(&app, get(&activities, &token).to_request()).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let body: Value =
        test::call_and_read_body_json(&app, get(&uri, &token).to_request()).await;
    assert!(body["data"]["lastActivity"].is_string());

    let body: Value = test::call_and_read_body_json(
        &app,
        get("/api/v1/lands/statistics", &token).to_request(),
    )
    .await;
    assert_eq!(body["data"]["totalLands"], 1);
    assert_eq!(body["data"]["totalArea"], 12.5);

    let resp = test::call_service(&app, delete(&uri, &token).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = test::call_service(&app, get(&uri, &token).to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], "LAND_NOT_FOUND");

    let resp = test::call_service(&app, delete(&uri, &token).to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_lands_are_scoped_to_their_owner() {
    let app = test::init_service(create_app(test_state().await)).await;
    let body: Value = test::call_and_read_body_json(
        &app,
        register_request("Alice", "alice@example.com").to_request(),
    )
    .await;
    let alice = token_of(&body);
    let body: Value = test::call_and_read_body_json(
        &app,
        register_request("Bob", "bob@example.com").to_request(),
    )
    .await;
    let bob = token_of(&body);

    let body: Value = test::call_and_read_body_json(
        &app,
        post(
            "/api/v1/lands",
            &alice,
            json!({ "name": "Orchard", "area": 4.0, "unit": "decare" }),
        )
        .to_request(),
    )
    .await;
    let uri = format!("/api/v1/lands/{}", body["data"]["id"].as_str().unwrap());

    let resp = test::call_service(&app, get(&uri, &bob).to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: Value =
        test::call_and_read_body_json(&app, get("/api/v1/lands", &bob).to_request()).await;
    assert_eq!(body["data"]["pagination"]["total"], 0);
}

#[actix_web::test]
async fn test_malformed_path_id_is_a_bad_request() {
    let app = test::init_service(create_app(test_state().await)).await;
    let body: Value = test::call_and_read_body_json(
        &app,
        register_request("Alice", "alice@example.com").to_request(),
    )
    .await;
    let token = token_of(&body);

    let resp =
        test::call_service(&app, get("/api/v1/lands/not-a-uuid", &token).to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], "INVALID_REQUEST");
}

#[actix_web::test]
async fn test_livestock_tags_and_records() {
    let app = test::init_service(create_app(test_state().await)).await;
    let body: Value = test::call_and_read_body_json(
        &app,
        register_request("Alice", "alice@example.com").to_request(),
    )
    .await;
    let token = token_of(&body);

    let animal = json!({
        "tagNumber": "TR-001",
        "type": "cattle",
        "breed": "Holstein",
        "gender": "female",
        "birthDate": "2021-03-15",
        "weight": 540.0,
    });
    let resp =
        test::call_service(&app, post("/api/v1/livestock", &token, animal.clone()).to_request())
            .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["healthStatus"], "healthy");
    let animal_id = body["data"]["id"].as_str().unwrap().to_string();

    let resp =
        test::call_service(&app, post("/api/v1/livestock", &token, animal).to_request()).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], "TAG_EXISTS");

    let resp = test::call_service(
        &app,
        post(
            "/api/v1/livestock",
            &token,
            json!({ "tagNumber": "TR-002", "type": "cattle", "birthDate": "15.03.2021" }),
        )
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], "INVALID_DATE");

    let milk = format!("/api/v1/livestock/{}/milk-production", animal_id);
    for (date, amount) in [("2024-05-01", 21.5), ("2024-05-02", 23.0)] {
        let resp = test::call_service(
            &app,
            post(&milk, &token, json!({ "date": date, "amount": amount })).to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }
    let resp = test::call_service(
        &app,
        post(&milk, &token, json!({ "date": "2024-05-03" })).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::call_and_read_body_json(&app, get(&milk, &token).to_request()).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let health = format!("/api/v1/livestock/{}/health-records", animal_id);
    let resp = test::call_service(
        &app,
        post(
            &health,
            &token,
            json!({ "type": "vaccination", "description": "Anthrax", "date": "2024-04-10" }),
        )
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = test::call_and_read_body_json(
        &app,
        get("/api/v1/livestock/statistics", &token).to_request(),
    )
    .await;
    assert_eq!(body["data"]["total"], 1);

    let missing = format!("/api/v1/livestock/{}", uuid::Uuid::new_v4());
    let resp = test::call_service(&app, get(&missing, &token).to_request()).await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], "ANIMAL_NOT_FOUND");
}

#[actix_web::test]
async fn test_production_requires_an_owned_land() {
    let app = test::init_service(create_app(test_state().await)).await;
    let body: Value = test::call_and_read_body_json(
        &app,
        register_request("Alice", "alice@example.com").to_request(),
    )
    .await;
    let token = token_of(&body);

    let resp = test::call_service(
        &app,
        post(
            "/api/v1/production",
            &token,
            json!({
                "name": "Wheat harvest",
                "category": "grain",
                "amount": 3200.0,
                "unit": "kg",
                "landId": uuid::Uuid::new_v4(),
            }),
        )
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], "INVALID_LAND");

    let body: Value = test::call_and_read_body_json(
        &app,
        post(
            "/api/v1/lands",
            &token,
            json!({ "name": "South Field", "area": 20.0, "unit": "decare" }),
        )
        .to_request(),
    )
    .await;
    let land_id = body["data"]["id"].as_str().unwrap().to_string();

    let resp = test::call_service(
        &app,
        post(
            "/api/v1/production",
            &token,
            json!({
                "name": "Wheat harvest",
                "category": "grain",
                "amount": 3200.0,
                "unit": "kg",
                "price": 9.5,
                "landId": land_id,
                "harvestDate": "2024-07-01",
            }),
        )
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = test::call_service(
        &app,
        get("/api/v1/production?landId=nope", &token).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::call_and_read_body_json(
        &app,
        get(&format!("/api/v1/production?landId={}", land_id), &token).to_request(),
    )
    .await;
    assert_eq!(body["data"]["pagination"]["total"], 1);

    let body: Value = test::call_and_read_body_json(
        &app,
        get("/api/v1/production/categories", &token).to_request(),
    )
    .await;
    let categories = body["data"].as_array().unwrap();
    assert_eq!(
        categories.iter().filter(|c| c.as_str() == Some("grain")).count(),
        1
    );

    let body: Value = test::call_and_read_body_json(
        &app,
        get("/api/v1/production/statistics", &token).to_request(),
    )
    .await;
    assert_eq!(body["data"]["totalProducts"], 1);
    assert_eq!(body["data"]["totalAmount"], 3200.0);
}

#[actix_web::test]
async fn test_dashboard_endpoints() {
    let app = test::init_service(create_app(test_state().await)).await;
    let body: Value = test::call_and_read_body_json(
        &app,
        register_request("Alice", "alice@example.com").to_request(),
    )
    .await;
    let token = token_of(&body);

    let resp = test::call_service(&app, get("/api/v1/dashboard/summary", &token).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["data"]["animals"].is_object());
    assert!(body["data"]["finance"].is_object());

    let body: Value = test::call_and_read_body_json(
        &app,
        get("/api/v1/dashboard/charts/income-expense?months=3", &token).to_request(),
    )
    .await;
    assert_eq!(body["data"].as_array().unwrap().len(), 3);

    let resp = test::call_service(
        &app,
        get("/api/v1/dashboard/recent-activities?limit=5", &token).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = test::call_service(
        &app,
        get("/api/v1/dashboard/charts/production", &token).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
}
