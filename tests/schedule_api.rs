mod common;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use common::TestApp;
use serde_json::json;

#[tokio::test]
async fn generate_expands_weekly_slot_for_the_month() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;
    let ana = app
        .create_client(
            &token,
            json!({ "name": "Ana", "session_weekday": "Monday", "session_time": "09:00" }),
        )
        .await;

    let (status, body) = app
        .post("/api/v1/schedule/generate", &token, json!({ "month": 1, "year": 2024 }))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["skipped_rules"], 0);
    let instances = body["instances"].as_array().unwrap();
    let dates: Vec<&str> = instances.iter().map(|i| i["date"].as_str().unwrap()).collect();
    assert_eq!(
        dates,
        ["2024-01-01", "2024-01-08", "2024-01-15", "2024-01-22", "2024-01-29"]
    );
    for instance in instances {
        assert_eq!(instance["client_id"], ana.as_str());
        assert_eq!(instance["client_name"], "Ana");
        assert_eq!(instance["weekday"], "Monday");
        assert_eq!(instance["time"], "09:00");
        assert_eq!(instance["duration_minutes"], 50);
        assert_eq!(instance["status"], "scheduled");
    }
}

#[tokio::test]
async fn generate_orders_by_date_then_time_and_skips_inactive_clients() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;
    app.create_client(
        &token,
        json!({ "name": "Bruno", "session_weekday": "Thursday", "session_time": "14:00" }),
    )
    .await;
    app.create_client(
        &token,
        json!({ "name": "Carla", "session_weekday": "quinta", "session_time": "08:30" }),
    )
    .await;
    app.create_client(
        &token,
        json!({
            "name": "Davi",
            "session_weekday": "Thursday",
            "session_time": "10:00",
            "active": false
        }),
    )
    .await;

    let (status, body) = app
        .post("/api/v1/schedule/generate", &token, json!({ "month": 2, "year": 2024 }))
        .await;

    assert_eq!(status, StatusCode::OK);
    let instances = body["instances"].as_array().unwrap();
    // 2024년 2월의 목요일은 1, 8, 15, 22, 29일 다섯 번입니다.
    assert_eq!(instances.len(), 10);
    assert!(instances.iter().all(|i| i["client_name"] != "Davi"));
    assert_eq!(instances[0]["client_name"], "Carla");
    assert_eq!(instances[0]["date"], "2024-02-01");
    assert_eq!(instances[1]["client_name"], "Bruno");
    assert_eq!(instances[1]["date"], "2024-02-01");
    assert_eq!(instances[9]["date"], "2024-02-29");
}

#[tokio::test]
async fn generate_with_no_clients_returns_empty_list() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;

    let (status, body) = app
        .post("/api/v1/schedule/generate", &token, json!({ "month": 6, "year": 2025 }))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["instances"], json!([]));
    assert_eq!(body["skipped_rules"], 0);
}

#[tokio::test]
async fn generate_rejects_invalid_month_and_year() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;

    for payload in [
        json!({ "month": 0, "year": 2024 }),
        json!({ "month": 13, "year": 2024 }),
        json!({ "month": 1, "year": 999999 }),
        json!({ "month": 1, "year": "2024" }),
        json!({ "month": 1 }),
    ] {
        let (status, body) = app.post("/api/v1/schedule/generate", &token, payload.clone()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "payload {} -> {}", payload, body);
        assert_eq!(body["error"]["code"], "bad_request");
    }
}

#[tokio::test]
async fn generate_rejects_malformed_json() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/schedule/generate")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{ \"month\": 1, "))
        .unwrap();
    let (status, _) = app.send(request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn generate_requires_authentication() {
    let app = TestApp::new().await;

    let (status, body) = app
        .request(
            Method::POST,
            "/api/v1/schedule/generate",
            None,
            Some(json!({ "month": 1, "year": 2024 })),
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "missing_token");
}

#[tokio::test]
async fn saving_generated_month_is_idempotent() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;
    let ana = app
        .create_client(
            &token,
            json!({
                "name": "Ana",
                "session_weekday": "Monday",
                "session_time": "09:00",
                "session_fee": 150.0
            }),
        )
        .await;

    let (status, first) = app
        .post("/api/v1/appointments/generate", &token, json!({ "month": 1, "year": 2024 }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first, json!({ "created": 5, "skipped_existing": 0, "skipped_rules": 0 }));

    let (_, second) = app
        .post("/api/v1/appointments/generate", &token, json!({ "month": 1, "year": 2024 }))
        .await;
    assert_eq!(second, json!({ "created": 0, "skipped_existing": 5, "skipped_rules": 0 }));

    let (status, list) = app
        .get(&format!("/api/v1/appointments?client_id={}", ana), &token)
        .await;
    assert_eq!(status, StatusCode::OK);
    let appointments = list["appointments"].as_array().unwrap();
    assert_eq!(appointments.len(), 5);
    assert!(appointments.iter().all(|a| a["fee"] == 150.0));
    assert!(appointments.iter().all(|a| a["kind"] == "consultation"));
}

#[tokio::test]
async fn generate_skips_rows_stored_with_bad_slots() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;
    app.create_client(
        &token,
        json!({ "name": "Ana", "session_weekday": "Monday", "session_time": "09:00" }),
    )
    .await;

    // 검증을 거치지 않은 과거 데이터처럼 잘못된 요일을 직접 넣습니다.
    sqlx::query(
        "INSERT INTO clients (id, name, session_weekday, session_time) VALUES ('legacy', 'Legado', 'Funday', '10:00')",
    )
    .execute(&app.pool)
    .await
    .unwrap();

    let (status, body) = app
        .post("/api/v1/schedule/generate", &token, json!({ "month": 1, "year": 2024 }))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["skipped_rules"], 1);
    assert_eq!(body["instances"].as_array().unwrap().len(), 5);
}
