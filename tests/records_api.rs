mod common;

use axum::http::StatusCode;
use chrono::Local;
use common::TestApp;
use serde_json::json;

#[tokio::test]
async fn client_crud_and_filters() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;

    let (status, client_type) = app
        .post("/api/v1/client-types", &token, json!({ "name": "Adulto" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    let type_id = client_type["id"].as_str().unwrap();

    let ana = app
        .create_client(
            &token,
            json!({ "name": "Ana Souza", "email": "ana@example.com", "client_type_id": type_id }),
        )
        .await;
    app.create_client(&token, json!({ "name": "Bruno Lima", "active": false }))
        .await;

    let (_, list) = app.get("/api/v1/clients?search=SOUZA", &token).await;
    assert_eq!(list["clients"].as_array().unwrap().len(), 1);
    assert_eq!(list["clients"][0]["id"], ana.as_str());
    assert_eq!(list["clients"][0]["session_duration"], 50);

    let (_, list) = app.get("/api/v1/clients?active=false", &token).await;
    assert_eq!(list["clients"][0]["name"], "Bruno Lima");

    let (_, list) = app
        .get(&format!("/api/v1/clients?client_type_id={}", type_id), &token)
        .await;
    assert_eq!(list["clients"].as_array().unwrap().len(), 1);

    let (status, updated) = app
        .put(
            &format!("/api/v1/clients/{}", ana),
            &token,
            json!({ "name": "Ana Souza", "session_weekday": "terça", "session_time": "16:00" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["session_weekday"], "Tuesday");
    assert_eq!(updated["session_time"], "16:00");
    assert_eq!(updated["client_type_id"], json!(null));

    let (status, _) = app.delete(&format!("/api/v1/clients/{}", ana), &token).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = app.get(&format!("/api/v1/clients/{}", ana), &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn client_validation_errors_are_bad_requests() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;

    for body in [
        json!({ "name": "" }),
        json!({ "name": "Ana", "session_weekday": "Monday" }),
        json!({ "name": "Ana", "session_weekday": "Someday", "session_time": "09:00" }),
        json!({ "name": "Ana", "session_weekday": "Monday", "session_time": "25:00" }),
        json!({ "name": "Ana", "session_duration": 0 }),
        json!({ "name": "Ana", "client_type_id": "missing" }),
    ] {
        let (status, response) = app.post("/api/v1/clients", &token, body.clone()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{} -> {}", body, response);
    }
}

#[tokio::test]
async fn deleting_client_type_keeps_clients() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;
    let (_, client_type) = app
        .post("/api/v1/client-types", &token, json!({ "name": "Infantil" }))
        .await;
    let type_id = client_type["id"].as_str().unwrap();
    let client = app
        .create_client(&token, json!({ "name": "Caio", "client_type_id": type_id }))
        .await;

    let (status, _) = app
        .post("/api/v1/client-types", &token, json!({ "name": "Infantil" }))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app
        .delete(&format!("/api/v1/client-types/{}", type_id), &token)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = app.get(&format!("/api/v1/clients/{}", client), &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["client_type_id"], json!(null));
}

#[tokio::test]
async fn appointment_lifecycle() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;
    let client = app.create_client(&token, json!({ "name": "Ana" })).await;

    let (status, appointment) = app
        .post(
            "/api/v1/appointments",
            &token,
            json!({ "client_id": client, "date": "2024-03-04", "time": "9:00", "fee": 120.0 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", appointment);
    assert_eq!(appointment["time"], "09:00");
    assert_eq!(appointment["status"], "scheduled");
    assert_eq!(appointment["kind"], "consultation");
    assert_eq!(appointment["client_name"], "Ana");
    let id = appointment["id"].as_str().unwrap();

    let (status, confirmed) = app
        .patch(
            &format!("/api/v1/appointments/{}/status", id),
            &token,
            json!({ "status": "confirmed" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(confirmed["status"], "confirmed");
    assert_eq!(confirmed["confirmed"], true);

    let (status, _) = app
        .patch(
            &format!("/api/v1/appointments/{}/status", id),
            &token,
            json!({ "status": "postponed" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, by_date) = app.get("/api/v1/appointments?date=2024-03-04", &token).await;
    assert_eq!(by_date["appointments"].as_array().unwrap().len(), 1);

    let (_, period) = app
        .get("/api/v1/appointments/period?start=2024-03-01&end=2024-03-31", &token)
        .await;
    assert_eq!(period["appointments"].as_array().unwrap().len(), 1);
    let (_, period) = app
        .get("/api/v1/appointments/period?start=2024-04-01&end=2024-04-30", &token)
        .await;
    assert_eq!(period["appointments"], json!([]));
    let (status, _) = app
        .get("/api/v1/appointments/period?start=2024-04-30&end=2024-04-01", &token)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .post(
            "/api/v1/appointments",
            &token,
            json!({ "client_id": "missing", "date": "2024-03-04", "time": "10:00" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // 내담자를 지우면 상담도 함께 지워집니다.
    app.delete(&format!("/api/v1/clients/{}", client), &token).await;
    let (status, _) = app.get(&format!("/api/v1/appointments/{}", id), &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn progress_notes_and_experiences() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;
    let ana = app.create_client(&token, json!({ "name": "Ana" })).await;
    let bia = app.create_client(&token, json!({ "name": "Bia" })).await;

    let (status, note) = app
        .post(
            "/api/v1/progress-notes",
            &token,
            json!({
                "client_id": ana,
                "date": "2024-01-08",
                "procedure": "Escuta",
                "synthesis": "Relatou ansiedade",
                "conduct": "Manter frequência semanal"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", note);
    assert_eq!(note["client_name"], "Ana");

    let (status, _) = app
        .post(
            "/api/v1/progress-notes",
            &token,
            json!({ "client_id": ana, "date": "2024-01-08", "procedure": "", "synthesis": "x", "conduct": "y" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, notes) = app
        .get(&format!("/api/v1/progress-notes?client_id={}", bia), &token)
        .await;
    assert_eq!(notes["progress_notes"], json!([]));

    let (status, _) = app
        .post("/api/v1/experiences", &token, json!({ "client_id": bia }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .post(
            "/api/v1/experiences",
            &token,
            json!({ "client_id": bia, "positive": "Conseguiu dormir melhor" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, found) = app.get("/api/v1/experiences?search=DORMIR", &token).await;
    assert_eq!(found["experiences"].as_array().unwrap().len(), 1);
    assert_eq!(found["experiences"][0]["client_name"], "Bia");

    let (status, _) = app
        .post(
            "/api/v1/experiences",
            &token,
            json!({ "client_id": "missing", "negative": "x" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn expenses_filter_by_month() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;
    let (_, rent) = app
        .post("/api/v1/expense-types", &token, json!({ "name": "Aluguel" }))
        .await;

    for (date, amount) in [("2024-01-05", 1200.0), ("2024-01-20", 80.5), ("2024-02-05", 1200.0)] {
        let (status, _) = app
            .post(
                "/api/v1/expenses",
                &token,
                json!({ "date": date, "description": "Despesa", "amount": amount, "expense_type_id": rent["id"] }),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, january) = app.get("/api/v1/expenses?month=1&year=2024", &token).await;
    assert_eq!(january["expenses"].as_array().unwrap().len(), 2);
    assert_eq!(january["total"], 1280.5);
    assert_eq!(january["expenses"][0]["expense_type_name"], "Aluguel");

    let (status, _) = app.get("/api/v1/expenses?month=13&year=2024", &token).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .post(
            "/api/v1/expenses",
            &token,
            json!({ "date": "2024-01-05", "description": "Zero", "amount": 0 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn dashboard_stats_for_today() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;
    let today = Local::now().date_naive().format("%Y-%m-%d").to_string();
    let client = app.create_client(&token, json!({ "name": "Ana" })).await;
    app.create_client(&token, json!({ "name": "Inativo", "active": false }))
        .await;

    for (time, fee, status) in [("09:00", 150.0, "completed"), ("10:00", 100.0, "scheduled")] {
        let (code, _) = app
            .post(
                "/api/v1/appointments",
                &token,
                json!({ "client_id": client, "date": today, "time": time, "fee": fee, "status": status }),
            )
            .await;
        assert_eq!(code, StatusCode::OK);
    }
    app.post(
        "/api/v1/expenses",
        &token,
        json!({ "date": today, "description": "Material", "amount": 30.0 }),
    )
    .await;

    let (status, stats) = app.get("/api/v1/dashboard/stats", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["active_clients"], 1);
    assert_eq!(stats["appointments_today"], 2);
    assert_eq!(stats["revenue_this_month"], 150.0);
    assert_eq!(stats["expenses_this_month"], 30.0);
    assert_eq!(stats["progress_notes_this_month"], 0);

    let (_, today_list) = app.get("/api/v1/dashboard/today", &token).await;
    let appointments = today_list["appointments"].as_array().unwrap();
    assert_eq!(appointments.len(), 2);
    assert_eq!(appointments[0]["time"], "09:00");
}
