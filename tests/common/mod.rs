//! 통합 테스트 공용 도우미
//!
//! 테스트마다 새 인메모리 SQLite에 마이그레이션을 적용하고,
//! 관리자 계정(`admin` / `admin-password`)을 만든 뒤 실제 라우터를 `oneshot`으로 호출합니다.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use gestaopsi::{
    build_router, config::AdminBootstrap, routes::AppState, run_migrations, services,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use tower::ServiceExt;

pub const ADMIN_LOGIN: &str = "admin";
pub const ADMIN_PASSWORD: &str = "admin-password";
pub const ADMIN_EMAIL: &str = "admin@example.com";

/// 인메모리 DB는 연결마다 따로 생기므로 연결 하나를 끝까지 재사용합니다.
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("connect in-memory sqlite");
    run_migrations(&pool).await.expect("run migrations");
    pool
}

pub struct TestApp {
    pub router: Router,
    pub pool: SqlitePool,
}

impl TestApp {
    pub async fn new() -> Self {
        let pool = test_pool().await;
        services::bootstrap::ensure_admin(
            &pool,
            &AdminBootstrap {
                login: ADMIN_LOGIN.to_string(),
                password: ADMIN_PASSWORD.to_string(),
                email: ADMIN_EMAIL.to_string(),
            },
        )
        .await
        .expect("bootstrap admin");

        let state = AppState {
            pool: pool.clone(),
            jwt_secret: "integration-test-secret".to_string(),
        };

        Self {
            router: build_router(state, None),
            pool,
        }
    }

    /// 요청을 보내고 (상태 코드, JSON 본문)을 돌려줍니다. 본문이 비어 있으면 `Value::Null`.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.send(request).await
    }

    /// 미리 만든 요청을 그대로 보냅니다 (잘못된 JSON 본문 테스트용).
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, body)
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, Some(token), Some(body)).await
    }

    pub async fn patch(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PATCH, uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, Some(token), None).await
    }

    /// 로그인 후 전체 응답 본문(`user`, `access_token`, `refresh_token`)
    pub async fn login_response(&self, login: &str, password: &str) -> Value {
        let (status, body) = self
            .request(
                Method::POST,
                "/api/v1/auth/login",
                None,
                Some(json!({ "login": login, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {}", body);
        body
    }

    pub async fn login(&self, login: &str, password: &str) -> String {
        let body = self.login_response(login, password).await;
        body["access_token"].as_str().unwrap().to_string()
    }

    pub async fn admin_token(&self) -> String {
        self.login(ADMIN_LOGIN, ADMIN_PASSWORD).await
    }

    /// 내담자를 등록하고 ID를 돌려줍니다.
    pub async fn create_client(&self, token: &str, body: Value) -> String {
        let (status, client) = self.post("/api/v1/clients", token, body).await;
        assert_eq!(status, StatusCode::OK, "create client failed: {}", client);
        client["id"].as_str().unwrap().to_string()
    }
}
