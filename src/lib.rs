//! # GestaoPsi 백엔드 라이브러리
//!
//! 심리 상담 클리닉 관리 서버의 모듈을 모아둡니다.
//! `main.rs`는 설정과 서버 실행만 맡고, 라우터 조립은 `build_router`가 합니다.
//! 통합 테스트(`tests/`)도 같은 `build_router`로 앱을 만들어 호출합니다.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use std::path::Path;

use axum::{
    routing::{get, patch, post, put},
    Router,
};
use routes::AppState;
use sqlx::SqlitePool;
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

/// 임베드된 마이그레이션을 실행합니다.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// `/api/v1` 아래의 모든 API 라우트
///
/// 경로 파라미터는 axum 0.8 문법(`{id}`)을 씁니다.
/// 고정 경로(`/appointments/period`, `/appointments/generate`)는 `{id}`와 겹치지 않도록
/// 별도 라우트로 등록합니다. axum은 고정 경로를 파라미터보다 먼저 매칭합니다.
pub fn api_routes(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/auth/login", post(routes::auth::login))
        .route("/auth/refresh", post(routes::auth::refresh))
        .route("/auth/logout", post(routes::auth::logout))
        .route("/auth/me", get(routes::auth::me));

    Router::new()
        .merge(auth_routes)
        // 내담자
        .route(
            "/clients",
            get(routes::clients::list_clients).post(routes::clients::create_client),
        )
        .route(
            "/clients/{id}",
            get(routes::clients::get_client)
                .put(routes::clients::update_client)
                .delete(routes::clients::delete_client),
        )
        .route(
            "/client-types",
            get(routes::clients::list_client_types).post(routes::clients::create_client_type),
        )
        .route(
            "/client-types/{id}",
            put(routes::clients::update_client_type)
                .delete(routes::clients::delete_client_type),
        )
        // 상담 일정
        .route(
            "/appointments",
            get(routes::appointments::list_appointments)
                .post(routes::appointments::create_appointment),
        )
        .route(
            "/appointments/period",
            get(routes::appointments::list_appointments_period),
        )
        .route(
            "/appointments/generate",
            post(routes::appointments::generate_appointments),
        )
        .route(
            "/appointments/{id}",
            get(routes::appointments::get_appointment)
                .put(routes::appointments::update_appointment)
                .delete(routes::appointments::delete_appointment),
        )
        .route(
            "/appointments/{id}/status",
            patch(routes::appointments::update_appointment_status),
        )
        .route("/schedule/generate", post(routes::schedule::generate_schedule))
        // 경과 기록 / 경험 기록
        .route(
            "/progress-notes",
            get(routes::progress_notes::list_progress_notes)
                .post(routes::progress_notes::create_progress_note),
        )
        .route(
            "/progress-notes/{id}",
            get(routes::progress_notes::get_progress_note)
                .put(routes::progress_notes::update_progress_note)
                .delete(routes::progress_notes::delete_progress_note),
        )
        .route(
            "/experiences",
            get(routes::experiences::list_experiences)
                .post(routes::experiences::create_experience),
        )
        .route(
            "/experiences/{id}",
            get(routes::experiences::get_experience)
                .put(routes::experiences::update_experience)
                .delete(routes::experiences::delete_experience),
        )
        // 지출
        .route(
            "/expenses",
            get(routes::expenses::list_expenses).post(routes::expenses::create_expense),
        )
        .route(
            "/expenses/{id}",
            get(routes::expenses::get_expense)
                .put(routes::expenses::update_expense)
                .delete(routes::expenses::delete_expense),
        )
        .route(
            "/expense-types",
            get(routes::expenses::list_expense_types).post(routes::expenses::create_expense_type),
        )
        .route(
            "/expense-types/{id}",
            put(routes::expenses::update_expense_type)
                .delete(routes::expenses::delete_expense_type),
        )
        // 사용자 / 그룹
        .route(
            "/users",
            get(routes::users::list_users).post(routes::users::create_user),
        )
        .route(
            "/users/{id}",
            get(routes::users::get_user)
                .put(routes::users::update_user)
                .delete(routes::users::delete_user),
        )
        .route("/users/{id}/password", patch(routes::users::change_password))
        .route(
            "/groups",
            get(routes::groups::list_groups).post(routes::groups::create_group),
        )
        .route(
            "/groups/{id}",
            get(routes::groups::get_group)
                .put(routes::groups::update_group)
                .delete(routes::groups::delete_group),
        )
        // 감사 로그 / 대시보드
        .route("/logs", get(routes::audit::list_logs))
        .route("/dashboard/stats", get(routes::dashboard::dashboard_stats))
        .route("/dashboard/today", get(routes::dashboard::today_appointments))
        // 헬스체크 (인증 불필요)
        .route("/health", get(routes::health::health_check))
        .with_state(state)
}

/// 전체 애플리케이션 라우터를 만듭니다.
///
/// `frontend_dist` 디렉토리가 있으면 API 외의 경로는 정적 파일로 서빙하고,
/// 찾지 못한 경로는 `index.html`로 돌려보냅니다 (SPA 라우팅).
pub fn build_router(state: AppState, frontend_dist: Option<&str>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let router = Router::new().nest("/api/v1", api_routes(state));

    let router = match frontend_dist.filter(|dir| Path::new(dir).exists()) {
        Some(dir) => {
            tracing::info!("Serving frontend static files from {}", dir);
            let serve_dir = ServeDir::new(dir)
                .not_found_service(ServeFile::new(Path::new(dir).join("index.html")));
            router.fallback_service(serve_dir)
        }
        None => {
            tracing::warn!("Frontend dist directory not found, serving API only");
            router
        }
    };

    router.layer(cors).layer(TraceLayer::new_for_http())
}
