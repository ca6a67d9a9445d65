//! # GestaoPsi 웹 서버 진입점
//!
//! 이 파일이 수행하는 작업:
//! 1. 환경변수(.env) 로딩
//! 2. 로깅(tracing) 초기화
//! 3. SQLite 데이터베이스 연결 풀 생성과 마이그레이션
//! 4. 첫 실행이면 관리자 계정 생성
//! 5. 라우터 조립과 HTTP 서버 시작

use anyhow::Result;
use gestaopsi::{build_router, config::Config, routes::AppState, run_migrations, services};
use sqlx::sqlite::SqlitePoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1단계: 환경변수 로딩 ──
    // .env 파일이 없어도 에러 없이 넘어갑니다.
    dotenvy::dotenv().ok();

    // ── 2단계: 로깅 초기화 ──
    // RUST_LOG가 없으면 gestaopsi, tower_http, axum 모듈을 debug 레벨로 봅니다.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gestaopsi=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // ── 3단계: 설정 로딩 ──
    let config = Config::from_env()?;
    tracing::info!("Starting GestaoPsi server on {}:{}", config.host, config.port);

    // ── 4단계: DB 연결 풀과 마이그레이션 ──
    // sqlx는 SQLite 연결마다 foreign_keys를 켜므로 ON DELETE CASCADE가 동작합니다.
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;

    run_migrations(&pool).await?;
    tracing::info!("Database migrations completed");

    // ── 5단계: 첫 실행 관리자 계정 ──
    match &config.admin {
        Some(admin) => {
            services::bootstrap::ensure_admin(&pool, admin).await?;
        }
        None => tracing::debug!("ADMIN_LOGIN/ADMIN_PASSWORD not set, skipping admin bootstrap"),
    }

    // ── 6단계: 라우터 ──
    let state = AppState {
        pool,
        jwt_secret: config.jwt_secret.clone(),
    };
    let app = build_router(state, Some(&config.frontend_dist));

    // ── 7단계: 서버 시작 ──
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
