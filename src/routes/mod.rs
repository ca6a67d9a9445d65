//! # 라우트 핸들러 모듈
//!
//! HTTP 요청을 처리하는 핸들러 함수들을 모아둔 모듈입니다.
//! Axum에서 핸들러는 HTTP 요청을 받아 응답을 반환하는 async 함수입니다.
//!
//! 각 하위 모듈:
//! - `appointments`: 상담 일정 CRUD, 기간 조회, 상태 변경, 월간 일정 저장
//! - `audit`: 감사 로그 조회
//! - `auth`: 로그인, 토큰 갱신, 로그아웃, 내 정보
//! - `clients`: 내담자와 내담자 유형
//! - `dashboard`: 대시보드 통계와 오늘의 상담
//! - `expenses`: 지출과 지출 유형
//! - `experiences`: 경험 기록
//! - `groups`: 사용자 그룹(권한)
//! - `health`: 서버 상태 확인 (헬스체크)
//! - `progress_notes`: 경과 기록
//! - `schedule`: 월간 일정 미리보기(저장 없음)
//! - `users`: 사용자 관리와 비밀번호 변경
//!
//! 요청 본문은 `Result<Json<T>, JsonRejection>`으로 받아 `?`로 `AppError`(400)로 바꿉니다.

pub mod appointments;
pub mod audit;
pub mod auth;
pub mod clients;
pub mod dashboard;
pub mod expenses;
pub mod experiences;
pub mod groups;
pub mod health;
pub mod progress_notes;
pub mod schedule;
pub mod users;

use sqlx::SqlitePool;

use crate::{
    db,
    middleware::auth::AuthUser,
    models::{AuditAction, AuditLevel, NewAuditLog},
};

/// 애플리케이션 공유 상태
///
/// 모든 요청 핸들러가 `State(state): State<AppState>`로 접근합니다.
/// SqlitePool은 내부적으로 Arc를 사용하므로 clone해도 풀이 복제되지 않습니다.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    /// JWT 토큰 서명용 비밀키
    pub jwt_secret: String,
}

/// 요청한 사용자 이름으로 감사 로그 한 줄을 남깁니다 (실패해도 요청은 계속됩니다).
pub(crate) async fn audit(
    state: &AppState,
    user: &AuthUser,
    action: AuditAction,
    module: &str,
    description: String,
) {
    db::record(
        &state.pool,
        NewAuditLog {
            user_id: Some(user.user_id.as_str()),
            action,
            module,
            description,
            level: AuditLevel::Info,
        },
    )
    .await;
}
