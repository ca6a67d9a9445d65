//! # 대시보드 핸들러
//!
//! - `GET /api/v1/dashboard/stats`: 활성 내담자 수, 오늘 상담 수, 이번 달 경과 기록/매출/지출
//! - `GET /api/v1/dashboard/today`: 오늘 상담 목록 (시각순)
//!
//! 로그인한 사용자면 누구나 볼 수 있지만, 금액 항목은 그룹의 `receipts` 권한이 있어야 채워집니다.
//! "오늘"은 서버 로컬 날짜입니다.

use crate::{db, error::AppError, middleware::auth::AuthUser, models::*, routes::AppState};
use axum::{extract::State, Json};
use chrono::Local;
use serde_json::{json, Value};

pub async fn dashboard_stats(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<DashboardStats>, AppError> {
    let today = Local::now().date_naive();
    let mut stats = db::dashboard_stats(&state.pool, today).await?;

    let sees_finance = db::get_group_for_user(&state.pool, &auth_user.user_id)
        .await?
        .is_some_and(|group| group.allows(Permission::Receipts));
    if !sees_finance {
        stats.revenue_this_month = None;
        stats.expenses_this_month = None;
    }

    Ok(Json(stats))
}

pub async fn today_appointments(
    State(state): State<AppState>,
    _auth_user: AuthUser,
) -> Result<Json<Value>, AppError> {
    let today = Local::now().date_naive();
    let appointments = db::list_appointments_between(&state.pool, today, today).await?;
    Ok(Json(json!({ "date": today, "appointments": appointments })))
}
