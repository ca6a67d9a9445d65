//! # 월간 일정 생성 핸들러
//!
//! ## 엔드포인트
//! - `POST /api/v1/schedule/generate` + `{ "month": 1, "year": 2024 }`
//!   → `{ "instances": [...], "skipped_rules": 0 }`
//!
//! 등록된 내담자의 주간 고정 시간(반복 규칙)을 해당 달의 상담 일정으로 펼쳐 돌려줍니다.
//! 결과는 저장하지 않는 미리보기이며, 저장은 `POST /appointments/generate`가 합니다.
//!
//! 월이 1~12 밖이거나 연도가 범위를 벗어나면 400을 돌려줍니다.

use crate::{
    db,
    error::AppError,
    middleware::auth::{require_permission, AuthUser},
    models::*,
    routes::AppState,
    services,
};
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

pub async fn generate_schedule(
    State(state): State<AppState>,
    auth_user: AuthUser,
    payload: Result<Json<GenerateScheduleRequest>, JsonRejection>,
) -> Result<Json<ExpandedSchedule>, AppError> {
    require_permission(&state.pool, &auth_user, Permission::Schedule).await?;
    let Json(req) = payload?;

    let rules = db::list_recurrence_rules(&state.pool).await?;
    let schedule = services::expand_month(&rules, req.month, req.year)?;

    tracing::debug!(
        month = req.month,
        year = req.year,
        instances = schedule.instances.len(),
        skipped_rules = schedule.skipped_rules,
        "Expanded monthly schedule"
    );

    Ok(Json(schedule))
}
