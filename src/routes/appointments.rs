//! # 상담 일정(Appointment) 라우트 핸들러
//!
//! ## 엔드포인트
//! | 메서드 | 경로 | 핸들러 | 설명 |
//! |--------|------|--------|------|
//! | GET | /api/v1/appointments | `list_appointments` | 목록 (`date`, `client_id`, `status` 필터) |
//! | POST | /api/v1/appointments | `create_appointment` | 새 상담 |
//! | GET | /api/v1/appointments/period | `list_appointments_period` | `start`~`end` 기간 조회 |
//! | POST | /api/v1/appointments/generate | `generate_appointments` | 월간 일정을 생성해 저장 |
//! | GET | /api/v1/appointments/{id} | `get_appointment` | 단일 조회 |
//! | PUT | /api/v1/appointments/{id} | `update_appointment` | 전체 수정 |
//! | PATCH | /api/v1/appointments/{id}/status | `update_appointment_status` | 상태만 변경 |
//! | DELETE | /api/v1/appointments/{id} | `delete_appointment` | 삭제 |
//!
//! 모든 핸들러는 그룹의 `schedule` 권한이 필요합니다.

use crate::{
    db,
    error::AppError,
    middleware::auth::{require_permission, AuthUser},
    models::*,
    routes::{audit, AppState},
    services,
};
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

const MODULE: &str = "appointments";

pub async fn list_appointments(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(query): Query<AppointmentListQuery>,
) -> Result<Json<Value>, AppError> {
    require_permission(&state.pool, &auth_user, Permission::Schedule).await?;

    let appointments = db::list_appointments(&state.pool, &query).await?;
    Ok(Json(json!({ "appointments": appointments })))
}

/// `GET /appointments/period?start=YYYY-MM-DD&end=YYYY-MM-DD`
pub async fn list_appointments_period(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<Value>, AppError> {
    require_permission(&state.pool, &auth_user, Permission::Schedule).await?;
    let (start, end) = query.validated()?;

    let appointments = db::list_appointments_between(&state.pool, start, end).await?;
    Ok(Json(json!({ "appointments": appointments })))
}

pub async fn get_appointment(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Appointment>, AppError> {
    require_permission(&state.pool, &auth_user, Permission::Schedule).await?;

    let appointment = db::get_appointment(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(appointment))
}

pub async fn create_appointment(
    State(state): State<AppState>,
    auth_user: AuthUser,
    payload: Result<Json<AppointmentRequest>, JsonRejection>,
) -> Result<Json<Appointment>, AppError> {
    require_permission(&state.pool, &auth_user, Permission::Schedule).await?;
    let Json(req) = payload?;
    let req = req.validated()?;

    let appointment = db::create_appointment(&state.pool, &req, &auth_user.user_id).await?;
    audit(
        &state,
        &auth_user,
        AuditAction::Create,
        MODULE,
        format!(
            "Scheduled {} on {} at {}",
            appointment.client_name, appointment.date, appointment.time
        ),
    )
    .await;

    Ok(Json(appointment))
}

pub async fn update_appointment(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    payload: Result<Json<AppointmentRequest>, JsonRejection>,
) -> Result<Json<Appointment>, AppError> {
    require_permission(&state.pool, &auth_user, Permission::Schedule).await?;
    let Json(req) = payload?;
    let req = req.validated()?;

    let appointment = db::update_appointment(&state.pool, &id, &req)
        .await?
        .ok_or(AppError::NotFound)?;
    audit(
        &state,
        &auth_user,
        AuditAction::Update,
        MODULE,
        format!(
            "Updated appointment of {} on {} at {}",
            appointment.client_name, appointment.date, appointment.time
        ),
    )
    .await;

    Ok(Json(appointment))
}

/// `PATCH /appointments/{id}/status` + `{ "status": "completed" }`
pub async fn update_appointment_status(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    payload: Result<Json<UpdateAppointmentStatusRequest>, JsonRejection>,
) -> Result<Json<Appointment>, AppError> {
    require_permission(&state.pool, &auth_user, Permission::Schedule).await?;
    let Json(req) = payload?;

    let appointment = db::update_appointment_status(&state.pool, &id, req.status)
        .await?
        .ok_or(AppError::NotFound)?;
    audit(
        &state,
        &auth_user,
        AuditAction::Update,
        MODULE,
        format!(
            "Set appointment of {} on {} to {:?}",
            appointment.client_name, appointment.date, appointment.status
        ),
    )
    .await;

    Ok(Json(appointment))
}

pub async fn delete_appointment(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    require_permission(&state.pool, &auth_user, Permission::Schedule).await?;

    let appointment = db::get_appointment(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    if !db::delete_appointment(&state.pool, &id).await? {
        return Err(AppError::NotFound);
    }
    audit(
        &state,
        &auth_user,
        AuditAction::Delete,
        MODULE,
        format!(
            "Deleted appointment of {} on {} at {}",
            appointment.client_name, appointment.date, appointment.time
        ),
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}

/// `POST /appointments/generate` + `{ "month": 1, "year": 2024 }`
///
/// 반복 규칙을 펼친 결과를 저장합니다. 이미 같은 내담자·날짜·시각의 상담이 있으면
/// 건너뛰므로 같은 달을 다시 생성해도 중복되지 않습니다.
pub async fn generate_appointments(
    State(state): State<AppState>,
    auth_user: AuthUser,
    payload: Result<Json<GenerateScheduleRequest>, JsonRejection>,
) -> Result<Json<GenerateAppointmentsResponse>, AppError> {
    require_permission(&state.pool, &auth_user, Permission::Schedule).await?;
    let Json(req) = payload?;

    let rules = db::list_recurrence_rules(&state.pool).await?;
    let schedule = services::expand_month(&rules, req.month, req.year)?;
    let fees = db::list_session_fees(&state.pool).await?;

    let (created, skipped_existing) = db::insert_generated_appointments(
        &state.pool,
        &schedule.instances,
        &fees,
        &auth_user.user_id,
    )
    .await?;

    tracing::info!(
        month = req.month,
        year = req.year,
        created,
        skipped_existing,
        skipped_rules = schedule.skipped_rules,
        "Generated monthly appointments"
    );

    audit(
        &state,
        &auth_user,
        AuditAction::Generate,
        MODULE,
        format!(
            "Generated {:02}/{}: {} created, {} already existed",
            req.month, req.year, created, skipped_existing
        ),
    )
    .await;

    Ok(Json(GenerateAppointmentsResponse {
        created,
        skipped_existing,
        skipped_rules: schedule.skipped_rules,
    }))
}
