//! # 지출 라우트 핸들러
//!
//! ## 엔드포인트
//! | 메서드 | 경로 | 설명 |
//! |--------|------|------|
//! | GET | /api/v1/expenses?month=&year=&expense_type_id= | 목록 |
//! | POST | /api/v1/expenses | 생성 |
//! | GET/PUT/DELETE | /api/v1/expenses/{id} | 단일 조회/수정/삭제 |
//! | GET/POST | /api/v1/expense-types | 유형 목록/생성 |
//! | PUT/DELETE | /api/v1/expense-types/{id} | 유형 수정/삭제 |
//!
//! 그룹의 `expenses` 권한이 필요합니다.

use crate::{
    db,
    error::AppError,
    middleware::auth::{require_permission, AuthUser},
    models::*,
    routes::{audit, AppState},
};
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

const MODULE: &str = "expenses";

pub async fn list_expenses(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(query): Query<ExpenseListQuery>,
) -> Result<Json<Value>, AppError> {
    require_permission(&state.pool, &auth_user, Permission::Expenses).await?;

    let expenses = db::list_expenses(&state.pool, &query).await?;
    // 화면에서 바로 합계를 보여줄 수 있도록 함께 돌려줍니다.
    let total: f64 = expenses.iter().map(|e| e.amount).sum();
    Ok(Json(json!({ "expenses": expenses, "total": total })))
}

pub async fn get_expense(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Expense>, AppError> {
    require_permission(&state.pool, &auth_user, Permission::Expenses).await?;

    let expense = db::get_expense(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(expense))
}

pub async fn create_expense(
    State(state): State<AppState>,
    auth_user: AuthUser,
    payload: Result<Json<ExpenseRequest>, JsonRejection>,
) -> Result<Json<Expense>, AppError> {
    require_permission(&state.pool, &auth_user, Permission::Expenses).await?;
    let Json(req) = payload?;
    let req = req.validated()?;

    let expense = db::create_expense(&state.pool, &req).await?;
    audit(
        &state,
        &auth_user,
        AuditAction::Create,
        MODULE,
        format!("Created expense {} ({:.2})", expense.description, expense.amount),
    )
    .await;

    Ok(Json(expense))
}

pub async fn update_expense(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    payload: Result<Json<ExpenseRequest>, JsonRejection>,
) -> Result<Json<Expense>, AppError> {
    require_permission(&state.pool, &auth_user, Permission::Expenses).await?;
    let Json(req) = payload?;
    let req = req.validated()?;

    let expense = db::update_expense(&state.pool, &id, &req)
        .await?
        .ok_or(AppError::NotFound)?;
    audit(
        &state,
        &auth_user,
        AuditAction::Update,
        MODULE,
        format!("Updated expense {} ({:.2})", expense.description, expense.amount),
    )
    .await;

    Ok(Json(expense))
}

pub async fn delete_expense(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    require_permission(&state.pool, &auth_user, Permission::Expenses).await?;

    if !db::delete_expense(&state.pool, &id).await? {
        return Err(AppError::NotFound);
    }
    audit(
        &state,
        &auth_user,
        AuditAction::Delete,
        MODULE,
        format!("Deleted expense {}", id),
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}

// ── 지출 유형 ──

pub async fn list_expense_types(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Value>, AppError> {
    require_permission(&state.pool, &auth_user, Permission::Expenses).await?;

    let expense_types = db::list_expense_types(&state.pool).await?;
    Ok(Json(json!({ "expense_types": expense_types })))
}

pub async fn create_expense_type(
    State(state): State<AppState>,
    auth_user: AuthUser,
    payload: Result<Json<ExpenseTypeRequest>, JsonRejection>,
) -> Result<Json<ExpenseType>, AppError> {
    require_permission(&state.pool, &auth_user, Permission::Expenses).await?;
    let Json(req) = payload?;
    req.validate()?;

    let expense_type = db::create_expense_type(&state.pool, &req).await?;
    audit(
        &state,
        &auth_user,
        AuditAction::Create,
        "expense_types",
        format!("Created expense type {}", expense_type.name),
    )
    .await;

    Ok(Json(expense_type))
}

pub async fn update_expense_type(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    payload: Result<Json<ExpenseTypeRequest>, JsonRejection>,
) -> Result<Json<ExpenseType>, AppError> {
    require_permission(&state.pool, &auth_user, Permission::Expenses).await?;
    let Json(req) = payload?;
    req.validate()?;

    let expense_type = db::update_expense_type(&state.pool, &id, &req)
        .await?
        .ok_or(AppError::NotFound)?;
    audit(
        &state,
        &auth_user,
        AuditAction::Update,
        "expense_types",
        format!("Updated expense type {}", expense_type.name),
    )
    .await;

    Ok(Json(expense_type))
}

pub async fn delete_expense_type(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    require_permission(&state.pool, &auth_user, Permission::Expenses).await?;

    if !db::delete_expense_type(&state.pool, &id).await? {
        return Err(AppError::NotFound);
    }
    audit(
        &state,
        &auth_user,
        AuditAction::Delete,
        "expense_types",
        format!("Deleted expense type {}", id),
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}
