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

const MODULE: &str = "experiences";

/// `GET /experiences?client_id=&search=`
pub async fn list_experiences(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(query): Query<ExperienceListQuery>,
) -> Result<Json<Value>, AppError> {
    require_permission(&state.pool, &auth_user, Permission::Experiences).await?;

    let experiences = db::list_experiences(&state.pool, &query).await?;
    Ok(Json(json!({ "experiences": experiences })))
}

pub async fn get_experience(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Experience>, AppError> {
    require_permission(&state.pool, &auth_user, Permission::Experiences).await?;

    let experience = db::get_experience(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(experience))
}

pub async fn create_experience(
    State(state): State<AppState>,
    auth_user: AuthUser,
    payload: Result<Json<ExperienceRequest>, JsonRejection>,
) -> Result<Json<Experience>, AppError> {
    require_permission(&state.pool, &auth_user, Permission::Experiences).await?;
    let Json(req) = payload?;
    req.validate()?;

    let experience = db::create_experience(&state.pool, &req).await?;
    audit(
        &state,
        &auth_user,
        AuditAction::Create,
        MODULE,
        format!("Created experience for {}", experience.client_name),
    )
    .await;

    Ok(Json(experience))
}

pub async fn update_experience(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    payload: Result<Json<ExperienceRequest>, JsonRejection>,
) -> Result<Json<Experience>, AppError> {
    require_permission(&state.pool, &auth_user, Permission::Experiences).await?;
    let Json(req) = payload?;
    req.validate()?;

    let experience = db::update_experience(&state.pool, &id, &req)
        .await?
        .ok_or(AppError::NotFound)?;
    audit(
        &state,
        &auth_user,
        AuditAction::Update,
        MODULE,
        format!("Updated experience for {}", experience.client_name),
    )
    .await;

    Ok(Json(experience))
}

pub async fn delete_experience(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    require_permission(&state.pool, &auth_user, Permission::Experiences).await?;

    if !db::delete_experience(&state.pool, &id).await? {
        return Err(AppError::NotFound);
    }
    audit(
        &state,
        &auth_user,
        AuditAction::Delete,
        MODULE,
        format!("Deleted experience {}", id),
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}
