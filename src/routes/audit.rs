use crate::{
    db,
    error::AppError,
    middleware::auth::{require_permission, AuthUser},
    models::*,
    routes::AppState,
};
use axum::{
    extract::{Query, State},
    Json,
};

/// `GET /logs?user=&action=&module=&level=&from=&to=&page=`
///
/// 한 페이지에 10개씩, 최신순입니다. 그룹의 `admin` 권한이 필요합니다.
pub async fn list_logs(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(query): Query<AuditLogQuery>,
) -> Result<Json<AuditLogPage>, AppError> {
    require_permission(&state.pool, &auth_user, Permission::Admin).await?;

    let page = db::list_audit_logs(&state.pool, &query).await?;
    Ok(Json(page))
}
