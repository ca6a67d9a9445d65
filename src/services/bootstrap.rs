//! 첫 실행 시 관리자 계정 생성
//!
//! 사용자가 한 명도 없을 때만 동작합니다. 이미 사용자가 있으면 아무것도 하지 않으므로
//! 서버를 재시작할 때마다 호출해도 안전합니다.

use sqlx::SqlitePool;

use crate::{
    config::AdminBootstrap,
    db,
    error::AppError,
    models::{CreateUserRequest, UserGroupRequest},
    services::password::hash_password,
};

/// 사용자가 없으면 "Administrator" 그룹과 관리자 계정을 만듭니다.
///
/// ## 반환값
/// - `Ok(true)`: 새로 만들었음
/// - `Ok(false)`: 이미 사용자가 있어 건너뜀
pub async fn ensure_admin(pool: &SqlitePool, admin: &AdminBootstrap) -> Result<bool, AppError> {
    if db::users::count_users(pool).await? > 0 {
        return Ok(false);
    }

    let request = CreateUserRequest {
        name: "Administrator".to_string(),
        login: admin.login.clone(),
        email: admin.email.clone(),
        mobile: None,
        group_id: None,
        password: admin.password.clone(),
    };
    request.validate()?;

    let group_request = UserGroupRequest::administrator();
    let groups = db::list_groups(pool).await?;
    // 같은 이름의 그룹이 남아 있으면 새로 만들지 않고 재사용합니다.
    let group = match groups.into_iter().find(|g| g.name == group_request.name) {
        Some(group) => group,
        None => db::create_group(pool, &group_request).await?,
    };

    let password_hash = hash_password(&request.password)?;
    let user = db::users::create_user(
        pool,
        &CreateUserRequest {
            group_id: Some(group.id),
            ..request
        },
        &password_hash,
    )
    .await?;

    tracing::info!(login = %user.login, "Created initial administrator account");
    Ok(true)
}
