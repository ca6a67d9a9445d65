//! # 감사 로그 쿼리 모듈
//!
//! 로그 기록(`record`)은 요청 처리의 부수 효과이므로 실패해도 에러를 돌려주지 않습니다.
//! 조회(`list_audit_logs`)는 필터와 페이지네이션을 지원합니다.

use crate::error::AppError;
use crate::models::*;
use sqlx::SqlitePool;

/// 감사 로그 한 줄을 남깁니다.
///
/// `user_name`은 기록 시점의 사용자 이름을 복사해 둡니다.
/// 사용자가 나중에 삭제되어도 로그에는 이름이 남습니다.
/// DB 오류는 `tracing::warn!`으로만 남기고 삼킵니다.
pub async fn record(pool: &SqlitePool, entry: NewAuditLog<'_>) {
    let result = sqlx::query(
        r#"
        INSERT INTO audit_logs (id, user_id, user_name, action, module, description, level)
        VALUES (?1, ?2, (SELECT name FROM users WHERE id = ?2), ?3, ?4, ?5, ?6)
        "#,
    )
    .bind(uuid::Uuid::now_v7().to_string())
    .bind(entry.user_id)
    .bind(entry.action)
    .bind(entry.module)
    .bind(&entry.description)
    .bind(entry.level)
    .execute(pool)
    .await;

    if let Err(e) = result {
        tracing::warn!(
            module = entry.module,
            action = ?entry.action,
            "Failed to write audit log: {}",
            e
        );
    }
}

/// 필터에 맞는 감사 로그를 최신순으로 한 페이지 조회합니다.
///
/// 페이지 번호는 1부터 시작하며, 1보다 작으면 1로 취급합니다.
/// `from`/`to`는 `created_at` 문자열과 비교하므로 "YYYY-MM-DD"를 주면
/// `to`가 그날 하루 전체를 포함하도록 `substr`로 날짜 부분만 비교합니다.
pub async fn list_audit_logs(
    pool: &SqlitePool,
    query: &AuditLogQuery,
) -> Result<AuditLogPage, AppError> {
    let user = query
        .user
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase);
    let module = query.module.as_deref().filter(|s| !s.is_empty());
    let from = query.from.as_deref().filter(|s| !s.is_empty());
    let to = query.to.as_deref().filter(|s| !s.is_empty());

    const FILTER: &str = r#"
        WHERE (?1 IS NULL OR lower(coalesce(user_name, '')) LIKE '%' || ?1 || '%')
          AND (?2 IS NULL OR action = ?2)
          AND (?3 IS NULL OR module = ?3)
          AND (?4 IS NULL OR level = ?4)
          AND (?5 IS NULL OR substr(created_at, 1, length(?5)) >= ?5)
          AND (?6 IS NULL OR substr(created_at, 1, length(?6)) <= ?6)
    "#;

    let total = sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM audit_logs {FILTER}"))
        .bind(user.as_deref())
        .bind(query.action)
        .bind(module)
        .bind(query.level)
        .bind(from)
        .bind(to)
        .fetch_one(pool)
        .await?;

    // 마지막 페이지를 넘는 요청은 마지막 페이지로 맞춥니다. OFFSET이 전체 행 수를 넘지 않습니다.
    let total_pages = ((total + AUDIT_PAGE_SIZE - 1) / AUDIT_PAGE_SIZE).max(1);
    let page = query.page.unwrap_or(1).clamp(1, total_pages);

    let sql = format!(
        r#"
        SELECT id, user_id, user_name, action, module, description, level, created_at
        FROM audit_logs
        {FILTER}
        ORDER BY created_at DESC, id DESC
        LIMIT ?7 OFFSET ?8
        "#
    );

    let logs = sqlx::query_as::<_, AuditLog>(&sql)
        .bind(user.as_deref())
        .bind(query.action)
        .bind(module)
        .bind(query.level)
        .bind(from)
        .bind(to)
        .bind(AUDIT_PAGE_SIZE)
        .bind((page - 1) * AUDIT_PAGE_SIZE)
        .fetch_all(pool)
        .await?;

    Ok(AuditLogPage {
        logs,
        page,
        total_pages,
        total,
    })
}
