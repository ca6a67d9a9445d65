use crate::error::AppError;
use crate::models::*;
use chrono::NaiveDate;
use sqlx::SqlitePool;

/// `today`가 속한 날/달 기준으로 대시보드 집계를 계산합니다.
///
/// 기준일을 인자로 받아 테스트에서 날짜를 고정할 수 있습니다.
pub async fn dashboard_stats(pool: &SqlitePool, today: NaiveDate) -> Result<DashboardStats, AppError> {
    let day = today.format("%Y-%m-%d").to_string();
    let month = today.format("%Y-%m").to_string();

    let active_clients =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM clients WHERE active = 1")
            .fetch_one(pool)
            .await?;

    let appointments_today = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM appointments WHERE date = ? AND status != 'cancelled'",
    )
    .bind(&day)
    .fetch_one(pool)
    .await?;

    let progress_notes_this_month = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM progress_notes WHERE substr(date, 1, 7) = ?",
    )
    .bind(&month)
    .fetch_one(pool)
    .await?;

    // SUM은 행이 없으면 NULL이므로 coalesce로 0.0을 돌려받습니다.
    let revenue_this_month = sqlx::query_scalar::<_, f64>(
        r#"
        SELECT coalesce(SUM(fee), 0.0) FROM appointments
        WHERE substr(date, 1, 7) = ? AND status = 'completed'
        "#,
    )
    .bind(&month)
    .fetch_one(pool)
    .await?;

    let expenses_this_month = sqlx::query_scalar::<_, f64>(
        "SELECT coalesce(SUM(amount), 0.0) FROM expenses WHERE substr(date, 1, 7) = ?",
    )
    .bind(&month)
    .fetch_one(pool)
    .await?;

    Ok(DashboardStats {
        active_clients,
        appointments_today,
        progress_notes_this_month,
        revenue_this_month: Some(revenue_this_month),
        expenses_this_month: Some(expenses_this_month),
    })
}
