//! # 상담 일정 데이터베이스 쿼리 모듈
//!
//! `appointments` 테이블의 CRUD와 기간 조회, 그리고
//! 월간 일정 생성 결과를 한 트랜잭션으로 저장하는 함수를 제공합니다.
//!
//! 조회 결과에는 항상 `clients.name`을 JOIN한 `client_name`이 포함됩니다.

use crate::error::AppError;
use crate::models::*;
use chrono::NaiveDate;
use sqlx::SqlitePool;
use std::collections::HashMap;

const APPOINTMENT_SELECT: &str = r#"
    SELECT a.id, a.client_id, c.name AS client_name, a.date, a.time, a.duration,
           a.kind, a.status, a.notes, a.fee, a.confirmed, a.created_by,
           a.created_at, a.updated_at
    FROM appointments a
    JOIN clients c ON c.id = a.client_id
"#;

/// 필터에 맞는 상담 목록을 (날짜, 시각) 순으로 조회합니다.
pub async fn list_appointments(
    pool: &SqlitePool,
    query: &AppointmentListQuery,
) -> Result<Vec<Appointment>, AppError> {
    let sql = format!(
        r#"{APPOINTMENT_SELECT}
        WHERE (?1 IS NULL OR a.date = ?1)
          AND (?2 IS NULL OR a.client_id = ?2)
          AND (?3 IS NULL OR a.status = ?3)
        ORDER BY a.date, a.time, c.name
        "#
    );

    let appointments = sqlx::query_as::<_, Appointment>(&sql)
        .bind(query.date.as_deref())
        .bind(query.client_id.as_deref())
        .bind(query.status)
        .fetch_all(pool)
        .await?;

    Ok(appointments)
}

/// `start` ~ `end` (양 끝 포함) 기간의 상담을 조회합니다.
///
/// 날짜를 "YYYY-MM-DD" 문자열로 저장하므로 문자열 비교가 곧 날짜 비교입니다.
pub async fn list_appointments_between(
    pool: &SqlitePool,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<Appointment>, AppError> {
    let sql = format!(
        r#"{APPOINTMENT_SELECT}
        WHERE a.date BETWEEN ? AND ?
        ORDER BY a.date, a.time, c.name
        "#
    );

    let appointments = sqlx::query_as::<_, Appointment>(&sql)
        .bind(start.format("%Y-%m-%d").to_string())
        .bind(end.format("%Y-%m-%d").to_string())
        .fetch_all(pool)
        .await?;

    Ok(appointments)
}

pub async fn get_appointment(pool: &SqlitePool, id: &str) -> Result<Option<Appointment>, AppError> {
    let sql = format!("{APPOINTMENT_SELECT} WHERE a.id = ?");
    let appointment = sqlx::query_as::<_, Appointment>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(appointment)
}

/// 상담 대상 내담자가 존재하는지 확인합니다.
async fn ensure_client(pool: &SqlitePool, client_id: &str) -> Result<(), AppError> {
    let exists = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM clients WHERE id = ?")
        .bind(client_id)
        .fetch_one(pool)
        .await?;
    if exists == 0 {
        return Err(AppError::BadRequest(format!("Unknown client: {}", client_id)));
    }
    Ok(())
}

/// 새 상담을 저장합니다. `created_by`에는 요청한 사용자 ID를 남깁니다.
pub async fn create_appointment(
    pool: &SqlitePool,
    req: &AppointmentRequest,
    created_by: &str,
) -> Result<Appointment, AppError> {
    ensure_client(pool, &req.client_id).await?;

    let id = uuid::Uuid::now_v7().to_string();

    sqlx::query(
        r#"
        INSERT INTO appointments
            (id, client_id, date, time, duration, kind, status, notes, fee, confirmed, created_by)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&req.client_id)
    .bind(&req.date)
    .bind(&req.time)
    .bind(req.duration)
    .bind(req.kind)
    .bind(req.status)
    .bind(&req.notes)
    .bind(req.fee)
    .bind(req.confirmed)
    .bind(created_by)
    .execute(pool)
    .await?;

    get_appointment(pool, &id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created appointment".to_string()))
}

pub async fn update_appointment(
    pool: &SqlitePool,
    id: &str,
    req: &AppointmentRequest,
) -> Result<Option<Appointment>, AppError> {
    ensure_client(pool, &req.client_id).await?;

    let result = sqlx::query(
        r#"
        UPDATE appointments SET
            client_id = ?, date = ?, time = ?, duration = ?, kind = ?, status = ?,
            notes = ?, fee = ?, confirmed = ?,
            updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ?
        "#,
    )
    .bind(&req.client_id)
    .bind(&req.date)
    .bind(&req.time)
    .bind(req.duration)
    .bind(req.kind)
    .bind(req.status)
    .bind(&req.notes)
    .bind(req.fee)
    .bind(req.confirmed)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }

    get_appointment(pool, id).await
}

/// 상담 상태만 변경합니다 (`PATCH /appointments/{id}/status`).
///
/// `confirmed` 상태로 바꾸면 확인 여부 플래그도 함께 켭니다.
pub async fn update_appointment_status(
    pool: &SqlitePool,
    id: &str,
    status: AppointmentStatus,
) -> Result<Option<Appointment>, AppError> {
    let result = sqlx::query(
        r#"
        UPDATE appointments
        SET status = ?1,
            confirmed = CASE WHEN ?1 = 'confirmed' THEN 1 ELSE confirmed END,
            updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ?2
        "#,
    )
    .bind(status)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }

    get_appointment(pool, id).await
}

pub async fn delete_appointment(pool: &SqlitePool, id: &str) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM appointments WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// 월간 일정 생성 결과를 저장합니다.
///
/// 같은 내담자·날짜·시각의 상담이 이미 있으면 건너뛰므로
/// 같은 달을 여러 번 생성해도 중복이 생기지 않습니다.
/// 전체를 하나의 트랜잭션으로 처리해 중간에 실패하면 아무것도 저장되지 않습니다.
///
/// ## 반환값
/// `(새로 저장한 수, 이미 있어서 건너뛴 수)`
pub async fn insert_generated_appointments(
    pool: &SqlitePool,
    instances: &[AppointmentInstance],
    fees: &HashMap<String, Option<f64>>,
    created_by: &str,
) -> Result<(usize, usize), AppError> {
    let mut tx = pool.begin().await?;
    let mut created = 0;
    let mut skipped_existing = 0;

    for instance in instances {
        let date = instance.date.format("%Y-%m-%d").to_string();

        let existing = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM appointments WHERE client_id = ? AND date = ? AND time = ?",
        )
        .bind(&instance.client_id)
        .bind(&date)
        .bind(&instance.time)
        .fetch_one(&mut *tx)
        .await?;

        if existing > 0 {
            skipped_existing += 1;
            continue;
        }

        let fee = fees.get(&instance.client_id).copied().flatten();

        sqlx::query(
            r#"
            INSERT INTO appointments
                (id, client_id, date, time, duration, kind, status, fee, confirmed, created_by)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, 0, ?)
            "#,
        )
        .bind(uuid::Uuid::now_v7().to_string())
        .bind(&instance.client_id)
        .bind(&date)
        .bind(&instance.time)
        .bind(instance.duration_minutes)
        .bind(AppointmentKind::Consultation)
        .bind(instance.status)
        .bind(fee)
        .bind(created_by)
        .execute(&mut *tx)
        .await?;

        created += 1;
    }

    tx.commit().await?;
    Ok((created, skipped_existing))
}
