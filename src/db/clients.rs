//! # 내담자 및 내담자 유형 데이터베이스 쿼리 모듈
//!
//! `clients`, `client_types` 테이블에 대한 CRUD 쿼리와
//! 일정 생성기에 넘길 반복 규칙 조회를 담당합니다.
//!
//! 모든 함수는 `&SqlitePool`을 빌려 쓰고, 조회 결과는 새로 만든 값(owned)으로 돌려줍니다.

use crate::error::{conflict_on_unique, AppError};
use crate::models::*;
use sqlx::SqlitePool;
use std::collections::HashMap;

const CLIENT_COLUMNS: &str = r#"
    id, name, client_type_id, gender, marital_status, education, approach, age,
    occupation, postal_code, street, street_number, complement, district, city, state,
    landline, mobile, email, emergency_contact, emergency_phone, lives_with,
    chief_complaint, clinical_notes, session_weekday, session_time, session_duration,
    session_fee, active, created_at, updated_at
"#;

/// 필터 조건에 맞는 내담자 목록을 이름순으로 조회합니다.
///
/// 필터가 None이면 해당 조건은 무시됩니다.
/// SQL의 `(?1 IS NULL OR ...)` 패턴으로 하나의 정적 쿼리에서 선택적 필터를 처리합니다.
/// `?1`, `?2`처럼 번호를 붙인 플레이스홀더는 같은 값을 여러 번 참조할 수 있습니다.
pub async fn list_clients(
    pool: &SqlitePool,
    query: &ClientListQuery,
) -> Result<Vec<Client>, AppError> {
    let search = query
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase);

    let sql = format!(
        r#"
        SELECT {CLIENT_COLUMNS}
        FROM clients
        WHERE (?1 IS NULL
               OR lower(name) LIKE '%' || ?1 || '%'
               OR lower(coalesce(email, '')) LIKE '%' || ?1 || '%'
               OR coalesce(mobile, '') LIKE '%' || ?1 || '%')
          AND (?2 IS NULL OR active = ?2)
          AND (?3 IS NULL OR client_type_id = ?3)
        ORDER BY name COLLATE NOCASE
        "#
    );

    let clients = sqlx::query_as::<_, Client>(&sql)
        .bind(search)
        .bind(query.active)
        .bind(query.client_type_id.as_deref())
        .fetch_all(pool)
        .await?;

    Ok(clients)
}

/// ID로 내담자 한 명을 조회합니다. 없으면 `Ok(None)`.
pub async fn get_client(pool: &SqlitePool, id: &str) -> Result<Option<Client>, AppError> {
    let sql = format!("SELECT {CLIENT_COLUMNS} FROM clients WHERE id = ?");
    let client = sqlx::query_as::<_, Client>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(client)
}

/// 내담자 유형 ID가 실제로 존재하는지 확인합니다.
async fn ensure_client_type(pool: &SqlitePool, client_type_id: Option<&str>) -> Result<(), AppError> {
    if let Some(type_id) = client_type_id {
        if get_client_type(pool, type_id).await?.is_none() {
            return Err(AppError::BadRequest(format!("Unknown client type: {}", type_id)));
        }
    }
    Ok(())
}

/// 새 내담자를 저장하고 저장된 행을 반환합니다.
///
/// `req`는 호출 전에 `ClientRequest::validated()`를 거친 값이어야 합니다.
pub async fn create_client(pool: &SqlitePool, req: &ClientRequest) -> Result<Client, AppError> {
    ensure_client_type(pool, req.client_type_id.as_deref()).await?;

    let id = uuid::Uuid::now_v7().to_string();

    sqlx::query(
        r#"
        INSERT INTO clients (
            id, name, client_type_id, gender, marital_status, education, approach, age,
            occupation, postal_code, street, street_number, complement, district, city, state,
            landline, mobile, email, emergency_contact, emergency_phone, lives_with,
            chief_complaint, clinical_notes, session_weekday, session_time, session_duration,
            session_fee, active
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&req.name)
    .bind(&req.client_type_id)
    .bind(&req.gender)
    .bind(&req.marital_status)
    .bind(&req.education)
    .bind(&req.approach)
    .bind(req.age)
    .bind(&req.occupation)
    .bind(&req.postal_code)
    .bind(&req.street)
    .bind(&req.street_number)
    .bind(&req.complement)
    .bind(&req.district)
    .bind(&req.city)
    .bind(&req.state)
    .bind(&req.landline)
    .bind(&req.mobile)
    .bind(&req.email)
    .bind(&req.emergency_contact)
    .bind(&req.emergency_phone)
    .bind(&req.lives_with)
    .bind(&req.chief_complaint)
    .bind(&req.clinical_notes)
    .bind(&req.session_weekday)
    .bind(&req.session_time)
    .bind(req.session_duration)
    .bind(req.session_fee)
    .bind(req.active)
    .execute(pool)
    .await?;

    get_client(pool, &id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created client".to_string()))
}

/// 내담자 정보를 전체 교체(PUT)합니다.
///
/// ## 반환값
/// - `Ok(Some(Client))`: 수정 성공
/// - `Ok(None)`: 해당 ID의 내담자가 없음
pub async fn update_client(
    pool: &SqlitePool,
    id: &str,
    req: &ClientRequest,
) -> Result<Option<Client>, AppError> {
    ensure_client_type(pool, req.client_type_id.as_deref()).await?;

    let result = sqlx::query(
        r#"
        UPDATE clients SET
            name = ?, client_type_id = ?, gender = ?, marital_status = ?, education = ?,
            approach = ?, age = ?, occupation = ?, postal_code = ?, street = ?,
            street_number = ?, complement = ?, district = ?, city = ?, state = ?,
            landline = ?, mobile = ?, email = ?, emergency_contact = ?, emergency_phone = ?,
            lives_with = ?, chief_complaint = ?, clinical_notes = ?, session_weekday = ?,
            session_time = ?, session_duration = ?, session_fee = ?, active = ?,
            updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ?
        "#,
    )
    .bind(&req.name)
    .bind(&req.client_type_id)
    .bind(&req.gender)
    .bind(&req.marital_status)
    .bind(&req.education)
    .bind(&req.approach)
    .bind(req.age)
    .bind(&req.occupation)
    .bind(&req.postal_code)
    .bind(&req.street)
    .bind(&req.street_number)
    .bind(&req.complement)
    .bind(&req.district)
    .bind(&req.city)
    .bind(&req.state)
    .bind(&req.landline)
    .bind(&req.mobile)
    .bind(&req.email)
    .bind(&req.emergency_contact)
    .bind(&req.emergency_phone)
    .bind(&req.lives_with)
    .bind(&req.chief_complaint)
    .bind(&req.clinical_notes)
    .bind(&req.session_weekday)
    .bind(&req.session_time)
    .bind(req.session_duration)
    .bind(req.session_fee)
    .bind(req.active)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }

    get_client(pool, id).await
}

/// 내담자를 삭제합니다.
///
/// 스키마의 `ON DELETE CASCADE`로 상담 일정, 경과 기록, 경험 기록도 함께 삭제됩니다.
pub async fn delete_client(pool: &SqlitePool, id: &str) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM clients WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// 일정 생성기에 넘길 반복 규칙 목록을 조회합니다.
///
/// 주간 고정 시간(요일 + 시각)이 설정된 내담자만 포함하며,
/// 비활성 내담자도 `active = false` 규칙으로 함께 넘겨 생성기가 걸러내도록 합니다.
/// 정렬은 이름순이라 같은 시각의 상담도 매번 같은 순서로 나옵니다.
pub async fn list_recurrence_rules(pool: &SqlitePool) -> Result<Vec<RecurrenceRule>, AppError> {
    let rules = sqlx::query_as::<_, RecurrenceRule>(
        r#"
        SELECT id AS client_id,
               name AS client_name,
               session_weekday AS weekday,
               session_time AS time_of_day,
               session_duration AS duration_minutes,
               active
        FROM clients
        WHERE session_weekday IS NOT NULL AND session_time IS NOT NULL
        ORDER BY name COLLATE NOCASE, id
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rules)
}

/// 내담자별 상담료 (일정 생성 결과를 저장할 때 상담 기본 금액으로 사용)
pub async fn list_session_fees(pool: &SqlitePool) -> Result<HashMap<String, Option<f64>>, AppError> {
    let rows = sqlx::query_as::<_, (String, Option<f64>)>("SELECT id, session_fee FROM clients")
        .fetch_all(pool)
        .await?;

    Ok(rows.into_iter().collect())
}

// ── 내담자 유형 ──

pub async fn list_client_types(pool: &SqlitePool) -> Result<Vec<ClientType>, AppError> {
    let types = sqlx::query_as::<_, ClientType>(
        "SELECT id, name FROM client_types ORDER BY name COLLATE NOCASE",
    )
    .fetch_all(pool)
    .await?;

    Ok(types)
}

pub async fn get_client_type(pool: &SqlitePool, id: &str) -> Result<Option<ClientType>, AppError> {
    let client_type = sqlx::query_as::<_, ClientType>("SELECT id, name FROM client_types WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(client_type)
}

pub async fn create_client_type(
    pool: &SqlitePool,
    req: &ClientTypeRequest,
) -> Result<ClientType, AppError> {
    let id = uuid::Uuid::now_v7().to_string();

    sqlx::query("INSERT INTO client_types (id, name) VALUES (?, ?)")
        .bind(&id)
        .bind(req.name.trim())
        .execute(pool)
        .await
        .map_err(|e| conflict_on_unique(e, "Client type already exists"))?;

    get_client_type(pool, &id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created client type".to_string()))
}

pub async fn update_client_type(
    pool: &SqlitePool,
    id: &str,
    req: &ClientTypeRequest,
) -> Result<Option<ClientType>, AppError> {
    let result = sqlx::query("UPDATE client_types SET name = ? WHERE id = ?")
        .bind(req.name.trim())
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| conflict_on_unique(e, "Client type already exists"))?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }

    get_client_type(pool, id).await
}

/// 내담자 유형을 삭제합니다. 이 유형을 쓰던 내담자는 `client_type_id`가 NULL이 됩니다.
pub async fn delete_client_type(pool: &SqlitePool, id: &str) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM client_types WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
