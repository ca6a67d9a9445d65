//! # 내담자(Client) 모델
//!
//! 내담자 기본 정보, 연락처, 초기 면담 내용, 그리고 주간 고정 상담 시간을 담습니다.
//! 주간 고정 상담 시간(`session_weekday` + `session_time`)이 일정 생성기의 반복 규칙이 됩니다.
//!
//! ## 구조체 역할
//! - `ClientType`: 내담자 유형 (예: "Particular", "Convênio")
//! - `Client`: DB의 `clients` 테이블 한 행
//! - `ClientRequest`: 생성(POST)과 전체 수정(PUT)에 함께 쓰는 요청 본문
//! - `ClientListQuery`: 목록 조회 필터 (쿼리 문자열)

use serde::{Deserialize, Serialize};

use super::schedule::DayOfWeek;
use crate::error::AppError;
use crate::services::schedule::parse_time_of_day;

/// 기본 상담 시간(분)
pub const DEFAULT_SESSION_MINUTES: i64 = 50;

/// 내담자 유형: `client_types` 테이블 한 행
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ClientType {
    pub id: String,
    pub name: String,
}

/// 내담자 유형 생성/수정 요청
#[derive(Debug, Deserialize)]
pub struct ClientTypeRequest {
    pub name: String,
}

impl ClientTypeRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::BadRequest("Client type name is required".to_string()));
        }
        Ok(())
    }
}

/// 내담자 엔티티: DB의 `clients` 테이블 한 행에 대응합니다.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Client {
    pub id: String,
    pub name: String,
    pub client_type_id: Option<String>,
    pub gender: Option<String>,
    pub marital_status: Option<String>,
    pub education: Option<String>,
    pub approach: Option<String>,
    pub age: Option<i64>,
    pub occupation: Option<String>,
    pub postal_code: Option<String>,
    pub street: Option<String>,
    pub street_number: Option<String>,
    pub complement: Option<String>,
    pub district: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub landline: Option<String>,
    pub mobile: Option<String>,
    pub email: Option<String>,
    pub emergency_contact: Option<String>,
    pub emergency_phone: Option<String>,
    pub lives_with: Option<String>,
    pub chief_complaint: Option<String>,
    pub clinical_notes: Option<String>,
    /// 주간 고정 상담 요일 (영어 전체 이름으로 저장)
    pub session_weekday: Option<String>,
    /// 주간 고정 상담 시각 ("HH:MM")
    pub session_time: Option<String>,
    pub session_duration: i64,
    pub session_fee: Option<f64>,
    pub active: bool,
    pub created_at: String,
    pub updated_at: String,
}

fn default_session_duration() -> i64 {
    DEFAULT_SESSION_MINUTES
}

fn default_true() -> bool {
    true
}

/// 내담자 생성(`POST /clients`) 및 수정(`PUT /clients/{id}`) 요청 본문
///
/// 이름만 필수이고 나머지는 모두 선택입니다.
/// 주간 고정 상담 시간은 요일과 시각을 둘 다 보내거나 둘 다 생략해야 합니다.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ClientRequest {
    pub name: String,
    pub client_type_id: Option<String>,
    pub gender: Option<String>,
    pub marital_status: Option<String>,
    pub education: Option<String>,
    pub approach: Option<String>,
    pub age: Option<i64>,
    pub occupation: Option<String>,
    pub postal_code: Option<String>,
    pub street: Option<String>,
    pub street_number: Option<String>,
    pub complement: Option<String>,
    pub district: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub landline: Option<String>,
    pub mobile: Option<String>,
    pub email: Option<String>,
    pub emergency_contact: Option<String>,
    pub emergency_phone: Option<String>,
    pub lives_with: Option<String>,
    pub chief_complaint: Option<String>,
    pub clinical_notes: Option<String>,
    pub session_weekday: Option<String>,
    pub session_time: Option<String>,
    #[serde(default = "default_session_duration")]
    pub session_duration: i64,
    pub session_fee: Option<f64>,
    #[serde(default = "default_true")]
    pub active: bool,
}

impl ClientRequest {
    /// 요청을 검증하고 저장 가능한 형태로 정규화합니다.
    ///
    /// - 이름 앞뒤 공백 제거, 빈 이름 거부
    /// - 요일은 `"Monday"` 같은 영어 이름으로, 시각은 `"HH:MM"`으로 변환
    /// - 빈 문자열로 온 요일/시각은 "없음"으로 취급
    pub fn validated(mut self) -> Result<Self, AppError> {
        self.name = self.name.trim().to_string();
        if self.name.is_empty() {
            return Err(AppError::BadRequest("Client name is required".to_string()));
        }

        if let Some(age) = self.age {
            if !(0..=150).contains(&age) {
                return Err(AppError::BadRequest("Age must be between 0 and 150".to_string()));
            }
        }

        if let Some(email) = self.email.as_deref() {
            if !email.is_empty() && !email.contains('@') {
                return Err(AppError::BadRequest("Invalid email address".to_string()));
            }
        }

        if self.session_duration <= 0 {
            return Err(AppError::BadRequest(
                "Session duration must be a positive number of minutes".to_string(),
            ));
        }

        if let Some(fee) = self.session_fee {
            if fee < 0.0 {
                return Err(AppError::BadRequest("Session fee cannot be negative".to_string()));
            }
        }

        // .filter(): 빈 문자열은 None으로 바꿔서 "값 없음"과 동일하게 처리합니다.
        let weekday = self.session_weekday.take().filter(|w| !w.trim().is_empty());
        let time = self.session_time.take().filter(|t| !t.trim().is_empty());

        match (weekday, time) {
            (Some(weekday), Some(time)) => {
                let day = DayOfWeek::parse(&weekday).ok_or_else(|| {
                    AppError::BadRequest(format!("Unknown session weekday: {}", weekday))
                })?;
                let parsed = parse_time_of_day(&time).ok_or_else(|| {
                    AppError::BadRequest(format!("Invalid session time: {}", time))
                })?;
                self.session_weekday = Some(day.name().to_string());
                self.session_time = Some(parsed.format("%H:%M").to_string());
            }
            (None, None) => {}
            _ => {
                return Err(AppError::BadRequest(
                    "Session weekday and time must be provided together".to_string(),
                ));
            }
        }

        Ok(self)
    }
}

/// `GET /clients` 쿼리 문자열
///
/// 예: `/clients?search=maria&active=true`
#[derive(Debug, Default, Deserialize)]
pub struct ClientListQuery {
    /// 이름/이메일/휴대폰 부분 일치 (대소문자 무시)
    pub search: Option<String>,
    pub active: Option<bool>,
    pub client_type_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: &str) -> ClientRequest {
        ClientRequest {
            name: name.to_string(),
            session_duration: DEFAULT_SESSION_MINUTES,
            active: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_name_is_required() {
        assert!(matches!(request("   ").validated(), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_session_slot_is_normalised() {
        let mut req = request(" Ana Silva ");
        req.session_weekday = Some("segunda-feira".to_string());
        req.session_time = Some("9:00".to_string());

        let valid = req.validated().unwrap();
        assert_eq!(valid.name, "Ana Silva");
        assert_eq!(valid.session_weekday.as_deref(), Some("Monday"));
        assert_eq!(valid.session_time.as_deref(), Some("09:00"));
    }

    #[test]
    fn test_session_slot_requires_both_parts() {
        let mut req = request("Ana");
        req.session_weekday = Some("Monday".to_string());
        assert!(matches!(req.validated(), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_unknown_weekday_is_rejected() {
        let mut req = request("Ana");
        req.session_weekday = Some("Someday".to_string());
        req.session_time = Some("09:00".to_string());
        assert!(matches!(req.validated(), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_empty_slot_strings_mean_no_slot() {
        let mut req = request("Ana");
        req.session_weekday = Some(String::new());
        req.session_time = Some(" ".to_string());
        let valid = req.validated().unwrap();
        assert!(valid.session_weekday.is_none());
        assert!(valid.session_time.is_none());
    }

    #[test]
    fn test_non_positive_duration_is_rejected() {
        let mut req = request("Ana");
        req.session_duration = 0;
        assert!(matches!(req.validated(), Err(AppError::BadRequest(_))));
    }
}
