//! # 상담 일정(Appointment) 모델
//!
//! 실제로 저장되는 상담 예약입니다. 화면에서 직접 입력하거나
//! 월간 일정 생성기 결과를 `POST /appointments/generate`로 저장해서 만들어집니다.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::client::DEFAULT_SESSION_MINUTES;
use crate::error::AppError;
use crate::services::schedule::parse_time_of_day;

/// 상담 상태
///
/// DB에는 snake_case 문자열(`"scheduled"`, `"no_show"` 등)로 저장됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum AppointmentStatus {
    /// 생성 직후의 기본 상태
    #[default]
    Scheduled,
    Confirmed,
    Completed,
    Cancelled,
    NoShow,
}

/// 상담 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum AppointmentKind {
    #[default]
    Consultation,
    FollowUp,
    Assessment,
    CouplesTherapy,
    FamilyTherapy,
}

/// 상담 엔티티: `appointments` 테이블에 내담자 이름을 JOIN한 결과
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Appointment {
    pub id: String,
    pub client_id: String,
    pub client_name: String,
    /// "YYYY-MM-DD"
    pub date: String,
    /// "HH:MM"
    pub time: String,
    pub duration: i64,
    pub kind: AppointmentKind,
    pub status: AppointmentStatus,
    pub notes: Option<String>,
    pub fee: Option<f64>,
    pub confirmed: bool,
    pub created_by: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

fn default_duration() -> i64 {
    DEFAULT_SESSION_MINUTES
}

/// 상담 생성(`POST`) 및 수정(`PUT`) 요청 본문
#[derive(Debug, Clone, Deserialize)]
pub struct AppointmentRequest {
    pub client_id: String,
    pub date: String,
    pub time: String,
    #[serde(default = "default_duration")]
    pub duration: i64,
    #[serde(default)]
    pub kind: AppointmentKind,
    #[serde(default)]
    pub status: AppointmentStatus,
    pub notes: Option<String>,
    pub fee: Option<f64>,
    #[serde(default)]
    pub confirmed: bool,
}

impl AppointmentRequest {
    /// 날짜와 시각 형식을 검증하고 `"YYYY-MM-DD"`, `"HH:MM"`으로 정규화합니다.
    pub fn validated(mut self) -> Result<Self, AppError> {
        if self.client_id.trim().is_empty() {
            return Err(AppError::BadRequest("client_id is required".to_string()));
        }
        self.date = parse_date(&self.date)?.format("%Y-%m-%d").to_string();
        self.time = parse_time_of_day(&self.time)
            .ok_or_else(|| AppError::BadRequest(format!("Invalid time: {}", self.time)))?
            .format("%H:%M")
            .to_string();
        if self.duration <= 0 {
            return Err(AppError::BadRequest(
                "Duration must be a positive number of minutes".to_string(),
            ));
        }
        if matches!(self.fee, Some(fee) if fee < 0.0) {
            return Err(AppError::BadRequest("Fee cannot be negative".to_string()));
        }
        Ok(self)
    }
}

/// `PATCH /appointments/{id}/status` 요청 본문
#[derive(Debug, Deserialize)]
pub struct UpdateAppointmentStatusRequest {
    pub status: AppointmentStatus,
}

/// `GET /appointments` 쿼리 문자열
#[derive(Debug, Default, Deserialize)]
pub struct AppointmentListQuery {
    pub date: Option<String>,
    pub client_id: Option<String>,
    pub status: Option<AppointmentStatus>,
}

/// `GET /appointments/period?start=...&end=...` 쿼리 문자열 (양 끝 포함)
#[derive(Debug, Deserialize)]
pub struct PeriodQuery {
    pub start: String,
    pub end: String,
}

impl PeriodQuery {
    pub fn validated(&self) -> Result<(NaiveDate, NaiveDate), AppError> {
        let start = parse_date(&self.start)?;
        let end = parse_date(&self.end)?;
        if end < start {
            return Err(AppError::BadRequest("end must not be before start".to_string()));
        }
        Ok((start, end))
    }
}

/// "YYYY-MM-DD" 날짜를 해석합니다. 실패하면 400 에러.
pub fn parse_date(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::BadRequest(format!("Invalid date (expected YYYY-MM-DD): {}", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(date: &str, time: &str) -> AppointmentRequest {
        AppointmentRequest {
            client_id: "c1".to_string(),
            date: date.to_string(),
            time: time.to_string(),
            duration: 50,
            kind: AppointmentKind::default(),
            status: AppointmentStatus::default(),
            notes: None,
            fee: None,
            confirmed: false,
        }
    }

    #[test]
    fn test_valid_request_is_normalised() {
        let valid = request("2024-01-08", "9:30").validated().unwrap();
        assert_eq!(valid.date, "2024-01-08");
        assert_eq!(valid.time, "09:30");
        assert_eq!(valid.status, AppointmentStatus::Scheduled);
    }

    #[test]
    fn test_bad_date_and_time_are_rejected() {
        assert!(request("08/01/2024", "09:00").validated().is_err());
        assert!(request("2023-02-29", "09:00").validated().is_err());
        assert!(request("2024-01-08", "nine").validated().is_err());
    }

    #[test]
    fn test_status_serialises_as_snake_case() {
        let json = serde_json::to_string(&AppointmentStatus::NoShow).unwrap();
        assert_eq!(json, "\"no_show\"");
        let parsed: AppointmentStatus = serde_json::from_str("\"completed\"").unwrap();
        assert_eq!(parsed, AppointmentStatus::Completed);
    }

    #[test]
    fn test_period_end_before_start_is_rejected() {
        let query = PeriodQuery {
            start: "2024-02-01".to_string(),
            end: "2024-01-31".to_string(),
        };
        assert!(query.validated().is_err());
    }
}
