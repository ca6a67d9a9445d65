//! # 일정 생성(Schedule) 모델
//!
//! 내담자의 주간 고정 상담 시간(반복 규칙)과
//! 그 규칙을 한 달 치 날짜로 펼친 상담 인스턴스를 표현합니다.
//!
//! ## 구조체 역할
//! - `DayOfWeek`: 요일. JSON에서는 `"Monday"`처럼 영어 전체 이름으로 표현됩니다.
//! - `RecurrenceRule`: 내담자 한 명의 주간 고정 시간 (요일 + 시각 + 상담 시간)
//! - `AppointmentInstance`: 규칙 × 월로부터 계산된 상담 한 건 (DB에 저장되지 않음)
//! - `ExpandedSchedule`: 생성 결과와 건너뛴 규칙 수
//! - `GenerateScheduleRequest`: `POST /schedule/generate` 요청 본문

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use super::appointment::AppointmentStatus;

/// 요일
///
/// 변형(variant) 순서는 일요일=0 … 토요일=6 번호 체계를 따릅니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DayOfWeek {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl DayOfWeek {
    /// 일요일=0 … 토요일=6
    pub fn number_from_sunday(self) -> u32 {
        self as u32
    }

    /// 영어 전체 이름 (예: "Monday")
    pub fn name(self) -> &'static str {
        match self {
            DayOfWeek::Sunday => "Sunday",
            DayOfWeek::Monday => "Monday",
            DayOfWeek::Tuesday => "Tuesday",
            DayOfWeek::Wednesday => "Wednesday",
            DayOfWeek::Thursday => "Thursday",
            DayOfWeek::Friday => "Friday",
            DayOfWeek::Saturday => "Saturday",
        }
    }

    /// 자유 입력된 요일 이름을 해석합니다.
    ///
    /// 허용하는 표기:
    /// - 영어 전체 이름/세 글자 약어 (대소문자 무시): chrono의 `FromStr`에 위임
    /// - 클리닉 화면에서 쓰던 포르투갈어 이름 (`Segunda-feira`, `Sábado` 등, 악센트 생략 허용)
    ///
    /// 해석할 수 없으면 `None`을 반환합니다.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if let Ok(weekday) = trimmed.parse::<Weekday>() {
            return Some(weekday.into());
        }

        let lowered = trimmed.to_lowercase();
        let day = match lowered.as_str() {
            "domingo" => DayOfWeek::Sunday,
            "segunda" | "segunda-feira" => DayOfWeek::Monday,
            "terça" | "terca" | "terça-feira" | "terca-feira" => DayOfWeek::Tuesday,
            "quarta" | "quarta-feira" => DayOfWeek::Wednesday,
            "quinta" | "quinta-feira" => DayOfWeek::Thursday,
            "sexta" | "sexta-feira" => DayOfWeek::Friday,
            "sábado" | "sabado" => DayOfWeek::Saturday,
            _ => return None,
        };
        Some(day)
    }
}

impl From<Weekday> for DayOfWeek {
    fn from(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Sun => DayOfWeek::Sunday,
            Weekday::Mon => DayOfWeek::Monday,
            Weekday::Tue => DayOfWeek::Tuesday,
            Weekday::Wed => DayOfWeek::Wednesday,
            Weekday::Thu => DayOfWeek::Thursday,
            Weekday::Fri => DayOfWeek::Friday,
            Weekday::Sat => DayOfWeek::Saturday,
        }
    }
}

/// 내담자 한 명의 주간 고정 상담 시간
///
/// `weekday`와 `time_of_day`는 DB에 저장된 원문 그대로입니다.
/// 잘못된 값은 일정 생성 시점에 걸러지고 건너뛴 규칙 수로 보고됩니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct RecurrenceRule {
    pub client_id: String,
    pub client_name: String,
    pub weekday: String,
    pub time_of_day: String,
    pub duration_minutes: i64,
    pub active: bool,
}

/// 반복 규칙을 특정 날짜에 펼친 상담 한 건
///
/// `id`는 `"{client_id}-{일}"` 형식입니다 (예: `"c1-15"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentInstance {
    pub id: String,
    pub client_id: String,
    pub client_name: String,
    /// "YYYY-MM-DD"로 직렬화됩니다.
    pub date: NaiveDate,
    pub weekday: DayOfWeek,
    /// "HH:MM"
    pub time: String,
    pub duration_minutes: i64,
    pub status: AppointmentStatus,
}

/// 한 달 치 일정 생성 결과
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpandedSchedule {
    /// (날짜, 시각) 오름차순으로 정렬된 상담 인스턴스
    pub instances: Vec<AppointmentInstance>,
    /// 요일/시각/상담 시간이 잘못되어 건너뛴 규칙 수
    pub skipped_rules: usize,
}

/// `POST /api/v1/schedule/generate`, `POST /api/v1/appointments/generate` 요청 본문
///
/// 범위 검증은 일정 생성기가 담당하므로 여기서는 넓은 정수 타입으로 받습니다.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateScheduleRequest {
    pub month: i64,
    pub year: i64,
}

/// `POST /api/v1/appointments/generate` 응답 본문
#[derive(Debug, Clone, Serialize)]
pub struct GenerateAppointmentsResponse {
    /// 새로 저장된 상담
    pub created: usize,
    /// 같은 내담자/날짜/시각의 상담이 이미 있어 저장하지 않은 수
    pub skipped_existing: usize,
    pub skipped_rules: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_english_and_portuguese_names() {
        assert_eq!(DayOfWeek::parse("Monday"), Some(DayOfWeek::Monday));
        assert_eq!(DayOfWeek::parse(" wed "), Some(DayOfWeek::Wednesday));
        assert_eq!(DayOfWeek::parse("Segunda-feira"), Some(DayOfWeek::Monday));
        assert_eq!(DayOfWeek::parse("TERCA"), Some(DayOfWeek::Tuesday));
        assert_eq!(DayOfWeek::parse("Sábado"), Some(DayOfWeek::Saturday));
        assert_eq!(DayOfWeek::parse("Funday"), None);
        assert_eq!(DayOfWeek::parse(""), None);
    }

    #[test]
    fn test_numbering_starts_at_sunday() {
        assert_eq!(DayOfWeek::Sunday.number_from_sunday(), 0);
        assert_eq!(DayOfWeek::Saturday.number_from_sunday(), 6);
        assert_eq!(
            DayOfWeek::from(Weekday::Wed).number_from_sunday(),
            Weekday::Wed.num_days_from_sunday()
        );
    }
}
