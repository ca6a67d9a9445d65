//! # 월간 일정 생성기
//!
//! 내담자들의 주간 반복 규칙을 한 달 치 날짜별 상담 인스턴스로 펼칩니다.
//!
//! 이 모듈은 순수 함수만 가집니다. DB나 파일에 접근하지 않고,
//! 입력을 변경하지 않으며, 같은 입력에는 항상 같은 순서의 같은 결과를 돌려줍니다.
//! 규칙을 DB에서 읽어오거나 결과를 저장하는 일은 라우트 핸들러가 담당합니다.
//!
//! ## 실패 정책
//! - 월이 1~12 밖이거나 연도가 달력으로 표현할 수 없으면 `ScheduleError`
//! - 규칙 하나의 데이터가 잘못된 경우(요일/시각/상담 시간)는 그 규칙만 건너뛰고
//!   `ExpandedSchedule::skipped_rules`로 개수를 보고합니다.

use chrono::{Datelike, NaiveDate, NaiveTime};
use thiserror::Error;

use crate::models::{AppointmentInstance, AppointmentStatus, DayOfWeek, ExpandedSchedule, RecurrenceRule};

/// 호출자 입력(월/연도)이 잘못된 경우의 에러
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("month must be between 1 and 12, got {0}")]
    InvalidMonth(i64),

    #[error("year {0} is not a representable calendar year")]
    InvalidYear(i64),
}

/// 해당 월의 일수
///
/// 말일은 chrono로 구하므로 윤년은 그레고리력 규칙(4의 배수, 단 400의 배수가 아닌
/// 100의 배수는 제외)을 따릅니다. 월이 1~12 밖이거나 chrono가 표현할 수 없는 날짜면 `None`.
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    if !(1..=12).contains(&month) {
        return None;
    }
    let last = if month == 12 {
        NaiveDate::from_ymd_opt(year, 12, 31)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?.pred_opt()?
    };
    Some(last.day())
}

/// "HH:MM" 또는 "HH:MM:SS" 형식의 시각을 해석합니다.
pub fn parse_time_of_day(raw: &str) -> Option<NaiveTime> {
    let trimmed = raw.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
        .ok()
}

/// 검증을 통과한 규칙 (요일/시각이 해석된 상태)
struct ValidRule<'a> {
    rule: &'a RecurrenceRule,
    weekday: DayOfWeek,
    time: NaiveTime,
}

/// 월/연도를 검증하고 그 달의 1일과 일수를 돌려줍니다.
fn month_bounds(month: i64, year: i64) -> Result<(NaiveDate, u32), ScheduleError> {
    let month_u32 = u32::try_from(month)
        .ok()
        .filter(|m| (1..=12).contains(m))
        .ok_or(ScheduleError::InvalidMonth(month))?;
    let year_i32 = i32::try_from(year).map_err(|_| ScheduleError::InvalidYear(year))?;
    // 1일과 말일 모두 chrono 범위 안이어야 합니다.
    let first = NaiveDate::from_ymd_opt(year_i32, month_u32, 1)
        .ok_or(ScheduleError::InvalidYear(year))?;
    let day_count = days_in_month(year_i32, month_u32).ok_or(ScheduleError::InvalidYear(year))?;
    Ok((first, day_count))
}

/// 활성 규칙들을 한 달 치 상담 인스턴스로 펼칩니다.
///
/// ## 처리 흐름
/// 1. `active = true`인 규칙만 남깁니다.
/// 2. 요일·시각·상담 시간을 해석하고, 잘못된 규칙은 건너뛰며 개수를 셉니다.
/// 3. 1일부터 말일까지 각 날짜의 요일을 구해, 요일이 같은 규칙마다 인스턴스를 하나씩 만듭니다.
/// 4. (날짜, 시각) 오름차순으로 안정 정렬합니다. 동점이면 입력 순서를 유지합니다.
///
/// # 에러
/// `month`가 1~12 밖이거나 `year`가 달력 범위를 벗어나면 `ScheduleError`
pub fn expand_month(
    rules: &[RecurrenceRule],
    month: i64,
    year: i64,
) -> Result<ExpandedSchedule, ScheduleError> {
    let (first, day_count) = month_bounds(month, year)?;

    let mut skipped_rules = 0;
    let mut valid_rules = Vec::new();

    for rule in rules.iter().filter(|rule| rule.active) {
        let weekday = DayOfWeek::parse(&rule.weekday);
        let time = parse_time_of_day(&rule.time_of_day);

        match (weekday, time) {
            (Some(weekday), Some(time)) if rule.duration_minutes > 0 => {
                valid_rules.push(ValidRule { rule, weekday, time });
            }
            _ => {
                tracing::warn!(
                    client_id = %rule.client_id,
                    weekday = %rule.weekday,
                    time_of_day = %rule.time_of_day,
                    duration_minutes = rule.duration_minutes,
                    "Skipping malformed recurrence rule"
                );
                skipped_rules += 1;
            }
        }
    }

    let mut dated: Vec<(NaiveTime, AppointmentInstance)> = Vec::new();

    // iter_days()는 1일부터 하루씩 증가하는 날짜를 끝없이 만들어 내므로 take로 자릅니다.
    for date in first.iter_days().take(day_count as usize) {
        let weekday = DayOfWeek::from(date.weekday());

        for valid in valid_rules.iter().filter(|valid| valid.weekday == weekday) {
            let instance = AppointmentInstance {
                id: format!("{}-{}", valid.rule.client_id, date.day()),
                client_id: valid.rule.client_id.clone(),
                client_name: valid.rule.client_name.clone(),
                date,
                weekday,
                time: valid.time.format("%H:%M").to_string(),
                duration_minutes: valid.rule.duration_minutes,
                status: AppointmentStatus::Scheduled,
            };
            dated.push((valid.time, instance));
        }
    }

    // sort_by_key는 안정 정렬이므로 같은 (날짜, 시각)은 규칙 입력 순서를 유지합니다.
    dated.sort_by_key(|(time, instance)| (instance.date, *time));

    Ok(ExpandedSchedule {
        instances: dated.into_iter().map(|(_, instance)| instance).collect(),
        skipped_rules,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(client_id: &str, name: &str, weekday: &str, time: &str) -> RecurrenceRule {
        RecurrenceRule {
            client_id: client_id.to_string(),
            client_name: name.to_string(),
            weekday: weekday.to_string(),
            time_of_day: time.to_string(),
            duration_minutes: 50,
            active: true,
        }
    }

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2025, 1), Some(31));
        assert_eq!(days_in_month(2025, 4), Some(30));
        assert_eq!(days_in_month(2025, 12), Some(31));
        assert_eq!(days_in_month(2023, 2), Some(28));
        assert_eq!(days_in_month(2024, 2), Some(29));
        assert_eq!(days_in_month(1900, 2), Some(28));
        assert_eq!(days_in_month(2000, 2), Some(29));
    }

    #[test]
    fn test_days_in_month_rejects_out_of_range_month() {
        assert_eq!(days_in_month(2024, 0), None);
        assert_eq!(days_in_month(2024, 13), None);
        assert_eq!(days_in_month(i32::MAX, 1), None);
    }

    #[test]
    fn test_december_of_last_chrono_year_is_full_month() {
        let last_year = NaiveDate::MAX.year();
        let result = expand_month(&[rule("c1", "Bia", "Monday", "10:00")], 12, last_year as i64).unwrap();
        assert!(result.instances.len() >= 4);
        assert!(result.instances.iter().all(|i| i.date.month() == 12));
    }

    #[test]
    fn test_sample_january_2024_mondays() {
        let rules = vec![rule("ana", "Ana", "Monday", "09:00")];
        let result = expand_month(&rules, 1, 2024).unwrap();

        let days: Vec<u32> = result.instances.iter().map(|i| i.date.day()).collect();
        assert_eq!(days, vec![1, 8, 15, 22, 29]);
        assert_eq!(result.skipped_rules, 0);
        for instance in &result.instances {
            assert_eq!(instance.time, "09:00");
            assert_eq!(instance.duration_minutes, 50);
            assert_eq!(instance.weekday, DayOfWeek::Monday);
            assert_eq!(instance.status, AppointmentStatus::Scheduled);
            assert_eq!(instance.client_name, "Ana");
        }
        assert_eq!(result.instances[0].id, "ana-1");
        assert_eq!(result.instances[4].id, "ana-29");
    }

    #[test]
    fn test_four_mondays() {
        // 2024년 2월: 월요일은 5, 12, 19, 26일
        let rules = vec![rule("c1", "Carlos", "Monday", "14:00")];
        let result = expand_month(&rules, 2, 2024).unwrap();
        assert_eq!(result.instances.len(), 4);
    }

    #[test]
    fn test_leap_day_only_in_leap_year() {
        // 2024-02-29는 목요일
        let rules = vec![rule("c1", "Joao", "Thursday", "16:00")];

        let leap = expand_month(&rules, 2, 2024).unwrap();
        assert!(leap.instances.iter().any(|i| i.date == date(2024, 2, 29)));

        let non_leap = expand_month(&rules, 2, 2023).unwrap();
        assert!(non_leap.instances.iter().all(|i| i.date.day() <= 28));
    }

    #[test]
    fn test_inactive_rule_contributes_nothing() {
        let mut inactive = rule("c1", "Maria", "Wednesday", "10:30");
        inactive.active = false;
        let result = expand_month(&[inactive], 5, 2024).unwrap();
        assert!(result.instances.is_empty());
        assert_eq!(result.skipped_rules, 0);
    }

    #[test]
    fn test_empty_rules_yield_empty_schedule() {
        let result = expand_month(&[], 7, 1999).unwrap();
        assert!(result.instances.is_empty());
        assert_eq!(result.skipped_rules, 0);
    }

    #[test]
    fn test_invalid_month_is_rejected() {
        assert_eq!(expand_month(&[], 0, 2024), Err(ScheduleError::InvalidMonth(0)));
        assert_eq!(expand_month(&[], 13, 2024), Err(ScheduleError::InvalidMonth(13)));
    }

    #[test]
    fn test_unrepresentable_year_is_rejected() {
        assert_eq!(
            expand_month(&[], 1, 10_000_000),
            Err(ScheduleError::InvalidYear(10_000_000))
        );
        assert_eq!(
            expand_month(&[], 1, i64::MAX),
            Err(ScheduleError::InvalidYear(i64::MAX))
        );
    }

    #[test]
    fn test_malformed_rules_are_skipped_and_counted() {
        let mut zero_duration = rule("c4", "Lucia", "Friday", "08:30");
        zero_duration.duration_minutes = 0;
        let rules = vec![
            rule("c1", "Ana", "Funday", "09:00"),
            rule("c2", "Carlos", "Tuesday", "25:99"),
            rule("c3", "Maria", "Tuesday", "14:00"),
            zero_duration,
        ];

        let result = expand_month(&rules, 1, 2024).unwrap();
        assert_eq!(result.skipped_rules, 3);
        assert!(result.instances.iter().all(|i| i.client_id == "c3"));
        // 2024년 1월 화요일: 2, 9, 16, 23, 30
        assert_eq!(result.instances.len(), 5);
    }

    #[test]
    fn test_weekday_fidelity() {
        let rules = vec![
            rule("a", "Ana", "Segunda-feira", "09:00"),
            rule("b", "Carlos", "terça-feira", "14:00"),
            rule("c", "Maria", "wed", "10:30"),
            rule("d", "Joao", "THURSDAY", "16:00"),
            rule("e", "Lucia", "Sábado", "08:30"),
            rule("f", "Pedro", "Domingo", "11:00"),
        ];
        let result = expand_month(&rules, 3, 2025).unwrap();

        for instance in &result.instances {
            let source = rules.iter().find(|r| r.client_id == instance.client_id).unwrap();
            assert_eq!(DayOfWeek::from(instance.date.weekday()), instance.weekday);
            assert_eq!(DayOfWeek::parse(&source.weekday), Some(instance.weekday));
            assert_eq!(instance.date.month(), 3);
            assert_eq!(instance.date.year(), 2025);
        }
        assert_eq!(result.skipped_rules, 0);
    }

    #[test]
    fn test_ordering_by_date_then_time() {
        // 같은 요일에 시각이 역순으로 들어와도 결과는 시각순이어야 합니다.
        let rules = vec![
            rule("late", "Late", "Monday", "17:00"),
            rule("early", "Early", "Monday", "08:00"),
            rule("tue", "Tue", "Tuesday", "07:00"),
        ];
        let result = expand_month(&rules, 1, 2024).unwrap();

        let keys: Vec<(NaiveDate, String)> = result
            .instances
            .iter()
            .map(|i| (i.date, i.time.clone()))
            .collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
        assert_eq!(result.instances[0].client_id, "early");
        assert_eq!(result.instances[1].client_id, "late");
        assert_eq!(result.instances[2].client_id, "tue");
    }

    #[test]
    fn test_duplicate_rules_keep_input_order() {
        let rules = vec![
            rule("first", "First", "Monday", "09:00"),
            rule("second", "Second", "Monday", "09:00"),
        ];
        let result = expand_month(&rules, 1, 2024).unwrap();
        assert_eq!(result.instances.len(), 10);
        for pair in result.instances.chunks(2) {
            assert_eq!(pair[0].client_id, "first");
            assert_eq!(pair[1].client_id, "second");
        }
    }

    #[test]
    fn test_seconds_in_time_are_normalised() {
        let rules = vec![rule("c1", "Ana", "Monday", "09:00:00")];
        let result = expand_month(&rules, 1, 2024).unwrap();
        assert!(result.instances.iter().all(|i| i.time == "09:00"));
    }

    #[test]
    fn test_expansion_is_deterministic() {
        let rules = vec![
            rule("a", "Ana", "Monday", "09:00"),
            rule("b", "Carlos", "Tuesday", "14:00"),
            rule("c", "Maria", "Wednesday", "10:30"),
        ];
        let original = rules.clone();
        let first = expand_month(&rules, 10, 2026).unwrap();
        let second = expand_month(&rules, 10, 2026).unwrap();
        assert_eq!(first, second);
        assert_eq!(rules, original);
    }
}
