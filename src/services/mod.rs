//! # 비즈니스 로직 모듈
//!
//! HTTP나 SQL과 무관한 도메인 로직을 모아둡니다.
//! - `bootstrap`: 첫 실행 시 관리자 그룹/계정 생성
//! - `password`: Argon2id 비밀번호 해시와 검증
//! - `schedule`: 주간 반복 규칙을 한 달치 상담 일정으로 펼치는 생성기

pub mod bootstrap;
pub mod password;
pub mod schedule;

pub use schedule::expand_month;
