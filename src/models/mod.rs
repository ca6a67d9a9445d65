//! # 데이터 모델 모듈
//!
//! 애플리케이션에서 사용하는 데이터 구조체(struct)들을 정의합니다.
//! 각 하위 모듈은 특정 도메인의 데이터 타입을 담당합니다:
//! - `appointment`: 상담 일정과 상태/종류 열거형
//! - `audit`: 감사 로그
//! - `client`: 내담자와 내담자 유형
//! - `dashboard`: 대시보드 통계 응답
//! - `expense`: 지출과 지출 유형
//! - `experience`: 회기 경험 기록
//! - `group`: 사용자 그룹과 권한
//! - `progress_note`: 경과 기록
//! - `schedule`: 반복 규칙과 월간 일정 생성 결과
//! - `user`: 사용자와 인증 요청/응답
//!
//! `pub use X::*;`로 재공개하여 `crate::models::Client`처럼 짧게 접근할 수 있게 합니다.

pub mod appointment;
pub mod audit;
pub mod client;
pub mod dashboard;
pub mod expense;
pub mod experience;
pub mod group;
pub mod progress_note;
pub mod schedule;
pub mod user;

pub use appointment::*;
pub use audit::*;
pub use client::*;
pub use dashboard::*;
pub use expense::*;
pub use experience::*;
pub use group::*;
pub use progress_note::*;
pub use schedule::*;
pub use user::*;
