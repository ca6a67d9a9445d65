use serde::Serialize;

/// `GET /dashboard/stats` 응답. 모두 서버의 현재 날짜(로컬) 기준입니다.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub active_clients: i64,
    pub appointments_today: i64,
    pub progress_notes_this_month: i64,
    /// 이번 달 `completed` 상담의 상담료 합계.
    /// 금액 항목은 그룹에 `receipts` 권한이 없으면 `null`입니다.
    pub revenue_this_month: Option<f64>,
    pub expenses_this_month: Option<f64>,
}
