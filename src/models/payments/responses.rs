use serde::Serialize;
use ts_rs::TS;

use super::entities::Payment;
use crate::models::common::PaginationInfo;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/payment.ts")]
pub struct InitiatePaymentResponse {
    pub payment_id: String,
    pub merchant_request_id: String,
    pub checkout_request_id: String,
    /// 网关返回的提示（CustomerMessage）
    pub message: String,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/payment.ts")]
pub struct PaymentStatusResponse {
    pub payment: Payment,
    /// 轮询到达上限仍为 pending
    pub timed_out: bool,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/payment.ts")]
pub struct AccessStatusResponse {
    pub has_access: bool,
    pub expires_at: Option<chrono::DateTime<chrono::Utc>>,
    /// 当前访问费
    pub amount: f64,
    pub currency: String,
    pub period_days: i64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/payment.ts")]
pub struct PaymentListResponse {
    pub items: Vec<Payment>,
    pub pagination: PaginationInfo,
}
