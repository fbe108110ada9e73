use serde::Deserialize;
use ts_rs::TS;

use super::entities::PaymentStatus;
use crate::models::common::PaginationQuery;

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/payment.ts")]
pub struct InitiatePaymentRequest {
    /// 支持 07XXXXXXXX / +2547XXXXXXXX / 2547XXXXXXXX
    pub phone_number: String,
}

// 管理员支付列表
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/payment.ts")]
pub struct PaymentListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub status: Option<PaymentStatus>,
}

/// 回调 URL 上的 query 参数
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallbackQuery {
    pub secret: Option<String>,
}

/// 存储层新建支付
#[derive(Debug, Clone)]
pub struct CreatePaymentRecord {
    pub id: String,
    pub user_id: i64,
    pub phone_number: String,
    pub amount: f64,
    pub currency: String,
    pub expires_at: chrono::DateTime<chrono::Utc>,
}

/// 存储层新建 STK 请求记录
#[derive(Debug, Clone)]
pub struct CreateMpesaTransactionRecord {
    pub payment_id: String,
    pub merchant_request_id: String,
    pub checkout_request_id: String,
    pub phone_number: String,
    pub amount: f64,
}

#[derive(Debug, Clone, Default)]
pub struct PaymentListQuery {
    pub page: u64,
    pub size: u64,
    pub status: Option<PaymentStatus>,
    pub user_id: Option<i64>,
}
