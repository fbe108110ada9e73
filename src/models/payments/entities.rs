use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 支付状态
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/payment.ts")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
    Cancelled,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Completed => "completed",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Cancelled => "cancelled",
        }
    }

    /// 已结束（不会再被回调修改）
    pub fn is_settled(&self) -> bool {
        !matches!(self, PaymentStatus::Pending)
    }
}

impl<'de> Deserialize<'de> for PaymentStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(PaymentStatus::Pending),
            "completed" => Ok(PaymentStatus::Completed),
            "failed" => Ok(PaymentStatus::Failed),
            "cancelled" => Ok(PaymentStatus::Cancelled),
            _ => Err(format!("Invalid payment status: {s}")),
        }
    }
}

/// 访问费支付记录
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/payment.ts")]
pub struct Payment {
    pub id: String,
    pub user_id: i64,
    pub phone_number: String,
    pub amount: f64,
    pub currency: String,
    pub payment_method: String,
    pub status: PaymentStatus,
    /// M-Pesa 收据号
    pub transaction_id: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    /// 访问权限到期时间
    pub expires_at: chrono::DateTime<chrono::Utc>,
}

impl Payment {
    pub fn grants_access_at(&self, now: chrono::DateTime<chrono::Utc>) -> bool {
        self.status == PaymentStatus::Completed && self.expires_at > now
    }
}

/// STK push 请求与回调结果
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/payment.ts")]
pub struct MpesaTransaction {
    pub id: i64,
    pub payment_id: String,
    pub merchant_request_id: String,
    pub checkout_request_id: String,
    pub phone_number: String,
    pub amount: f64,
    pub result_code: Option<i32>,
    pub result_desc: Option<String>,
    pub mpesa_receipt_number: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// 回调入库结果
#[derive(Debug, Clone)]
pub enum CallbackSettlement {
    /// 本次回调完成了结算
    Settled(Payment),
    /// 支付此前已结算，本次回调被忽略
    AlreadySettled(Payment),
    /// 找不到对应的 CheckoutRequestID
    UnknownCheckout,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn payment(status: PaymentStatus, expires_in: Duration) -> Payment {
        let now = Utc::now();
        Payment {
            id: "p".to_string(),
            user_id: 1,
            phone_number: "254712345678".to_string(),
            amount: 10.0,
            currency: "KES".to_string(),
            payment_method: "mpesa".to_string(),
            status,
            transaction_id: None,
            created_at: now,
            updated_at: now,
            expires_at: now + expires_in,
        }
    }

    #[test]
    fn test_access_window() {
        let now = Utc::now();
        assert!(payment(PaymentStatus::Completed, Duration::days(30)).grants_access_at(now));
        assert!(!payment(PaymentStatus::Completed, Duration::days(-1)).grants_access_at(now));
        assert!(!payment(PaymentStatus::Pending, Duration::days(30)).grants_access_at(now));
        assert!(!payment(PaymentStatus::Failed, Duration::days(30)).grants_access_at(now));
    }

    #[test]
    fn test_settled_states() {
        assert!(!PaymentStatus::Pending.is_settled());
        assert!(PaymentStatus::Cancelled.is_settled());
        assert_eq!("failed".parse::<PaymentStatus>().unwrap(), PaymentStatus::Failed);
    }
}
