pub mod auth;
pub mod catalog;
pub mod chat;
pub mod common;
pub mod files;
pub mod papers;
pub mod payments;
pub mod system;
pub mod users;

pub use common::*;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 进程启动时间（注入到 app_data）
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

/// 业务错误码
///
/// 0 为成功；1xxx 通用；2xxx 认证；3xxx 用户；4xxx 文件；
/// 5xxx 目录；6xxx 试卷；7xxx 支付；8xxx AI 对话。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/api.ts")]
pub enum ErrorCode {
    Success = 0,

    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    Conflict = 1009,
    RateLimitExceeded = 1029,
    InternalServerError = 1500,
    ServiceUnavailable = 1503,

    AuthFailed = 2000,
    RegisterFailed = 2001,

    UserNotFound = 3000,
    UserAlreadyExists = 3001,
    UserNameInvalid = 3002,
    UserNameAlreadyExists = 3003,
    UserEmailInvalid = 3004,
    UserEmailAlreadyExists = 3005,
    UserPasswordInvalid = 3006,
    UserUpdateFailed = 3007,
    CanNotModifyCurrentUser = 3008,

    FileNotFound = 4000,
    FileUploadFailed = 4001,
    FileTypeNotAllowed = 4002,
    FileSizeExceeded = 4003,
    MultifileUploadNotAllowed = 4004,

    CatalogNotFound = 5000,
    CatalogAlreadyExists = 5001,

    PaperNotFound = 6000,
    PaperInvalid = 6001,
    PaperReviewInvalid = 6002,
    PaperNotApproved = 6003,

    PaymentNotFound = 7000,
    PaymentFailed = 7001,
    PaymentGatewayError = 7002,
    PaymentPhoneInvalid = 7003,
    PaymentCallbackInvalid = 7004,
    AccessRequired = 7005,

    ExtractionFailed = 8000,
    ChatRequestInvalid = 8001,
    ChatFailed = 8002,
    ChatUnavailable = 8003,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success as i32, 0);
        assert_eq!(ErrorCode::AccessRequired as i32, 7005);
        assert_eq!(ErrorCode::PaperReviewInvalid as i32, 6002);
    }

    #[test]
    fn test_response_envelope() {
        let resp = ApiResponse::error_empty(ErrorCode::PaymentNotFound, "missing");
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["code"], 7000);
        assert_eq!(json["message"], "missing");
        assert!(json.get("data").is_none());
    }
}
