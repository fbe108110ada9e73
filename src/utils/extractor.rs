//! 路径参数提取器
//!
//! 解析失败时直接返回统一格式的 400 响应，而不是 actix 默认的纯文本错误。

use actix_web::dev::Payload;
use actix_web::error::InternalError;
use actix_web::{FromRequest, HttpRequest, HttpResponse};
use std::future::{Ready, ready};

use crate::models::{ApiResponse, ErrorCode};

fn bad_path_param(message: &'static str) -> actix_web::Error {
    InternalError::from_response(
        message,
        HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, message)),
    )
    .into()
}

macro_rules! define_safe_path {
    ($(#[$meta:meta])* $name:ident($ty:ty), $param:literal, $parse:expr, $message:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name(pub $ty);

        impl FromRequest for $name {
            type Error = actix_web::Error;
            type Future = Ready<Result<Self, Self::Error>>;

            fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
                let parse: fn(&str) -> Option<$ty> = $parse;
                ready(
                    req.match_info()
                        .get($param)
                        .and_then(parse)
                        .map($name)
                        .ok_or_else(|| bad_path_param($message)),
                )
            }
        }
    };
}

fn is_slug(s: &str, extra: &[char]) -> bool {
    !s.is_empty()
        && s.len() <= 64
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || extra.contains(&c))
}

define_safe_path!(
    /// 正整数 ID（`{id}`）
    SafeIDI64(i64),
    "id",
    |s| s.parse::<i64>().ok().filter(|v| *v > 0),
    "Invalid id"
);

define_safe_path!(
    /// 目录 ID（`{id}`），如 `course-agec-101`
    SafeCatalogId(String),
    "id",
    |s| is_slug(s, &['-', '_']).then(|| s.to_string()),
    "Invalid catalog id"
);

define_safe_path!(
    /// 支付 ID（`{id}`，UUID）
    SafePaymentId(String),
    "id",
    |s| uuid::Uuid::parse_str(s).ok().map(|u| u.to_string()),
    "Invalid payment id"
);

define_safe_path!(
    /// 配置键（`{key}`），如 `payment.amount`
    SafeSettingKey(String),
    "key",
    |s| is_slug(s, &['.', '_']).then(|| s.to_string()),
    "Invalid setting key"
);

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[actix_web::test]
    async fn test_positive_id() {
        let req = TestRequest::default().param("id", "12").to_http_request();
        let id = SafeIDI64::extract(&req).await.unwrap();
        assert_eq!(id.0, 12);

        let req = TestRequest::default().param("id", "-3").to_http_request();
        assert!(SafeIDI64::extract(&req).await.is_err());

        let req = TestRequest::default().param("id", "abc").to_http_request();
        assert!(SafeIDI64::extract(&req).await.is_err());
    }

    #[actix_web::test]
    async fn test_payment_id_must_be_uuid() {
        let req = TestRequest::default()
            .param("id", "6f1c2b7e-3d4a-4e5f-9a8b-1c2d3e4f5a6b")
            .to_http_request();
        assert!(SafePaymentId::extract(&req).await.is_ok());

        let req = TestRequest::default()
            .param("id", "../../etc")
            .to_http_request();
        assert!(SafePaymentId::extract(&req).await.is_err());
    }

    #[actix_web::test]
    async fn test_setting_key() {
        let req = TestRequest::default()
            .param("key", "payment.amount")
            .to_http_request();
        assert_eq!(SafeSettingKey::extract(&req).await.unwrap().0, "payment.amount");

        let req = TestRequest::default()
            .param("key", "payment amount")
            .to_http_request();
        assert!(SafeSettingKey::extract(&req).await.is_err());
    }

    #[actix_web::test]
    async fn test_catalog_id() {
        let req = TestRequest::default()
            .param("id", "course-agec-101")
            .to_http_request();
        assert!(SafeCatalogId::extract(&req).await.is_ok());
    }
}
