use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::PaymentService;
use crate::config::AppConfig;
use crate::models::{
    ApiResponse, ErrorCode,
    payments::{
        callback::{CallbackAck, StkCallbackEnvelope},
        entities::CallbackSettlement,
        requests::CallbackQuery,
    },
};

/// 回调 URL 上的密钥是否匹配；未配置密钥时总是通过
pub(crate) fn callback_secret_matches(expected: &str, provided: Option<&str>) -> bool {
    expected.is_empty() || provided == Some(expected)
}

pub async fn handle_callback(
    service: &PaymentService,
    query: CallbackQuery,
    body: StkCallbackEnvelope,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if !callback_secret_matches(
        &AppConfig::get().mpesa.callback_secret,
        query.secret.as_deref(),
    ) {
        tracing::warn!("Rejected M-Pesa callback with invalid secret");
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::PaymentCallbackInvalid,
            "Invalid callback secret",
        )));
    }

    let Some(outcome) = body.into_outcome() else {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::PaymentCallbackInvalid,
            "Invalid callback data",
        )));
    };

    tracing::info!(
        "M-Pesa callback for {}: {} {}",
        outcome.checkout_request_id,
        outcome.result_code,
        outcome.result_desc
    );

    let storage = service.get_storage(request)?;
    match storage.settle_payment_from_callback(&outcome).await {
        Ok(CallbackSettlement::Settled(payment)) => {
            tracing::info!("Payment {} settled as {}", payment.id, payment.status);
            Ok(HttpResponse::Ok().json(CallbackAck::accepted()))
        }
        Ok(CallbackSettlement::AlreadySettled(payment)) => {
            tracing::info!(
                "Ignoring replayed callback for payment {} ({})",
                payment.id,
                payment.status
            );
            Ok(HttpResponse::Ok().json(CallbackAck::accepted()))
        }
        Ok(CallbackSettlement::UnknownCheckout) => {
            Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::PaymentNotFound,
                "Transaction not found",
            )))
        }
        Err(e) => {
            tracing::error!("处理支付回调失败: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Failed to process callback",
                )),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_callback_secret() {
        assert!(callback_secret_matches("", None));
        assert!(callback_secret_matches("", Some("anything")));
        assert!(callback_secret_matches("s3cret", Some("s3cret")));
        assert!(!callback_secret_matches("s3cret", None));
        assert!(!callback_secret_matches("s3cret", Some("wrong")));
    }
}
