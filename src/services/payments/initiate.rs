use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::{Duration, Utc};
use uuid::Uuid;

use super::PaymentService;
use super::mpesa::StkPushRequest;
use crate::config::AppConfig;
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse, ErrorCode,
    payments::{
        entities::PaymentStatus,
        requests::{CreateMpesaTransactionRecord, CreatePaymentRecord, InitiatePaymentRequest},
        responses::InitiatePaymentResponse,
    },
};
use crate::services::{error_response, system::DynamicConfig};
use crate::storage::Storage;
use crate::utils::validate::normalize_phone_number;

const DEFAULT_PROMPT_MESSAGE: &str =
    "Payment request sent to your phone. Please check your phone and enter your M-Pesa PIN.";

pub async fn initiate_payment(
    service: &PaymentService,
    req: InitiatePaymentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(user_id) = RequireJWT::extract_user_id(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Authentication required",
        )));
    };

    if !AppConfig::get().mpesa_configured() {
        return Ok(
            HttpResponse::ServiceUnavailable().json(ApiResponse::error_empty(
                ErrorCode::ServiceUnavailable,
                "Payments are not configured",
            )),
        );
    }

    let phone_number = match normalize_phone_number(&req.phone_number) {
        Ok(phone) => phone,
        Err(msg) => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::PaymentPhoneInvalid,
                msg,
            )));
        }
    };

    let mpesa = match service.mpesa() {
        Ok(client) => client,
        Err(e) => return Ok(error_response(&e, ErrorCode::PaymentGatewayError)),
    };

    let storage = service.get_storage(request)?;
    let amount = DynamicConfig::payment_amount().await;
    let currency = DynamicConfig::payment_currency().await;
    let period_days = DynamicConfig::access_period_days().await;

    let payment = match storage
        .create_payment(CreatePaymentRecord {
            id: Uuid::new_v4().to_string(),
            user_id,
            phone_number: phone_number.clone(),
            amount,
            currency,
            expires_at: Utc::now() + Duration::days(period_days),
        })
        .await
    {
        Ok(payment) => payment,
        Err(e) => {
            tracing::error!("创建支付记录失败: {}", e);
            return Ok(error_response(&e, ErrorCode::PaymentFailed));
        }
    };

    let accepted = match mpesa
        .stk_push(&StkPushRequest {
            payment_id: &payment.id,
            phone_number: &phone_number,
            amount,
        })
        .await
    {
        Ok(accepted) => accepted,
        Err(e) => {
            tracing::error!("Payment {} STK push failed: {}", payment.id, e);
            mark_payment_failed(storage.as_ref(), &payment.id).await;
            return Ok(error_response(&e, ErrorCode::PaymentGatewayError));
        }
    };

    if let Err(e) = storage
        .create_mpesa_transaction(CreateMpesaTransactionRecord {
            payment_id: payment.id.clone(),
            merchant_request_id: accepted.merchant_request_id.clone(),
            checkout_request_id: accepted.checkout_request_id.clone(),
            phone_number,
            amount,
        })
        .await
    {
        tracing::error!("保存 STK 请求记录失败: {}", e);
        mark_payment_failed(storage.as_ref(), &payment.id).await;
        return Ok(error_response(&e, ErrorCode::PaymentFailed));
    }

    tracing::info!(
        "Payment {} initiated for user {} (checkout {})",
        payment.id,
        user_id,
        accepted.checkout_request_id
    );

    let message = if accepted.customer_message.is_empty() {
        DEFAULT_PROMPT_MESSAGE.to_string()
    } else {
        accepted.customer_message
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        InitiatePaymentResponse {
            payment_id: payment.id,
            merchant_request_id: accepted.merchant_request_id,
            checkout_request_id: accepted.checkout_request_id,
            message,
        },
        "Payment initiated",
    )))
}

/// 发起失败后把 pending 支付标记为 failed，返回是否生效
pub(crate) async fn mark_payment_failed(storage: &dyn Storage, payment_id: &str) -> bool {
    match storage
        .update_pending_payment_status(payment_id, PaymentStatus::Failed)
        .await
    {
        Ok(updated) => updated,
        Err(e) => {
            tracing::error!("标记支付 {} 失败状态出错: {}", payment_id, e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseConfig;
    use crate::models::users::{entities::UserRole, requests::CreateUserRequest};
    use crate::storage::sea_orm_storage::SeaOrmStorage;

    #[tokio::test]
    async fn test_mark_failed_only_touches_pending() {
        let storage = SeaOrmStorage::connect(&DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            pool_size: 1,
            timeout: 5,
        })
        .await
        .unwrap();
        let user = storage
            .create_user(CreateUserRequest {
                username: "quinn".to_string(),
                email: "quinn@example.com".to_string(),
                password: "hashed".to_string(),
                role: UserRole::User,
                display_name: None,
                avatar_url: None,
            })
            .await
            .unwrap();
        storage
            .create_payment(CreatePaymentRecord {
                id: "pay-quinn".to_string(),
                user_id: user.id,
                phone_number: "254712345678".to_string(),
                amount: 10.0,
                currency: "KES".to_string(),
                expires_at: Utc::now() + Duration::days(365),
            })
            .await
            .unwrap();

        assert!(mark_payment_failed(&storage, "pay-quinn").await);
        let payment = storage.get_payment("pay-quinn").await.unwrap().unwrap();
        assert_eq!(payment.status, PaymentStatus::Failed);

        // 已经不是 pending，或支付不存在
        assert!(!mark_payment_failed(&storage, "pay-quinn").await);
        assert!(!mark_payment_failed(&storage, "pay-missing").await);
    }
}
