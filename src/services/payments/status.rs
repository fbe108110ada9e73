use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::time::Duration;

use super::PaymentService;
use crate::config::AppConfig;
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse, ErrorCode,
    payments::{
        entities::Payment,
        responses::{AccessStatusResponse, PaymentStatusResponse},
    },
};
use crate::services::{error_response, system::DynamicConfig};

enum Lookup {
    Found(Payment),
    Denied(HttpResponse),
}

// 只有本人或管理员可以查看
async fn load_owned_payment(
    service: &PaymentService,
    id: &str,
    request: &HttpRequest,
) -> ActixResult<Lookup> {
    let storage = service.get_storage(request)?;
    let not_found = || {
        HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::PaymentNotFound,
            "Payment not found",
        ))
    };

    match storage.get_payment(id).await {
        Ok(Some(payment)) => {
            let owner = RequireJWT::extract_user_id(request) == Some(payment.user_id);
            if owner || RequireJWT::is_admin(request) {
                Ok(Lookup::Found(payment))
            } else {
                Ok(Lookup::Denied(not_found()))
            }
        }
        Ok(None) => Ok(Lookup::Denied(not_found())),
        Err(e) => Ok(Lookup::Denied(error_response(
            &e,
            ErrorCode::InternalServerError,
        ))),
    }
}

pub async fn payment_status(
    service: &PaymentService,
    id: String,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    match load_owned_payment(service, &id, request).await? {
        Lookup::Found(payment) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            PaymentStatusResponse {
                payment,
                timed_out: false,
            },
            "Payment status retrieved",
        ))),
        Lookup::Denied(resp) => Ok(resp),
    }
}

pub async fn await_payment(
    service: &PaymentService,
    id: String,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let mut payment = match load_owned_payment(service, &id, request).await? {
        Lookup::Found(payment) => payment,
        Lookup::Denied(resp) => return Ok(resp),
    };

    let access = &AppConfig::get().access;
    let storage = service.get_storage(request)?;
    let mut ticker = tokio::time::interval(Duration::from_secs(access.poll_interval_secs.max(1)));
    // 第一次 tick 立即返回
    ticker.tick().await;

    let mut attempts = 0;
    while !payment.status.is_settled() && attempts < access.poll_max_attempts {
        ticker.tick().await;
        attempts += 1;
        match storage.get_payment(&id).await {
            Ok(Some(latest)) => payment = latest,
            Ok(None) => break,
            Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
        }
    }

    let timed_out = !payment.status.is_settled();
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        PaymentStatusResponse { payment, timed_out },
        if timed_out {
            "Payment is still pending"
        } else {
            "Payment status retrieved"
        },
    )))
}

pub async fn check_access(
    service: &PaymentService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(user) = RequireJWT::extract_user_claims(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Authentication required",
        )));
    };

    let storage = service.get_storage(request)?;
    let active = match storage
        .find_active_access(user.id, chrono::Utc::now().timestamp())
        .await
    {
        Ok(active) => active,
        Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        AccessStatusResponse {
            has_access: user.is_admin() || active.is_some(),
            expires_at: active.map(|p| p.expires_at),
            amount: DynamicConfig::payment_amount().await,
            currency: DynamicConfig::payment_currency().await,
            period_days: DynamicConfig::access_period_days().await,
        },
        "Access status retrieved",
    )))
}
