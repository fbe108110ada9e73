use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::PaymentService;
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse, ErrorCode,
    payments::requests::{PaymentListParams, PaymentListQuery},
};
use crate::services::error_response;

pub async fn list_my_payments(
    service: &PaymentService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(user_id) = RequireJWT::extract_user_id(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Authentication required",
        )));
    };

    let storage = service.get_storage(request)?;
    match storage.list_user_payments(user_id).await {
        Ok(payments) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            payments,
            "Payments retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

pub async fn list_payments(
    service: &PaymentService,
    params: PaymentListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let (page, size) = params.pagination.normalized();

    let query = PaymentListQuery {
        page,
        size,
        status: params.status,
        user_id: None,
    };

    match storage.list_payments(query).await {
        Ok(resp) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            resp,
            "Payments retrieved successfully",
        ))),
        Err(e) => {
            tracing::error!("查询支付列表失败: {}", e);
            Ok(error_response(&e, ErrorCode::InternalServerError))
        }
    }
}
