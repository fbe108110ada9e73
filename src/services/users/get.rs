use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::UserService;
use crate::models::users::responses::UserDetailResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::error_response;

/// 用户详情，附带支付记录与当前访问状态
pub async fn get_user(
    service: &UserService,
    user_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let user = match storage.get_user_by_id(user_id).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::UserNotFound,
                "User not found",
            )));
        }
        Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
    };

    let payments = match storage.list_user_payments(user.id).await {
        Ok(payments) => payments,
        Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
    };

    let now = chrono::Utc::now();
    let has_access = user.is_admin() || payments.iter().any(|p| p.grants_access_at(now));

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        UserDetailResponse {
            user,
            has_access,
            payments,
        },
        "User information retrieved successfully",
    )))
}
