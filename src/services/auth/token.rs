use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::middlewares::require_jwt::RequireJWT;
use crate::models::auth::responses::{
    RefreshTokenResponse, TokenVerificationResponse, UserInfoResponse,
};
use crate::models::users::entities::UserStatus;
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::jwt::JwtUtils;

use super::AuthService;

fn unauthorized_with_cleared_cookie(message: &str) -> HttpResponse {
    HttpResponse::Unauthorized()
        .cookie(JwtUtils::create_empty_refresh_token_cookie())
        .json(ApiResponse::error_empty(ErrorCode::Unauthorized, message))
}

pub async fn handle_refresh_token(
    service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let config = service.get_config();

    let Some(refresh_token) = JwtUtils::extract_refresh_token_from_cookie(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        )));
    };

    let claims = match JwtUtils::verify_refresh_token(&refresh_token) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::info!("Refresh token rejected: {}", e);
            return Ok(unauthorized_with_cleared_cookie(
                "Login expired or invalid, please login again",
            ));
        }
    };

    // 用户被停用或删除后 refresh token 失效
    let storage = service.get_storage(request)?;
    let user = match claims.user_id() {
        Some(id) => storage.get_user_by_id(id).await.ok().flatten(),
        None => None,
    };
    let Some(user) = user.filter(|u| u.status == UserStatus::Active) else {
        return Ok(unauthorized_with_cleared_cookie(
            "Login expired or invalid, please login again",
        ));
    };

    match JwtUtils::generate_access_token(user.id, &user.role.to_string()) {
        Ok(access_token) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            RefreshTokenResponse {
                access_token,
                expires_in: config.jwt.access_token_expiry * 60,
            },
            "Token refreshed successfully",
        ))),
        Err(e) => {
            tracing::error!("Failed to generate access token: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Unable to refresh token",
                )),
            )
        }
    }
}

// 能走到这里说明 RequireJWT 已通过
pub async fn handle_verify_token(
    _service: &AuthService,
    _request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        TokenVerificationResponse { is_valid: true },
        "Token is valid",
    )))
}

pub async fn handle_get_user(
    service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(user) = RequireJWT::extract_user_claims(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        )));
    };

    let has_access = if user.is_admin() {
        true
    } else {
        let storage = service.get_storage(request)?;
        match storage
            .find_active_access(user.id, chrono::Utc::now().timestamp())
            .await
        {
            Ok(payment) => payment.is_some(),
            Err(e) => {
                tracing::warn!("Access lookup failed for user {}: {}", user.id, e);
                false
            }
        }
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        UserInfoResponse { user, has_access },
        "User information retrieved successfully",
    )))
}
