use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::cache::user_cache_key;
use crate::middlewares::RequireJWT;
use crate::models::users::requests::{UpdateProfileRequest, UserChanges};
use crate::models::users::responses::UserResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::cache_from_request;
use crate::utils::password::hash_password;
use crate::utils::validate::{validate_email, validate_password};

use super::AuthService;

pub async fn handle_update_profile(
    service: &AuthService,
    update_data: UpdateProfileRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let Some(current_user) = RequireJWT::extract_user_claims(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Authentication required",
        )));
    };

    // 新邮箱需合法且未被他人使用
    let email = update_data.email.map(|e| e.trim().to_lowercase());
    if let Some(ref email) = email {
        if let Err(msg) = validate_email(email) {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::UserEmailInvalid, msg)));
        }
        if let Ok(Some(existing_user)) = storage.get_user_by_email(email).await
            && existing_user.id != current_user.id
        {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::UserEmailAlreadyExists,
                "Email already exists",
            )));
        }
    }

    let password_hash = match update_data.password {
        Some(ref password) => {
            if let Err(msg) = validate_password(password) {
                return Ok(HttpResponse::BadRequest()
                    .json(ApiResponse::error_empty(ErrorCode::UserPasswordInvalid, msg)));
            }
            match hash_password(password) {
                Ok(hash) => Some(hash),
                Err(e) => {
                    tracing::error!("密码哈希失败: {}", e);
                    return Ok(
                        HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                            ErrorCode::InternalServerError,
                            "Failed to update password",
                        )),
                    );
                }
            }
        }
        None => None,
    };

    // 角色与状态只能由管理员修改
    let changes = UserChanges {
        email,
        password_hash,
        role: None,
        status: None,
        display_name: update_data.display_name,
        avatar_url: update_data.avatar_url,
    };

    match storage.update_user(current_user.id, changes).await {
        Ok(Some(user)) => {
            if let Some(cache) = cache_from_request(request)
                && let Some(token) = request
                    .headers()
                    .get("Authorization")
                    .and_then(|h| h.to_str().ok())
                    .and_then(|s| s.strip_prefix("Bearer "))
            {
                cache.remove(&user_cache_key(token)).await;
            }
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                UserResponse { user },
                "Profile updated successfully",
            )))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::UserNotFound,
            "User not found",
        ))),
        Err(e) => {
            tracing::error!("更新用户信息失败: {}", e);
            Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::UserUpdateFailed,
                format!("Failed to update profile: {e}"),
            )))
        }
    }
}
