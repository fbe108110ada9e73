use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::UserService;
use crate::middlewares::RequireJWT;
use crate::models::users::{
    entities::UserStatus,
    requests::{UpdateUserRequest, UserChanges},
    responses::UserResponse,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{cache_from_request, error_response};

/// 管理员修改角色 / 状态；不能修改自己
pub async fn update_user(
    service: &UserService,
    user_id: i64,
    update_data: UpdateUserRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    if RequireJWT::extract_user_id(request) == Some(user_id) {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::CanNotModifyCurrentUser,
            "You cannot change your own role or status",
        )));
    }

    if update_data.role.is_none() && update_data.status.is_none() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "Nothing to update",
        )));
    }

    let suspending = update_data.status == Some(UserStatus::Suspended);
    let changes = UserChanges {
        role: update_data.role,
        status: update_data.status,
        ..Default::default()
    };

    match storage.update_user(user_id, changes).await {
        Ok(Some(user)) => {
            // 用户缓存以 token 为键，停用时只能整体清空
            if suspending && let Some(cache) = cache_from_request(request) {
                cache.invalidate_all().await;
            }
            tracing::info!(
                "User {} updated: role={}, status={}",
                user.id,
                user.role,
                user.status
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                UserResponse { user },
                "User updated successfully",
            )))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::UserNotFound,
            "User not found",
        ))),
        Err(e) => Ok(error_response(&e, ErrorCode::UserUpdateFailed)),
    }
}
