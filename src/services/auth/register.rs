use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::{
    ApiResponse, ErrorCode,
    auth::requests::RegisterRequest,
    users::{entities::UserRole, requests::CreateUserRequest, responses::UserResponse},
};
use crate::storage::Storage;
use crate::utils::password::hash_password;
use crate::utils::validate::{validate_email, validate_password, validate_username};

use super::AuthService;

/// 注册请求的字段校验，返回错误码和信息
pub(crate) fn validate_registration(req: &RegisterRequest) -> Result<(), (ErrorCode, String)> {
    validate_username(req.username.trim())
        .map_err(|msg| (ErrorCode::UserNameInvalid, msg.to_string()))?;
    validate_email(req.email.trim()).map_err(|msg| (ErrorCode::UserEmailInvalid, msg.to_string()))?;
    validate_password(&req.password).map_err(|msg| (ErrorCode::UserPasswordInvalid, msg))?;
    Ok(())
}

pub async fn handle_register(
    service: &AuthService,
    register_request: RegisterRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    if let Err((code, msg)) = validate_registration(&register_request) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(code, msg)));
    }

    let username = register_request.username.trim().to_string();
    let email = register_request.email.trim().to_lowercase();

    if let Err(response) = check_username_exists(&storage, &username).await {
        return Ok(response);
    }
    if let Err(response) = check_email_exists(&storage, &email).await {
        return Ok(response);
    }

    let password_hash = match hash_password(&register_request.password) {
        Ok(hash) => hash,
        Err(e) => {
            tracing::error!("密码哈希失败: {}", e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::RegisterFailed,
                    "Register failed",
                )),
            );
        }
    };

    let create_request = CreateUserRequest {
        username,
        email,
        password: password_hash,
        role: UserRole::User,
        display_name: register_request
            .display_name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty()),
        avatar_url: None,
    };

    match storage.create_user(create_request).await {
        Ok(user) => {
            tracing::info!("New user registered: {}", user.username);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                UserResponse { user },
                "Registration successful",
            )))
        }
        Err(e) => {
            tracing::error!("注册失败: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::RegisterFailed,
                    format!("Register failed: {e}"),
                )),
            )
        }
    }
}

async fn check_username_exists(
    storage: &Arc<dyn Storage>,
    username: &str,
) -> Result<(), HttpResponse> {
    match storage.get_user_by_username(username).await {
        Ok(Some(_)) => Err(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::UserNameAlreadyExists,
            "Username already exists",
        ))),
        Ok(None) => Ok(()),
        Err(e) => Err(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::RegisterFailed,
                format!("Register failed: {e}"),
            )),
        ),
    }
}

async fn check_email_exists(storage: &Arc<dyn Storage>, email: &str) -> Result<(), HttpResponse> {
    match storage.get_user_by_email(email).await {
        Ok(Some(_)) => Err(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::UserEmailAlreadyExists,
            "Email already exists",
        ))),
        Ok(None) => Ok(()),
        Err(e) => Err(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::RegisterFailed,
                format!("Register failed: {e}"),
            )),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(username: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            display_name: None,
        }
    }

    #[test]
    fn test_valid_registration() {
        assert!(validate_registration(&request("wanjiku", "w@rongo.ac.ke", "Exams2024x")).is_ok());
    }

    #[test]
    fn test_invalid_fields_map_to_codes() {
        let (code, _) =
            validate_registration(&request("a", "w@rongo.ac.ke", "Exams2024x")).unwrap_err();
        assert_eq!(code, ErrorCode::UserNameInvalid);

        let (code, _) =
            validate_registration(&request("wanjiku", "not-an-email", "Exams2024x")).unwrap_err();
        assert_eq!(code, ErrorCode::UserEmailInvalid);

        let (code, _) =
            validate_registration(&request("wanjiku", "w@rongo.ac.ke", "short")).unwrap_err();
        assert_eq!(code, ErrorCode::UserPasswordInvalid);
    }
}
