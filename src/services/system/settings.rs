use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{DynamicConfig, SystemService};
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse, ErrorCode,
    system::{
        entities::KnownSettingKey,
        requests::UpdateSettingRequest,
        responses::{AdminSettingsListResponse, SettingResponse, SystemSettingsResponse},
    },
};
use crate::services::error_response;

/// 获取公开系统设置（只读）
pub async fn get_settings(
    service: &SystemService,
    _req: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let config = service.get_config();

    let response = SystemSettingsResponse {
        system_name: DynamicConfig::system_name().await,
        max_file_size: DynamicConfig::upload_max_size().await as u64,
        allowed_file_types: DynamicConfig::upload_allowed_types().await,
        payment_amount: DynamicConfig::payment_amount().await,
        currency: DynamicConfig::payment_currency().await,
        access_period_days: DynamicConfig::access_period_days().await,
        payments_enabled: config.mpesa_configured(),
        chat_enabled: config.ai_configured(),
        environment: config.app.environment.clone(),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        response,
        "Settings retrieved successfully",
    )))
}

/// 获取所有可编辑配置
pub async fn get_admin_settings(
    service: &SystemService,
    req: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(req)?;

    match storage.list_all_settings().await {
        Ok(settings) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            AdminSettingsListResponse { settings },
            "Admin settings retrieved successfully",
        ))),
        Err(e) => {
            tracing::error!("获取配置列表失败: {}", e);
            Ok(error_response(&e, ErrorCode::InternalServerError))
        }
    }
}

/// 更新单个配置，值按键的类型校验
pub async fn update_setting(
    service: &SystemService,
    req: &HttpRequest,
    key: String,
    update: UpdateSettingRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(req)?;

    let Some(user_id) = RequireJWT::extract_user_id(req) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Authentication required",
        )));
    };

    let known = match key.parse::<KnownSettingKey>() {
        Ok(known) => known,
        Err(_) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::NotFound,
                format!("Unknown setting: {key}"),
            )));
        }
    };

    let value = update.value.trim().to_string();
    if let Err(msg) = known.validate_value(&value) {
        return Ok(
            HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, msg))
        );
    }

    let setting = match storage.update_setting(&key, &value, user_id).await {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("更新配置失败: {}", e);
            return Ok(error_response(&e, ErrorCode::InternalServerError));
        }
    };

    DynamicConfig::update(&key, &value).await;
    tracing::info!("Setting {} updated by user {}", key, user_id);

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        SettingResponse { setting },
        "Setting updated successfully",
    )))
}
