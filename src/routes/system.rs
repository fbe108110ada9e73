use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, middleware, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::system::requests::UpdateSettingRequest;
use crate::models::users::entities::UserRole;
use crate::services::SystemService;
use crate::utils::SafeSettingKey;

// 懒加载的全局 SystemService 实例
static SYSTEM_SERVICE: Lazy<SystemService> = Lazy::new(SystemService::new_lazy);

pub async fn get_settings(request: HttpRequest) -> ActixResult<HttpResponse> {
    SYSTEM_SERVICE.get_settings(&request).await
}

pub async fn get_admin_settings(request: HttpRequest) -> ActixResult<HttpResponse> {
    SYSTEM_SERVICE.get_admin_settings(&request).await
}

pub async fn update_setting(
    request: HttpRequest,
    key: SafeSettingKey,
    body: web::Json<UpdateSettingRequest>,
) -> ActixResult<HttpResponse> {
    SYSTEM_SERVICE
        .update_setting(&request, key.0, body.into_inner())
        .await
}

pub async fn get_stats(request: HttpRequest) -> ActixResult<HttpResponse> {
    SYSTEM_SERVICE.get_stats(&request).await
}

// 配置路由
pub fn configure_system_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/system")
            .wrap(middleware::Compress::default())
            // 公开：系统名称、价格等
            .route("/settings", web::get().to(get_settings))
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles()))
                    .wrap(middlewares::RequireJWT)
                    .route("/settings/admin", web::get().to(get_admin_settings))
                    .route("/settings/{key}", web::put().to(update_setting))
                    .route("/stats", web::get().to(get_stats)),
            ),
    );
}
