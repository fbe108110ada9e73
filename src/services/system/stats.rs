use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SystemService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::error_response;

/// 管理后台统计
pub async fn get_stats(service: &SystemService, req: &HttpRequest) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(req)?;

    match storage.admin_stats(chrono::Utc::now().timestamp()).await {
        Ok(stats) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            stats,
            "Statistics retrieved successfully",
        ))),
        Err(e) => {
            tracing::error!("获取统计信息失败: {}", e);
            Ok(error_response(&e, ErrorCode::InternalServerError))
        }
    }
}
