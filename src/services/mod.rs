pub mod auth;
pub mod catalog;
pub mod chat;
pub mod extraction;
pub mod files;
pub mod papers;
pub mod payments;
pub mod system;
pub mod users;

pub use auth::AuthService;
pub use catalog::CatalogService;
pub use chat::ChatService;
pub use extraction::ExtractionService;
pub use files::FileService;
pub use papers::PaperService;
pub use payments::PaymentService;
pub use system::SystemService;
pub use users::UserService;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, error, web};
use std::sync::Arc;

use crate::cache::ObjectCache;
use crate::errors::PaperHubError;
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

/// 从 app data 取存储实例
pub(crate) fn storage_from_request(request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
    request
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| error::ErrorInternalServerError("Storage not found in app data"))
}

/// 从 app data 取对象缓存（未注册时为 None）
pub(crate) fn cache_from_request(request: &HttpRequest) -> Option<Arc<dyn ObjectCache>> {
    request
        .app_data::<web::Data<Arc<dyn ObjectCache>>>()
        .map(|data| data.get_ref().clone())
}

/// 领域错误转 HTTP 响应；`code` 用于非特定的服务端错误
pub(crate) fn error_response(err: &PaperHubError, code: ErrorCode) -> HttpResponse {
    let (mut builder, code) = match err {
        PaperHubError::Validation(_) | PaperHubError::Extraction(_) => {
            (HttpResponse::BadRequest(), code)
        }
        PaperHubError::NotFound(_) => (HttpResponse::NotFound(), code),
        PaperHubError::Conflict(_) => (HttpResponse::Conflict(), code),
        PaperHubError::Authentication(_) => (HttpResponse::Unauthorized(), ErrorCode::Unauthorized),
        PaperHubError::Authorization(_) => (HttpResponse::Forbidden(), ErrorCode::Forbidden),
        PaperHubError::PaymentGateway(_) | PaperHubError::ExternalApi(_) => {
            (HttpResponse::BadGateway(), code)
        }
        _ => (
            HttpResponse::InternalServerError(),
            ErrorCode::InternalServerError,
        ),
    };
    builder.json(ApiResponse::error_empty(code, err.message()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn test_error_response_status() {
        let cases = [
            (PaperHubError::validation("x"), StatusCode::BAD_REQUEST),
            (PaperHubError::not_found("x"), StatusCode::NOT_FOUND),
            (PaperHubError::conflict("x"), StatusCode::CONFLICT),
            (PaperHubError::payment_gateway("x"), StatusCode::BAD_GATEWAY),
            (
                PaperHubError::database_operation("x"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(error_response(&err, ErrorCode::BadRequest).status(), status);
        }
    }
}
