use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RateLimit};
use crate::models::chat::requests::ChatRequest;
use crate::services::{ChatService, ExtractionService};

// 懒加载的全局 ChatService 实例
static CHAT_SERVICE: Lazy<ChatService> = Lazy::new(ChatService::new_lazy);
static EXTRACTION_SERVICE: Lazy<ExtractionService> = Lazy::new(ExtractionService::new_lazy);

pub async fn chat(req: HttpRequest, body: web::Json<ChatRequest>) -> ActixResult<HttpResponse> {
    CHAT_SERVICE.chat(body.into_inner(), &req).await
}

pub async fn extract_upload(
    req: HttpRequest,
    payload: actix_multipart::Multipart,
) -> ActixResult<HttpResponse> {
    EXTRACTION_SERVICE.extract_upload(payload, &req).await
}

// 配置路由
pub fn configure_chat_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/chat")
            .wrap(RateLimit::chat())
            .wrap(middlewares::RequireAccess)
            .wrap(middlewares::RequireJWT)
            .route("", web::post().to(chat))
            .route("/extract", web::post().to(extract_upload)),
    );
}
