pub mod client;
pub mod prompt;
pub mod sse;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use futures_util::TryStreamExt;
use once_cell::sync::OnceCell;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::errors::Result;
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse, ErrorCode,
    chat::{requests::ChatRequest, responses::ChatReply},
};
use crate::services::extraction::{load_readable_paper, paper_text};
use crate::services::{cache_from_request, error_response, system::DynamicConfig};
use crate::storage::Storage;
use client::ChatClient;

const UPLOADED_PAPER_TITLE: &str = "Uploaded paper";

pub struct ChatService {
    storage: Option<Arc<dyn Storage>>,
    client: OnceCell<ChatClient>,
}

impl ChatService {
    pub fn new_lazy() -> Self {
        Self {
            storage: None,
            client: OnceCell::new(),
        }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    fn client(&self) -> Result<&ChatClient> {
        self.client
            .get_or_try_init(|| ChatClient::new(&AppConfig::get().ai))
    }

    /// 就一份试卷提问；默认以纯文本流返回
    pub async fn chat(&self, req: ChatRequest, request: &HttpRequest) -> ActixResult<HttpResponse> {
        if let Err(msg) = req.validate() {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::ChatRequestInvalid,
                msg,
            )));
        }

        if !AppConfig::get().ai_configured() {
            return Ok(
                HttpResponse::ServiceUnavailable().json(ApiResponse::error_empty(
                    ErrorCode::ChatUnavailable,
                    "AI assistant is not configured",
                )),
            );
        }

        // 试卷上下文
        let (title, course_label, text) = match req.paper_id {
            Some(id) => {
                let storage = self.get_storage(request)?;
                let paper = match load_readable_paper(&storage, id, request).await {
                    Ok(paper) => paper,
                    Err(e) => return Ok(error_response(&e, ErrorCode::PaperNotFound)),
                };
                let cache = cache_from_request(request);
                let text = match paper_text(&storage, cache.as_deref(), &paper).await {
                    Ok(paper_text) => paper_text.text,
                    Err(e) => return Ok(error_response(&e, ErrorCode::ExtractionFailed)),
                };
                (paper.paper.title, Some(paper.course.label()), text)
            }
            None => (
                req.paper_title
                    .as_deref()
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .unwrap_or(UPLOADED_PAPER_TITLE)
                    .to_string(),
                None,
                req.paper_text.clone().unwrap_or_default(),
            ),
        };

        let max_chars = DynamicConfig::max_context_chars().await;
        let system = prompt::build_system_prompt(&title, course_label.as_deref(), &text, max_chars);

        let client = match self.client() {
            Ok(client) => client,
            Err(e) => return Ok(error_response(&e, ErrorCode::ChatFailed)),
        };

        tracing::info!(
            "User {:?} chatting about '{}' ({} messages)",
            RequireJWT::extract_user_id(request),
            title,
            req.messages.len()
        );

        if !req.stream {
            return match client.complete(&system, &req.messages).await {
                Ok(content) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                    ChatReply {
                        content,
                        model: client.model().to_string(),
                    },
                    "Reply generated",
                ))),
                Err(e) => {
                    tracing::warn!("AI completion failed: {}", e);
                    Ok(error_response(&e, ErrorCode::ChatFailed))
                }
            };
        }

        match client.stream(&system, &req.messages).await {
            Ok(stream) => Ok(HttpResponse::Ok()
                .content_type("text/plain; charset=utf-8")
                .insert_header(("Cache-Control", "no-cache"))
                .streaming(stream.inspect_err(|e| tracing::warn!("{}", e)))),
            Err(e) => {
                tracing::warn!("AI stream failed: {}", e);
                Ok(error_response(&e, ErrorCode::ChatFailed))
            }
        }
    }
}
