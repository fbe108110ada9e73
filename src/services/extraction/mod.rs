pub mod text;

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::cache::{CacheResult, ObjectCache, paper_text_cache_key};
use crate::config::AppConfig;
use crate::errors::{PaperHubError, Result};
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse, ErrorCode, chat::responses::ExtractTextResponse,
    papers::entities::{PaperStatus, PaperText, PaperWithCourse},
};
use crate::services::files::{multipart::read_single_file, read_stored_file};
use crate::services::{cache_from_request, error_response, system::DynamicConfig};
use crate::storage::Storage;

pub struct ExtractionService {
    storage: Option<Arc<dyn Storage>>,
}

impl ExtractionService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    /// 已入库试卷的文本
    pub async fn extract_paper(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;

        let paper = match load_readable_paper(&storage, id, request).await {
            Ok(paper) => paper,
            Err(e) => return Ok(error_response(&e, ErrorCode::PaperNotFound)),
        };

        let cache = cache_from_request(request);
        match paper_text(&storage, cache.as_deref(), &paper).await {
            Ok(PaperText { text, truncated }) => {
                Ok(HttpResponse::Ok().json(ApiResponse::success(
                    ExtractTextResponse {
                        paper_id: Some(paper.paper.id),
                        file_name: paper.paper.file_name,
                        char_count: text.chars().count() as i64,
                        text,
                        truncated,
                    },
                    "Text extracted successfully",
                )))
            }
            Err(e) => {
                tracing::warn!("Paper {} text extraction failed: {}", id, e);
                Ok(error_response(&e, ErrorCode::ExtractionFailed))
            }
        }
    }

    /// 临时上传的 PDF，只返回文本不入库
    pub async fn extract_upload(
        &self,
        mut payload: Multipart,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let max_size = DynamicConfig::upload_max_size().await;
        let allowed = vec![".pdf".to_string()];

        let received = match read_single_file(&mut payload, &allowed, max_size).await {
            Ok(file) => file,
            Err(rejection) => return Ok(rejection.into_response()),
        };

        let max_chars = AppConfig::get().ai.max_extract_chars;
        match text::extract_pdf_text_async(received.data, max_chars).await {
            Ok((text, truncated)) => {
                tracing::info!(
                    "User {:?} extracted {} ad-hoc",
                    RequireJWT::extract_user_id(request),
                    received.original_name
                );
                Ok(HttpResponse::Ok().json(ApiResponse::success(
                    ExtractTextResponse {
                        paper_id: None,
                        file_name: received.original_name,
                        char_count: text.chars().count() as i64,
                        text,
                        truncated,
                    },
                    "Text extracted successfully",
                )))
            }
            Err(e) => Ok(error_response(&e, ErrorCode::ExtractionFailed)),
        }
    }
}

/// 读取试卷，非管理员只能读已通过的
pub(crate) async fn load_readable_paper(
    storage: &Arc<dyn Storage>,
    id: i64,
    request: &HttpRequest,
) -> Result<PaperWithCourse> {
    let paper = storage
        .get_paper(id)
        .await?
        .ok_or_else(|| PaperHubError::not_found("Paper not found"))?;

    if paper.paper.status != PaperStatus::Approved && !RequireJWT::is_admin(request) {
        return Err(PaperHubError::not_found("Paper not found"));
    }
    Ok(paper)
}

/// 试卷文本：对象缓存 → 数据库列 → 重新提取
pub(crate) async fn paper_text(
    storage: &Arc<dyn Storage>,
    cache: Option<&dyn ObjectCache>,
    paper: &PaperWithCourse,
) -> Result<PaperText> {
    let id = paper.paper.id;
    let key = paper_text_cache_key(id);

    if let Some(cache) = cache
        && let CacheResult::Found(raw) = cache.get_raw(&key).await
    {
        match serde_json::from_str::<PaperText>(&raw) {
            Ok(text) => return Ok(text),
            Err(e) => tracing::warn!("Ignoring unreadable cached text for paper {}: {}", id, e),
        }
    }

    if let Some(text) = storage.get_paper_text(id).await? {
        cache_paper_text(cache, key, &text).await;
        return Ok(text);
    }

    let file = storage
        .get_file_by_token(&paper.paper.file_token)
        .await?
        .ok_or_else(|| PaperHubError::not_found("Paper file not found"))?;
    let data = read_stored_file(&file)
        .await
        .map_err(|e| PaperHubError::file_operation(format!("读取 {} 失败: {e}", file.stored_name)))?;

    let (text, truncated) =
        text::extract_pdf_text_async(data, AppConfig::get().ai.max_extract_chars).await?;
    tracing::info!(
        "Extracted {} chars from paper {}{}",
        text.chars().count(),
        id,
        if truncated { " (truncated)" } else { "" }
    );

    let text = PaperText { text, truncated };
    storage.set_paper_text(id, &text).await?;
    cache_paper_text(cache, key, &text).await;
    Ok(text)
}

async fn cache_paper_text(cache: Option<&dyn ObjectCache>, key: String, text: &PaperText) {
    let Some(cache) = cache else {
        return;
    };
    match serde_json::to_string(text) {
        Ok(raw) => cache.insert_raw(key, raw, 0).await,
        Err(e) => tracing::warn!("序列化试卷文本失败: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::object_cache::moka::MokaCacheWrapper;
    use crate::config::DatabaseConfig;
    use crate::models::catalog::entities::CourseSummary;
    use crate::models::papers::entities::{ExamType, Paper};
    use crate::storage::sea_orm_storage::SeaOrmStorage;

    async fn empty_storage() -> Arc<dyn Storage> {
        let storage = SeaOrmStorage::connect(&DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            pool_size: 1,
            timeout: 5,
        })
        .await
        .expect("in-memory database");
        Arc::new(storage)
    }

    fn paper() -> PaperWithCourse {
        let now = chrono::Utc::now();
        PaperWithCourse {
            paper: Paper {
                id: 41,
                title: "Rural Sociology".to_string(),
                course_id: "course-agec-101".to_string(),
                year: 1,
                exam_type: ExamType::EndSemester,
                academic_year: "2023/2024".to_string(),
                semester: 2,
                file_token: "missing-token".to_string(),
                file_name: "agec101.pdf".to_string(),
                download_count: 0,
                status: PaperStatus::Approved,
                uploaded_by: 1,
                reviewed_by: None,
                reviewed_at: None,
                review_notes: None,
                created_at: now,
                updated_at: now,
            },
            course: CourseSummary {
                id: "course-agec-101".to_string(),
                code: "AGEC 101".to_string(),
                name: "Introduction to Agricultural Economics".to_string(),
                department_id: "d".to_string(),
                department_name: "Agricultural Economics".to_string(),
                school_id: "s".to_string(),
                school_name: "Agriculture".to_string(),
            },
        }
    }

    #[tokio::test]
    async fn test_cached_text_keeps_truncation_flag() {
        let storage = empty_storage().await;
        let moka = MokaCacheWrapper::with_capacity(100, 60);
        let cache: &dyn ObjectCache = &moka;
        let cached = PaperText {
            text: "Question 1".to_string(),
            truncated: true,
        };
        cache_paper_text(Some(cache), paper_text_cache_key(41), &cached).await;

        let text = paper_text(&storage, Some(cache), &paper()).await.unwrap();
        assert_eq!(text, cached);
    }

    #[tokio::test]
    async fn test_unreadable_cache_entry_falls_through() {
        let storage = empty_storage().await;
        let moka = MokaCacheWrapper::with_capacity(100, 60);
        let cache: &dyn ObjectCache = &moka;
        cache
            .insert_raw(paper_text_cache_key(41), "Question 1".to_string(), 0)
            .await;

        // 缓存无法解析时回到数据库和文件，文件不存在
        let err = paper_text(&storage, Some(cache), &paper()).await.unwrap_err();
        assert!(matches!(err, PaperHubError::NotFound(_)));
    }
}
