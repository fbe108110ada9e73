use actix_web::{
    HttpRequest, HttpResponse, Result as ActixResult,
    http::header::{self, ContentDisposition},
};

use super::PaperService;
use crate::errors::PaperHubError;
use crate::models::{ApiResponse, ErrorCode, papers::entities::PaperStatus};
use crate::services::{error_response, files::read_stored_file};

/// 下载已通过的试卷，需已付费（路由上挂 RequireAccess）
pub async fn download_paper(
    service: &PaperService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let paper = match storage.get_paper(id).await {
        Ok(Some(paper)) => paper.paper,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::PaperNotFound,
                "Paper not found",
            )));
        }
        Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
    };

    if paper.status != PaperStatus::Approved {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::PaperNotApproved,
            "Paper is not available for download",
        )));
    }

    let file = match storage.get_file_by_token(&paper.file_token).await {
        Ok(Some(file)) => file,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::FileNotFound,
                "File not found",
            )));
        }
        Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
    };

    let data = match read_stored_file(&file).await {
        Ok(data) => data,
        Err(e) => {
            tracing::error!(
                "{}",
                PaperHubError::file_operation(format!("读取 {} 失败: {e}", file.stored_name))
            );
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::FileNotFound,
                "File not found",
            )));
        }
    };

    // 计数失败不影响下载
    if let Err(e) = storage.increment_download_count(id).await {
        tracing::warn!("更新下载次数失败: {}", e);
    }

    Ok(HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, file.file_type.clone()))
        .insert_header(ContentDisposition::attachment(paper.file_name))
        .body(data))
}
