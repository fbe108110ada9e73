use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::PaperService;
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse, ErrorCode,
    papers::{
        entities::PaperStatus,
        requests::{CreatePaperRecord, SubmitPaperRequest},
    },
};
use crate::services::error_response;

const ADMIN_UPLOAD_NOTES: &str = "Auto-approved: Admin upload";

pub async fn submit_paper(
    service: &PaperService,
    req: SubmitPaperRequest,
    request: &HttpRequest,
    admin_upload: bool,
) -> ActixResult<HttpResponse> {
    let Some(user_id) = RequireJWT::extract_user_id(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Authentication required",
        )));
    };

    if let Err(msg) = req.validate() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::PaperInvalid,
            msg,
        )));
    }

    let storage = service.get_storage(request)?;

    match storage.get_course(req.course_id.trim()).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::PaperInvalid,
                "Course not found",
            )));
        }
        Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
    }

    // 文件必须存在且属于提交者
    let file = match storage.get_file_by_token(req.file_token.trim()).await {
        Ok(Some(file)) if file.user_id == user_id => file,
        Ok(_) => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::FileNotFound,
                "Uploaded file not found",
            )));
        }
        Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
    };

    let record = CreatePaperRecord {
        title: req.title.trim().to_string(),
        course_id: req.course_id.trim().to_string(),
        year: req.year,
        exam_type: req.exam_type,
        academic_year: req.academic_year.trim().to_string(),
        semester: req.semester,
        file_token: file.download_token,
        file_name: file.original_name,
        uploaded_by: user_id,
        status: if admin_upload {
            PaperStatus::Approved
        } else {
            PaperStatus::Pending
        },
        reviewed_by: admin_upload.then_some(user_id),
        review_notes: admin_upload.then(|| ADMIN_UPLOAD_NOTES.to_string()),
    };

    match storage.create_paper(record).await {
        Ok(paper) => {
            tracing::info!(
                "Paper {} submitted by user {} ({})",
                paper.id,
                user_id,
                paper.status
            );
            let message = if admin_upload {
                "Paper uploaded and approved"
            } else {
                "Paper submitted for review"
            };
            Ok(HttpResponse::Created().json(ApiResponse::success(paper, message)))
        }
        Err(e) => {
            tracing::error!("创建试卷失败: {}", e);
            Ok(error_response(&e, ErrorCode::InternalServerError))
        }
    }
}
