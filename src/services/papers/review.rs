use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::PaperService;
use crate::cache::paper_text_cache_key;
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, ErrorCode, papers::requests::ReviewPaperRequest};
use crate::services::{cache_from_request, error_response};

pub async fn review_paper(
    service: &PaperService,
    id: i64,
    req: ReviewPaperRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(reviewer_id) = RequireJWT::extract_user_id(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Authentication required",
        )));
    };

    if !req.status.is_review_outcome() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::PaperReviewInvalid,
            "Review status must be approved or rejected",
        )));
    }

    let notes = req
        .notes
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty());

    let storage = service.get_storage(request)?;
    match storage
        .review_paper(id, req.status, reviewer_id, notes)
        .await
    {
        Ok(Some(paper)) => {
            tracing::info!("Paper {} reviewed as {} by {}", id, paper.status, reviewer_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(paper, "Paper reviewed")))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::PaperNotFound,
            "Paper not found",
        ))),
        Err(e) => Ok(error_response(&e, ErrorCode::PaperReviewInvalid)),
    }
}

pub async fn delete_paper(
    service: &PaperService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.delete_paper(id).await {
        Ok(true) => {
            if let Some(cache) = cache_from_request(request) {
                cache.remove(&paper_text_cache_key(id)).await;
            }
            tracing::info!("Paper {} deleted", id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Paper deleted")))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::PaperNotFound,
            "Paper not found",
        ))),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}
