use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::PaperService;
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse, ErrorCode,
    papers::{
        entities::{PaperStatus, PaperWithCourse},
        requests::{PaperFilter, PaperListParams},
        responses::{PaperResponse, PapersByYearResponse, YearBucket},
    },
};
use crate::services::error_response;

pub async fn list_papers(
    service: &PaperService,
    params: PaperListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let filter = PaperFilter::from_params(&params, RequireJWT::is_admin(request));
    query_page(service, filter, &params, request).await
}

pub async fn my_submissions(
    service: &PaperService,
    params: PaperListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(user_id) = RequireJWT::extract_user_id(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Authentication required",
        )));
    };

    // 自己的提交不限状态
    let mut filter = PaperFilter::from_params(&params, true);
    filter.uploaded_by = Some(user_id);
    query_page(service, filter, &params, request).await
}

async fn query_page(
    service: &PaperService,
    filter: PaperFilter,
    params: &PaperListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let (page, size) = params.pagination().normalized();

    match storage.list_papers(&filter, page, size).await
    {
        Ok(resp) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            resp,
            "Papers retrieved successfully",
        ))),
        Err(e) => {
            tracing::error!("查询试卷失败: {}", e);
            Ok(error_response(&e, ErrorCode::InternalServerError))
        }
    }
}

/// 每个年级单独分页查询，`page` / `size` 作用于每个分组
pub async fn papers_by_year(
    service: &PaperService,
    params: PaperListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let filter = PaperFilter::from_params(&params, RequireJWT::is_admin(request));
    let (page, size) = params.pagination().normalized();

    let mut years = Vec::with_capacity(4);
    for year in PapersByYearResponse::YEARS {
        if filter.year.is_some_and(|y| y != year) {
            years.push(YearBucket::empty(year));
            continue;
        }

        let mut bucket_filter = filter.clone();
        bucket_filter.year = Some(year);
        match storage.list_papers(&bucket_filter, page, size).await {
            Ok(resp) => years.push(YearBucket::from_page(year, resp)),
            Err(e) => {
                tracing::error!("按年级查询试卷失败: {}", e);
                return Ok(error_response(&e, ErrorCode::InternalServerError));
            }
        }
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        PapersByYearResponse::from_buckets(years),
        "Papers retrieved successfully",
    )))
}

/// 非管理员只能看到已通过的试卷或自己的提交
pub(crate) fn can_view(paper: &PaperWithCourse, user_id: Option<i64>, is_admin: bool) -> bool {
    is_admin
        || paper.paper.status == PaperStatus::Approved
        || user_id.is_some_and(|id| id == paper.paper.uploaded_by)
}

pub async fn get_paper(
    service: &PaperService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let paper = match storage.get_paper(id).await {
        Ok(Some(paper)) => paper,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::PaperNotFound,
                "Paper not found",
            )));
        }
        Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
    };

    if !can_view(
        &paper,
        RequireJWT::extract_user_id(request),
        RequireJWT::is_admin(request),
    ) {
        // 不暴露未审核试卷的存在
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::PaperNotFound,
            "Paper not found",
        )));
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        PaperResponse { paper },
        "Paper retrieved successfully",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::catalog::entities::CourseSummary;
    use crate::models::papers::entities::{ExamType, Paper};

    fn paper(status: PaperStatus, uploaded_by: i64) -> PaperWithCourse {
        let now = chrono::Utc::now();
        PaperWithCourse {
            paper: Paper {
                id: 1,
                title: "Farm Management".to_string(),
                course_id: "course-agec-201".to_string(),
                year: 2,
                exam_type: ExamType::Cat,
                academic_year: "2022/2023".to_string(),
                semester: 1,
                file_token: "t".to_string(),
                file_name: "agec201.pdf".to_string(),
                download_count: 0,
                status,
                uploaded_by,
                reviewed_by: None,
                reviewed_at: None,
                review_notes: None,
                created_at: now,
                updated_at: now,
            },
            course: CourseSummary {
                id: "course-agec-201".to_string(),
                code: "AGEC 201".to_string(),
                name: "Farm Management".to_string(),
                department_id: "d".to_string(),
                department_name: "Agricultural Economics".to_string(),
                school_id: "s".to_string(),
                school_name: "Agriculture".to_string(),
            },
        }
    }

    #[test]
    fn test_visibility_rules() {
        assert!(can_view(&paper(PaperStatus::Approved, 7), None, false));
        assert!(!can_view(&paper(PaperStatus::Pending, 7), Some(8), false));
        assert!(can_view(&paper(PaperStatus::Pending, 7), Some(7), false));
        assert!(can_view(&paper(PaperStatus::Rejected, 7), Some(8), true));
    }
}
