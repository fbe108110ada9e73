use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CatalogService;
use crate::cache::{CATALOG_CACHE_KEY, CacheResult};
use crate::models::{
    ApiResponse, ErrorCode,
    catalog::{
        requests::CourseListParams,
        responses::{CatalogResponse, CourseListResponse},
    },
};
use crate::services::{cache_from_request, error_response};

/// 目录树，先读缓存
pub async fn get_catalog(
    service: &CatalogService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let cache = cache_from_request(request);

    if let Some(ref cache) = cache
        && let CacheResult::Found(json) = cache.get_raw(CATALOG_CACHE_KEY).await
    {
        match serde_json::from_str::<CatalogResponse>(&json) {
            Ok(catalog) => {
                return Ok(HttpResponse::Ok().json(ApiResponse::success(
                    catalog,
                    "Catalog retrieved successfully",
                )));
            }
            Err(_) => cache.remove(CATALOG_CACHE_KEY).await,
        }
    }

    let storage = service.get_storage(request)?;
    let loaded = async {
        let schools = storage.list_schools().await?;
        let departments = storage.list_departments(None).await?;
        let courses = storage.list_all_courses().await?;
        Ok::<_, crate::errors::PaperHubError>(CatalogResponse::build(
            schools,
            departments,
            courses,
        ))
    }
    .await;

    match loaded {
        Ok(catalog) => {
            if let Some(cache) = cache
                && let Ok(json) = serde_json::to_string(&catalog)
            {
                cache.insert_raw(CATALOG_CACHE_KEY.to_string(), json, 0).await;
            }
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                catalog,
                "Catalog retrieved successfully",
            )))
        }
        Err(e) => {
            tracing::error!("加载目录失败: {}", e);
            Ok(error_response(&e, ErrorCode::InternalServerError))
        }
    }
}

pub async fn list_courses(
    service: &CatalogService,
    params: CourseListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.list_courses(&params).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            CourseListResponse { items },
            "Courses retrieved successfully",
        ))),
        Err(e) => {
            tracing::error!("查询课程失败: {}", e);
            Ok(error_response(&e, ErrorCode::InternalServerError))
        }
    }
}

pub async fn get_course(
    service: &CatalogService,
    id: String,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.get_course(&id).await {
        Ok(Some(course)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            course,
            "Course retrieved successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::CatalogNotFound,
            "Course not found",
        ))),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}
