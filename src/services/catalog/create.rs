use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CatalogService;
use crate::cache::CATALOG_CACHE_KEY;
use crate::errors::PaperHubError;
use crate::models::{
    ApiResponse, ErrorCode,
    catalog::requests::{CreateCourseRequest, CreateDepartmentRequest, CreateSchoolRequest},
};
use crate::services::{cache_from_request, error_response};

fn required(value: &str, field: &str) -> Result<(), HttpResponse> {
    if value.trim().is_empty() || value.chars().count() > 200 {
        return Err(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            format!("{field} must be 1-200 characters"),
        )));
    }
    Ok(())
}

fn creation_error(e: &PaperHubError) -> HttpResponse {
    match e {
        PaperHubError::Conflict(_) => error_response(e, ErrorCode::CatalogAlreadyExists),
        PaperHubError::NotFound(_) => error_response(e, ErrorCode::CatalogNotFound),
        _ => error_response(e, ErrorCode::InternalServerError),
    }
}

async fn invalidate_catalog(request: &HttpRequest) {
    if let Some(cache) = cache_from_request(request) {
        cache.remove(CATALOG_CACHE_KEY).await;
    }
}

pub async fn create_school(
    service: &CatalogService,
    req: CreateSchoolRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Err(resp) = required(&req.name, "name") {
        return Ok(resp);
    }
    let storage = service.get_storage(request)?;

    match storage.create_school(&req.name).await {
        Ok(school) => {
            invalidate_catalog(request).await;
            Ok(HttpResponse::Created().json(ApiResponse::success(school, "School created")))
        }
        Err(e) => Ok(creation_error(&e)),
    }
}

pub async fn create_department(
    service: &CatalogService,
    req: CreateDepartmentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Err(resp) = required(&req.name, "name") {
        return Ok(resp);
    }
    let storage = service.get_storage(request)?;

    match storage.get_school(&req.school_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::CatalogNotFound,
                "School not found",
            )));
        }
        Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
    }

    match storage.create_department(&req.school_id, &req.name).await {
        Ok(department) => {
            invalidate_catalog(request).await;
            Ok(HttpResponse::Created().json(ApiResponse::success(
                department,
                "Department created",
            )))
        }
        Err(e) => Ok(creation_error(&e)),
    }
}

pub async fn create_course(
    service: &CatalogService,
    req: CreateCourseRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Err(resp) = required(&req.code, "code").and_then(|_| required(&req.name, "name")) {
        return Ok(resp);
    }
    let storage = service.get_storage(request)?;

    match storage.get_department(&req.department_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::CatalogNotFound,
                "Department not found",
            )));
        }
        Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
    }

    match storage
        .create_course(&req.department_id, &req.code, &req.name)
        .await
    {
        Ok(course) => {
            invalidate_catalog(request).await;
            Ok(HttpResponse::Created().json(ApiResponse::success(course, "Course created")))
        }
        Err(e) => Ok(creation_error(&e)),
    }
}
