pub mod create;
pub mod list;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::catalog::requests::{
    CourseListParams, CreateCourseRequest, CreateDepartmentRequest, CreateSchoolRequest,
};
use crate::storage::Storage;

pub struct CatalogService {
    storage: Option<Arc<dyn Storage>>,
}

impl CatalogService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    // 学院 → 系 → 课程 树
    pub async fn get_catalog(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::get_catalog(self, request).await
    }

    // 课程平铺列表
    pub async fn list_courses(
        &self,
        params: CourseListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_courses(self, params, request).await
    }

    pub async fn get_course(&self, id: String, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::get_course(self, id, request).await
    }

    pub async fn create_school(
        &self,
        req: CreateSchoolRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_school(self, req, request).await
    }

    pub async fn create_department(
        &self,
        req: CreateDepartmentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_department(self, req, request).await
    }

    pub async fn create_course(
        &self,
        req: CreateCourseRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_course(self, req, request).await
    }
}
