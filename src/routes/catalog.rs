use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::catalog::requests::{
    CourseListParams, CreateCourseRequest, CreateDepartmentRequest, CreateSchoolRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::CatalogService;
use crate::utils::SafeCatalogId;

// 懒加载的全局 CatalogService 实例
static CATALOG_SERVICE: Lazy<CatalogService> = Lazy::new(CatalogService::new_lazy);

pub async fn get_catalog(req: HttpRequest) -> ActixResult<HttpResponse> {
    CATALOG_SERVICE.get_catalog(&req).await
}

pub async fn list_courses(
    req: HttpRequest,
    query: web::Query<CourseListParams>,
) -> ActixResult<HttpResponse> {
    CATALOG_SERVICE.list_courses(query.into_inner(), &req).await
}

pub async fn get_course(req: HttpRequest, id: SafeCatalogId) -> ActixResult<HttpResponse> {
    CATALOG_SERVICE.get_course(id.0, &req).await
}

pub async fn create_school(
    req: HttpRequest,
    body: web::Json<CreateSchoolRequest>,
) -> ActixResult<HttpResponse> {
    CATALOG_SERVICE.create_school(body.into_inner(), &req).await
}

pub async fn create_department(
    req: HttpRequest,
    body: web::Json<CreateDepartmentRequest>,
) -> ActixResult<HttpResponse> {
    CATALOG_SERVICE.create_department(body.into_inner(), &req).await
}

pub async fn create_course(
    req: HttpRequest,
    body: web::Json<CreateCourseRequest>,
) -> ActixResult<HttpResponse> {
    CATALOG_SERVICE.create_course(body.into_inner(), &req).await
}

// 配置路由
pub fn configure_catalog_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/catalog")
            .route("", web::get().to(get_catalog))
            .route("/courses", web::get().to(list_courses))
            .route("/courses/{id}", web::get().to(get_course))
            .service(
                web::scope("/admin")
                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles()))
                    .wrap(middlewares::RequireJWT)
                    .route("/schools", web::post().to(create_school))
                    .route("/departments", web::post().to(create_department))
                    .route("/courses", web::post().to(create_course)),
            ),
    );
}
