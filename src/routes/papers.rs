use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RateLimit};
use crate::models::papers::requests::{PaperListParams, ReviewPaperRequest, SubmitPaperRequest};
use crate::models::users::entities::UserRole;
use crate::services::{ExtractionService, PaperService};
use crate::utils::SafeIDI64;

// 懒加载的全局 PaperService 实例
static PAPER_SERVICE: Lazy<PaperService> = Lazy::new(PaperService::new_lazy);
static EXTRACTION_SERVICE: Lazy<ExtractionService> = Lazy::new(ExtractionService::new_lazy);

pub async fn list_papers(
    req: HttpRequest,
    query: web::Query<PaperListParams>,
) -> ActixResult<HttpResponse> {
    PAPER_SERVICE.list_papers(query.into_inner(), &req).await
}

pub async fn papers_by_year(
    req: HttpRequest,
    query: web::Query<PaperListParams>,
) -> ActixResult<HttpResponse> {
    PAPER_SERVICE.papers_by_year(query.into_inner(), &req).await
}

pub async fn my_submissions(
    req: HttpRequest,
    query: web::Query<PaperListParams>,
) -> ActixResult<HttpResponse> {
    PAPER_SERVICE.my_submissions(query.into_inner(), &req).await
}

pub async fn submit_paper(
    req: HttpRequest,
    body: web::Json<SubmitPaperRequest>,
) -> ActixResult<HttpResponse> {
    PAPER_SERVICE.submit_paper(body.into_inner(), &req).await
}

pub async fn get_paper(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    PAPER_SERVICE.get_paper(id.0, &req).await
}

pub async fn download_paper(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    PAPER_SERVICE.download_paper(id.0, &req).await
}

pub async fn paper_text(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    EXTRACTION_SERVICE.extract_paper(id.0, &req).await
}

pub async fn admin_upload_paper(
    req: HttpRequest,
    body: web::Json<SubmitPaperRequest>,
) -> ActixResult<HttpResponse> {
    PAPER_SERVICE.admin_upload_paper(body.into_inner(), &req).await
}

pub async fn review_paper(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<ReviewPaperRequest>,
) -> ActixResult<HttpResponse> {
    PAPER_SERVICE
        .review_paper(id.0, body.into_inner(), &req)
        .await
}

pub async fn delete_paper(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    PAPER_SERVICE.delete_paper(id.0, &req).await
}

// 配置路由
pub fn configure_paper_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/papers")
            .wrap(RateLimit::api())
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_papers))
            .route("", web::post().to(submit_paper))
            .route("/by-year", web::get().to(papers_by_year))
            .route("/mine", web::get().to(my_submissions))
            .service(
                web::scope("/admin")
                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles()))
                    .route("", web::post().to(admin_upload_paper))
                    .route("/{id}/review", web::put().to(review_paper))
                    .route("/{id}", web::delete().to(delete_paper)),
            )
            .route("/{id}", web::get().to(get_paper))
            // 下载与全文需要已付费
            .service(
                web::resource("/{id}/download")
                    .wrap(middlewares::RequireAccess)
                    .route(web::get().to(download_paper)),
            )
            .service(
                web::resource("/{id}/text")
                    .wrap(middlewares::RequireAccess)
                    .route(web::get().to(paper_text)),
            ),
    );
}
