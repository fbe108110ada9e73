pub mod download;
pub mod list;
pub mod review;
pub mod submit;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::papers::requests::{PaperListParams, ReviewPaperRequest, SubmitPaperRequest};
use crate::storage::Storage;

pub struct PaperService {
    storage: Option<Arc<dyn Storage>>,
}

impl PaperService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    // 用户提交试卷，进入待审核
    pub async fn submit_paper(
        &self,
        req: SubmitPaperRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        submit::submit_paper(self, req, request, false).await
    }

    // 管理员上传，直接通过
    pub async fn admin_upload_paper(
        &self,
        req: SubmitPaperRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        submit::submit_paper(self, req, request, true).await
    }

    pub async fn list_papers(
        &self,
        params: PaperListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_papers(self, params, request).await
    }

    // 按年级分组
    pub async fn papers_by_year(
        &self,
        params: PaperListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::papers_by_year(self, params, request).await
    }

    pub async fn get_paper(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::get_paper(self, id, request).await
    }

    pub async fn my_submissions(
        &self,
        params: PaperListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::my_submissions(self, params, request).await
    }

    pub async fn review_paper(
        &self,
        id: i64,
        req: ReviewPaperRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        review::review_paper(self, id, req, request).await
    }

    pub async fn delete_paper(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        review::delete_paper(self, id, request).await
    }

    pub async fn download_paper(
        &self,
        id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        download::download_paper(self, id, request).await
    }
}
