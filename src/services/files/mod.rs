pub mod multipart;
pub mod upload;

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::models::files::entities::File;
use crate::storage::Storage;

pub struct FileService {
    storage: Option<Arc<dyn Storage>>,
}

impl FileService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    // 上传试卷 PDF
    pub async fn handle_upload(
        &self,
        request: &HttpRequest,
        payload: Multipart,
    ) -> ActixResult<HttpResponse> {
        upload::handle_upload(self, request, payload).await
    }
}

/// 已上传文件在磁盘上的路径
pub(crate) fn stored_file_path(file: &File) -> PathBuf {
    PathBuf::from(&AppConfig::get().upload.dir).join(&file.stored_name)
}

/// 读取已上传文件的全部内容
pub(crate) async fn read_stored_file(file: &File) -> std::io::Result<Vec<u8>> {
    tokio::fs::read(stored_file_path(file)).await
}
