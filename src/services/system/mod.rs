pub mod settings;
pub mod settings_cache;
pub mod stats;

pub use settings_cache::DynamicConfig;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::models::system::requests::UpdateSettingRequest;
use crate::storage::Storage;

pub struct SystemService {
    storage: Option<Arc<dyn Storage>>,
}

impl SystemService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    pub(crate) fn get_config(&self) -> &AppConfig {
        AppConfig::get()
    }

    // 公开设置
    pub async fn get_settings(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        settings::get_settings(self, request).await
    }

    // 管理员：全部可编辑设置
    pub async fn get_admin_settings(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        settings::get_admin_settings(self, request).await
    }

    // 管理员：更新设置
    pub async fn update_setting(
        &self,
        request: &HttpRequest,
        key: String,
        update: UpdateSettingRequest,
    ) -> ActixResult<HttpResponse> {
        settings::update_setting(self, request, key, update).await
    }

    // 管理员：仪表盘统计
    pub async fn get_stats(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        stats::get_stats(self, request).await
    }
}
