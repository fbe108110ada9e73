//! 系统设置存储实现

use sea_orm::{ActiveModelTrait, EntityTrait, Order, QueryOrder, Set};

use crate::entity::prelude::SystemSettings;
use crate::entity::system_settings::{ActiveModel, Column};
use crate::errors::{PaperHubError, Result};
use crate::models::system::entities::SystemSetting;

use super::SeaOrmStorage;

impl SeaOrmStorage {
    /// 获取所有设置
    pub(crate) async fn list_all_settings_impl(&self) -> Result<Vec<SystemSetting>> {
        let settings = SystemSettings::find()
            .order_by(Column::Key, Order::Asc)
            .all(&self.db)
            .await
            .map_err(|e| PaperHubError::database_operation(format!("获取设置列表失败: {e}")))?;

        Ok(settings.into_iter().map(|s| s.into_setting()).collect())
    }

    /// 通过 key 获取设置
    pub(crate) async fn get_setting_by_key_impl(&self, key: &str) -> Result<Option<SystemSetting>> {
        let setting = SystemSettings::find_by_id(key.to_string())
            .one(&self.db)
            .await
            .map_err(|e| PaperHubError::database_operation(format!("获取设置失败: {e}")))?;

        Ok(setting.map(|s| s.into_setting()))
    }

    /// 更新设置，记录修改人
    pub(crate) async fn update_setting_impl(
        &self,
        key: &str,
        value: &str,
        user_id: i64,
    ) -> Result<SystemSetting> {
        let existing = SystemSettings::find_by_id(key.to_string())
            .one(&self.db)
            .await
            .map_err(|e| PaperHubError::database_operation(format!("获取设置失败: {e}")))?
            .ok_or_else(|| PaperHubError::not_found(format!("配置项不存在: {key}")))?;

        let mut active_model: ActiveModel = existing.into();
        active_model.value = Set(value.to_string());
        active_model.updated_at = Set(chrono::Utc::now().timestamp());
        active_model.updated_by = Set(Some(user_id));

        let updated = active_model
            .update(&self.db)
            .await
            .map_err(|e| PaperHubError::database_operation(format!("更新设置失败: {e}")))?;

        Ok(updated.into_setting())
    }
}
