//! 系统设置实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "system_settings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub key: String,
    pub value: String,
    pub value_type: String,
    pub description: Option<String>,
    pub updated_at: i64,
    pub updated_by: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_setting(self) -> crate::models::system::entities::SystemSetting {
        use crate::models::system::entities::{KnownSettingKey, SettingValueType, SystemSetting};

        // 已知键以代码中声明的类型为准
        let value_type = match self.key.parse::<KnownSettingKey>() {
            Ok(known) => known.value_type(),
            Err(_) => self
                .value_type
                .parse::<SettingValueType>()
                .unwrap_or(SettingValueType::String),
        };

        SystemSetting {
            key: self.key,
            value: self.value,
            value_type,
            description: self.description,
            updated_at: super::from_unix(self.updated_at),
            updated_by: self.updated_by,
        }
    }
}
