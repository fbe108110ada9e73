use serde::Serialize;
use ts_rs::TS;

use super::entities::SystemSetting;

/// 公开的站点配置
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/system.ts")]
pub struct SystemSettingsResponse {
    pub system_name: String,
    pub max_file_size: u64,
    pub allowed_file_types: Vec<String>,
    pub payment_amount: f64,
    pub currency: String,
    pub access_period_days: i64,
    pub payments_enabled: bool,
    pub chat_enabled: bool,
    pub environment: String,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/system.ts")]
pub struct AdminSettingsListResponse {
    pub settings: Vec<SystemSetting>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/system.ts")]
pub struct SettingResponse {
    pub setting: SystemSetting,
}

/// 管理后台统计
#[derive(Debug, Clone, Default, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/system.ts")]
pub struct AdminStatsResponse {
    pub total_papers: i64,
    pub pending_papers: i64,
    pub approved_papers: i64,
    pub rejected_papers: i64,
    pub total_downloads: i64,
    pub total_users: i64,
    pub total_payments: i64,
    pub completed_payments: i64,
    /// 已完成且未过期
    pub active_subscriptions: i64,
    pub total_revenue: f64,
}
