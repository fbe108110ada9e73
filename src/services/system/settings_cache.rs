//! 动态配置缓存
//!
//! 启动时从 `system_settings` 表加载，管理员修改后热更新。
//! 未加载或值无法解析时回落到静态配置。

use std::collections::HashMap;
use std::sync::OnceLock;
use tokio::sync::RwLock;

use crate::config::AppConfig;
use crate::models::system::entities::KnownSettingKey;

static DYNAMIC_CONFIG: OnceLock<RwLock<DynamicConfigCache>> = OnceLock::new();

#[derive(Debug, Default)]
struct DynamicConfigCache {
    settings: HashMap<String, String>,
    initialized: bool,
}

/// 动态配置访问接口
pub struct DynamicConfig;

impl DynamicConfig {
    /// 用数据库中的全部设置初始化缓存
    pub async fn init(settings: Vec<(String, String)>) {
        let cache = DYNAMIC_CONFIG.get_or_init(|| RwLock::new(DynamicConfigCache::default()));

        let mut guard = cache.write().await;
        guard.settings = settings.into_iter().collect();
        guard.initialized = true;

        tracing::info!(
            "动态配置缓存初始化完成，加载了 {} 个配置项",
            guard.settings.len()
        );
    }

    /// 更新单个配置项
    pub async fn update(key: &str, value: &str) {
        if let Some(cache) = DYNAMIC_CONFIG.get() {
            let mut guard = cache.write().await;
            guard.settings.insert(key.to_string(), value.to_string());
            tracing::debug!("动态配置更新: {} = {}", key, value);
        }
    }

    async fn get_string(key: KnownSettingKey) -> Option<String> {
        let cache = DYNAMIC_CONFIG.get()?;
        let guard = cache.read().await;
        guard
            .settings
            .get(key.as_str())
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    async fn get_positive_i64(key: KnownSettingKey) -> Option<i64> {
        Self::get_string(key)
            .await
            .and_then(|v| v.parse::<i64>().ok())
            .filter(|v| *v > 0)
    }

    async fn get_json_array(key: KnownSettingKey) -> Option<Vec<String>> {
        Self::get_string(key)
            .await
            .and_then(|v| serde_json::from_str(&v).ok())
    }

    pub async fn system_name() -> String {
        Self::get_string(KnownSettingKey::SystemName)
            .await
            .unwrap_or_else(|| AppConfig::get().app.system_name.clone())
    }

    /// 每笔访问费金额
    pub async fn payment_amount() -> f64 {
        Self::get_positive_i64(KnownSettingKey::PaymentAmount)
            .await
            .map(|v| v as f64)
            .unwrap_or_else(|| AppConfig::get().mpesa.amount)
    }

    pub async fn payment_currency() -> String {
        Self::get_string(KnownSettingKey::PaymentCurrency)
            .await
            .unwrap_or_else(|| AppConfig::get().mpesa.currency.clone())
    }

    /// 一笔支付授予的访问天数
    pub async fn access_period_days() -> i64 {
        Self::get_positive_i64(KnownSettingKey::AccessPeriodDays)
            .await
            .unwrap_or_else(|| AppConfig::get().access.period_days)
    }

    /// 上传文件大小限制（字节）
    pub async fn upload_max_size() -> usize {
        Self::get_positive_i64(KnownSettingKey::UploadMaxSize)
            .await
            .map(|v| v as usize)
            .unwrap_or_else(|| AppConfig::get().upload.max_size)
    }

    /// 允许上传的扩展名（小写，带点）
    pub async fn upload_allowed_types() -> Vec<String> {
        Self::get_json_array(KnownSettingKey::UploadAllowedTypes)
            .await
            .unwrap_or_else(|| AppConfig::get().upload.allowed_types.clone())
            .into_iter()
            .map(|t| t.to_lowercase())
            .collect()
    }

    /// 发送给 AI 的试卷正文字符数上限
    pub async fn max_context_chars() -> usize {
        Self::get_positive_i64(KnownSettingKey::AiMaxContextChars)
            .await
            .map(|v| v as usize)
            .unwrap_or_else(|| AppConfig::get().ai.max_context_chars)
    }

    pub async fn is_initialized() -> bool {
        match DYNAMIC_CONFIG.get() {
            Some(cache) => cache.read().await.initialized,
            None => false,
        }
    }
}
