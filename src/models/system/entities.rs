use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 配置值类型
#[derive(Debug, Clone, Serialize, PartialEq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/system.ts")]
pub enum SettingValueType {
    String,
    Integer,
    Boolean,
    JsonArray,
}

impl<'de> Deserialize<'de> for SettingValueType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match s.as_str() {
            "string" => Ok(SettingValueType::String),
            "integer" => Ok(SettingValueType::Integer),
            "boolean" => Ok(SettingValueType::Boolean),
            "json_array" => Ok(SettingValueType::JsonArray),
            _ => Err(serde::de::Error::custom(format!(
                "无效的配置值类型: '{s}'. 支持的类型: string, integer, boolean, json_array"
            ))),
        }
    }
}

impl std::fmt::Display for SettingValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettingValueType::String => write!(f, "string"),
            SettingValueType::Integer => write!(f, "integer"),
            SettingValueType::Boolean => write!(f, "boolean"),
            SettingValueType::JsonArray => write!(f, "json_array"),
        }
    }
}

impl std::str::FromStr for SettingValueType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(SettingValueType::String),
            "integer" => Ok(SettingValueType::Integer),
            "boolean" => Ok(SettingValueType::Boolean),
            "json_array" => Ok(SettingValueType::JsonArray),
            _ => Err(format!("Invalid setting value type: {s}")),
        }
    }
}

/// 可在线修改的配置键
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KnownSettingKey {
    SystemName,
    PaymentAmount,
    PaymentCurrency,
    AccessPeriodDays,
    UploadMaxSize,
    UploadAllowedTypes,
    AiMaxContextChars,
}

impl KnownSettingKey {
    pub const ALL: [KnownSettingKey; 7] = [
        KnownSettingKey::SystemName,
        KnownSettingKey::PaymentAmount,
        KnownSettingKey::PaymentCurrency,
        KnownSettingKey::AccessPeriodDays,
        KnownSettingKey::UploadMaxSize,
        KnownSettingKey::UploadAllowedTypes,
        KnownSettingKey::AiMaxContextChars,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            KnownSettingKey::SystemName => "app.system_name",
            KnownSettingKey::PaymentAmount => "payment.amount",
            KnownSettingKey::PaymentCurrency => "payment.currency",
            KnownSettingKey::AccessPeriodDays => "access.period_days",
            KnownSettingKey::UploadMaxSize => "upload.max_size",
            KnownSettingKey::UploadAllowedTypes => "upload.allowed_types",
            KnownSettingKey::AiMaxContextChars => "ai.max_context_chars",
        }
    }

    pub fn value_type(&self) -> SettingValueType {
        match self {
            KnownSettingKey::SystemName | KnownSettingKey::PaymentCurrency => {
                SettingValueType::String
            }
            KnownSettingKey::UploadAllowedTypes => SettingValueType::JsonArray,
            KnownSettingKey::PaymentAmount
            | KnownSettingKey::AccessPeriodDays
            | KnownSettingKey::UploadMaxSize
            | KnownSettingKey::AiMaxContextChars => SettingValueType::Integer,
        }
    }

    /// 校验新值；整数类配置必须为正数
    pub fn validate_value(&self, value: &str) -> Result<(), String> {
        match self.value_type() {
            SettingValueType::Integer => match value.trim().parse::<i64>() {
                Ok(v) if v > 0 => Ok(()),
                _ => Err(format!("'{}' must be a positive integer", self.as_str())),
            },
            SettingValueType::Boolean => value
                .parse::<bool>()
                .map(|_| ())
                .map_err(|_| format!("'{}' must be true or false", self.as_str())),
            SettingValueType::JsonArray => serde_json::from_str::<Vec<String>>(value)
                .map(|_| ())
                .map_err(|_| format!("'{}' must be a JSON array of strings", self.as_str())),
            SettingValueType::String => {
                if value.trim().is_empty() {
                    Err(format!("'{}' must not be empty", self.as_str()))
                } else {
                    Ok(())
                }
            }
        }
    }
}

impl std::str::FromStr for KnownSettingKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        KnownSettingKey::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| format!("Unknown setting key: {s}"))
    }
}

/// 系统设置实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/system.ts")]
pub struct SystemSetting {
    pub key: String,
    pub value: String,
    pub value_type: SettingValueType,
    pub description: Option<String>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    pub updated_by: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_lookup() {
        let key: KnownSettingKey = "payment.amount".parse().unwrap();
        assert_eq!(key, KnownSettingKey::PaymentAmount);
        assert!("jwt.secret".parse::<KnownSettingKey>().is_err());
    }

    #[test]
    fn test_value_validation() {
        assert!(KnownSettingKey::PaymentAmount.validate_value("20").is_ok());
        assert!(KnownSettingKey::PaymentAmount.validate_value("0").is_err());
        assert!(KnownSettingKey::AccessPeriodDays.validate_value("abc").is_err());
        assert!(
            KnownSettingKey::UploadAllowedTypes
                .validate_value(r#"[".pdf"]"#)
                .is_ok()
        );
        assert!(KnownSettingKey::UploadAllowedTypes.validate_value(".pdf").is_err());
        assert!(KnownSettingKey::PaymentCurrency.validate_value(" ").is_err());
    }
}
