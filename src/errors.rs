//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。

use std::fmt;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_paperhub_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum PaperHubError {
            $($variant(String),)*
        }

        impl PaperHubError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(PaperHubError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(PaperHubError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(PaperHubError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl PaperHubError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        PaperHubError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_paperhub_errors! {
    CacheConnection("E001", "Cache Connection Error"),
    CachePluginNotFound("E002", "Cache Plugin Not Found"),
    DatabaseConfig("E003", "Database Configuration Error"),
    DatabaseConnection("E004", "Database Connection Error"),
    DatabaseOperation("E005", "Database Operation Error"),
    FileOperation("E006", "File Operation Error"),
    Validation("E007", "Validation Error"),
    NotFound("E008", "Resource Not Found"),
    Serialization("E009", "Serialization Error"),
    StoragePluginNotFound("E010", "Storage Plugin Not Found"),
    DateParse("E011", "Date Parse Error"),
    Authentication("E012", "Authentication Error"),
    Authorization("E013", "Authorization Error"),
    Payment("E014", "Payment Error"),
    PaymentGateway("E015", "Payment Gateway Error"),
    Extraction("E016", "Text Extraction Error"),
    ExternalApi("E017", "External API Error"),
    Conflict("E018", "Resource Conflict"),
}

impl PaperHubError {
    /// 格式化为彩色输出（用于开发环境）
    #[cfg(debug_assertions)]
    pub fn format_colored(&self) -> String {
        format!(
            "\x1b[1;31m[ERROR]\x1b[0m \x1b[33m{}\x1b[0m \x1b[31m{}\x1b[0m\n  {}",
            self.code(),
            self.error_type(),
            self.message()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for PaperHubError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for PaperHubError {}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for PaperHubError {
    fn from(err: sea_orm::DbErr) -> Self {
        PaperHubError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for PaperHubError {
    fn from(err: std::io::Error) -> Self {
        PaperHubError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for PaperHubError {
    fn from(err: serde_json::Error) -> Self {
        PaperHubError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for PaperHubError {
    fn from(err: chrono::ParseError) -> Self {
        PaperHubError::DateParse(err.to_string())
    }
}

impl From<reqwest::Error> for PaperHubError {
    fn from(err: reqwest::Error) -> Self {
        PaperHubError::ExternalApi(err.to_string())
    }
}

impl PaperHubError {
    /// 是否为调用方输入导致的错误（映射为 4xx）
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            PaperHubError::Validation(_)
                | PaperHubError::NotFound(_)
                | PaperHubError::Authentication(_)
                | PaperHubError::Authorization(_)
                | PaperHubError::Conflict(_)
                | PaperHubError::Extraction(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, PaperHubError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(PaperHubError::cache_connection("test").code(), "E001");
        assert_eq!(PaperHubError::database_config("test").code(), "E003");
        assert_eq!(PaperHubError::validation("test").code(), "E007");
        assert_eq!(PaperHubError::authentication("test").code(), "E012");
    }

    #[test]
    fn test_payment_error_codes() {
        assert_eq!(PaperHubError::payment("test").code(), "E014");
        assert_eq!(PaperHubError::payment_gateway("test").code(), "E015");
        assert_eq!(PaperHubError::extraction("test").code(), "E016");
        assert_eq!(
            PaperHubError::payment_gateway("test").error_type(),
            "Payment Gateway Error"
        );
    }

    #[test]
    fn test_client_error_classification() {
        assert!(PaperHubError::validation("bad phone").is_client_error());
        assert!(PaperHubError::not_found("paper").is_client_error());
        assert!(!PaperHubError::database_operation("boom").is_client_error());
        assert!(!PaperHubError::payment_gateway("timeout").is_client_error());
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            PaperHubError::cache_connection("test").error_type(),
            "Cache Connection Error"
        );
        assert_eq!(
            PaperHubError::validation("test").error_type(),
            "Validation Error"
        );
    }

    #[test]
    fn test_error_message() {
        let err = PaperHubError::validation("Invalid input");
        assert_eq!(err.message(), "Invalid input");
    }

    #[test]
    fn test_format_simple() {
        let err = PaperHubError::validation("Invalid phone number");
        let formatted = err.format_simple();
        assert!(formatted.contains("Validation Error"));
        assert!(formatted.contains("Invalid phone number"));
    }
}
