//! SeaORM 实体定义
//!
//! 这些实体用于数据库操作，与 models 模块中的业务实体分离。
//! Storage 层使用这些实体进行 CRUD 操作，然后转换为 models 中的业务实体。
//! 时间统一以 Unix 秒存储。

pub mod prelude;

pub mod courses;
pub mod departments;
pub mod files;
pub mod mpesa_transactions;
pub mod papers;
pub mod schools;
pub mod system_settings;
pub mod user_payments;
pub mod users;

use chrono::{DateTime, Utc};

/// Unix 秒转 UTC 时间，越界时回退为纪元
pub(crate) fn from_unix(secs: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(secs, 0).unwrap_or_default()
}
