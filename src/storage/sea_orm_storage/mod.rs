//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod catalog;
mod files;
mod papers;
mod payments;
mod stats;
mod system_settings;
mod users;

use crate::config::{AppConfig, DatabaseConfig};
use crate::errors::{PaperHubError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 按全局配置创建存储实例
    pub async fn new_async() -> Result<Self> {
        Self::connect(&AppConfig::get().database).await
    }

    /// 连接数据库并运行迁移
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let db_url = Self::build_database_url(&config.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite:") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| PaperHubError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &DatabaseConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let in_memory = url.contains(":memory:");

        let mut opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| PaperHubError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .busy_timeout(Duration::from_secs(5))
            .foreign_keys(true)
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory");
        if !in_memory {
            opt = opt
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal)
                .pragma("mmap_size", "536870912")
                .pragma("wal_autocheckpoint", "1000");
        }

        let mut pool = SqlitePoolOptions::new()
            .max_connections(config.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.timeout));
        // 内存库随连接关闭而消失，连接不能被回收
        pool = if in_memory {
            pool.idle_timeout(None).max_lifetime(None)
        } else {
            pool.idle_timeout(Duration::from_secs(300))
        };

        let pool = pool
            .connect_with(opt)
            .await
            .map_err(|e| PaperHubError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &DatabaseConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.pool_size)
            .min_connections(config.pool_size.min(5))
            .connect_timeout(Duration::from_secs(config.timeout))
            .acquire_timeout(Duration::from_secs(config.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| PaperHubError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite:") {
            Ok(url.to_string())
        } else if url == ":memory:" {
            Ok("sqlite::memory:".to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(PaperHubError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

// Storage trait 实现
use crate::models::{
    catalog::{
        entities::{Course, CourseSummary, Department, School},
        requests::CourseListParams,
    },
    files::entities::File,
    papers::{
        entities::{Paper, PaperStatus, PaperText, PaperWithCourse},
        requests::{CreatePaperRecord, PaperFilter},
        responses::PaperListResponse,
    },
    payments::{
        callback::CallbackOutcome,
        entities::{CallbackSettlement, MpesaTransaction, Payment, PaymentStatus},
        requests::{CreateMpesaTransactionRecord, CreatePaymentRecord, PaymentListQuery},
        responses::PaymentListResponse,
    },
    system::{entities::SystemSetting, responses::AdminStatsResponse},
    users::{
        entities::User,
        requests::{CreateUserRequest, UserChanges, UserListQuery},
        responses::UserListResponse,
    },
};
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户模块
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.get_user_by_username_impl(username).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.get_user_by_email_impl(email).await
    }

    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>> {
        self.get_user_by_username_or_email_impl(identifier).await
    }

    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse> {
        self.list_users_with_pagination_impl(query).await
    }

    async fn update_user(&self, id: i64, changes: UserChanges) -> Result<Option<User>> {
        self.update_user_impl(id, changes).await
    }

    async fn update_last_login(&self, id: i64) -> Result<bool> {
        self.update_last_login_impl(id).await
    }

    async fn count_users(&self) -> Result<u64> {
        self.count_users_impl().await
    }

    // 目录模块
    async fn list_schools(&self) -> Result<Vec<School>> {
        self.list_schools_impl().await
    }

    async fn list_departments(&self, school_id: Option<&str>) -> Result<Vec<Department>> {
        self.list_departments_impl(school_id).await
    }

    async fn list_all_courses(&self) -> Result<Vec<Course>> {
        self.list_all_courses_impl().await
    }

    async fn list_courses(&self, params: &CourseListParams) -> Result<Vec<CourseSummary>> {
        self.list_courses_impl(params).await
    }

    async fn get_course(&self, id: &str) -> Result<Option<CourseSummary>> {
        self.get_course_impl(id).await
    }

    async fn get_school(&self, id: &str) -> Result<Option<School>> {
        self.get_school_impl(id).await
    }

    async fn get_department(&self, id: &str) -> Result<Option<Department>> {
        self.get_department_impl(id).await
    }

    async fn create_school(&self, name: &str) -> Result<School> {
        self.create_school_impl(name).await
    }

    async fn create_department(&self, school_id: &str, name: &str) -> Result<Department> {
        self.create_department_impl(school_id, name).await
    }

    async fn create_course(&self, department_id: &str, code: &str, name: &str) -> Result<Course> {
        self.create_course_impl(department_id, code, name).await
    }

    // 文件模块
    async fn upload_file(
        &self,
        download_token: &str,
        original_name: &str,
        stored_name: &str,
        file_size: i64,
        file_type: &str,
        user_id: i64,
    ) -> Result<File> {
        self.upload_file_impl(
            download_token,
            original_name,
            stored_name,
            file_size,
            file_type,
            user_id,
        )
        .await
    }

    async fn get_file_by_token(&self, token: &str) -> Result<Option<File>> {
        self.get_file_by_token_impl(token).await
    }

    // 试卷模块
    async fn create_paper(&self, record: CreatePaperRecord) -> Result<Paper> {
        self.create_paper_impl(record).await
    }

    async fn get_paper(&self, id: i64) -> Result<Option<PaperWithCourse>> {
        self.get_paper_impl(id).await
    }

    async fn list_papers(
        &self,
        filter: &PaperFilter,
        page: u64,
        size: u64,
    ) -> Result<PaperListResponse> {
        self.list_papers_impl(filter, page, size).await
    }

    async fn review_paper(
        &self,
        id: i64,
        status: PaperStatus,
        reviewer_id: i64,
        notes: Option<String>,
    ) -> Result<Option<Paper>> {
        self.review_paper_impl(id, status, reviewer_id, notes).await
    }

    async fn increment_download_count(&self, id: i64) -> Result<bool> {
        self.increment_download_count_impl(id).await
    }

    async fn delete_paper(&self, id: i64) -> Result<bool> {
        self.delete_paper_impl(id).await
    }

    async fn get_paper_text(&self, id: i64) -> Result<Option<PaperText>> {
        self.get_paper_text_impl(id).await
    }

    async fn set_paper_text(&self, id: i64, text: &PaperText) -> Result<bool> {
        self.set_paper_text_impl(id, text).await
    }

    // 支付模块
    async fn create_payment(&self, record: CreatePaymentRecord) -> Result<Payment> {
        self.create_payment_impl(record).await
    }

    async fn get_payment(&self, id: &str) -> Result<Option<Payment>> {
        self.get_payment_impl(id).await
    }

    async fn update_pending_payment_status(
        &self,
        id: &str,
        status: PaymentStatus,
    ) -> Result<bool> {
        self.update_pending_payment_status_impl(id, status).await
    }

    async fn create_mpesa_transaction(
        &self,
        record: CreateMpesaTransactionRecord,
    ) -> Result<MpesaTransaction> {
        self.create_mpesa_transaction_impl(record).await
    }

    async fn get_transaction_by_payment(
        &self,
        payment_id: &str,
    ) -> Result<Option<MpesaTransaction>> {
        self.get_transaction_by_payment_impl(payment_id).await
    }

    async fn settle_payment_from_callback(
        &self,
        outcome: &CallbackOutcome,
    ) -> Result<CallbackSettlement> {
        self.settle_payment_from_callback_impl(outcome).await
    }

    async fn list_user_payments(&self, user_id: i64) -> Result<Vec<Payment>> {
        self.list_user_payments_impl(user_id).await
    }

    async fn list_payments(&self, query: PaymentListQuery) -> Result<PaymentListResponse> {
        self.list_payments_impl(query).await
    }

    async fn find_active_access(&self, user_id: i64, now: i64) -> Result<Option<Payment>> {
        self.find_active_access_impl(user_id, now).await
    }

    async fn cancel_stale_payments(&self, cutoff: i64) -> Result<u64> {
        self.cancel_stale_payments_impl(cutoff).await
    }

    // 系统设置模块
    async fn list_all_settings(&self) -> Result<Vec<SystemSetting>> {
        self.list_all_settings_impl().await
    }

    async fn get_setting_by_key(&self, key: &str) -> Result<Option<SystemSetting>> {
        self.get_setting_by_key_impl(key).await
    }

    async fn update_setting(&self, key: &str, value: &str, user_id: i64) -> Result<SystemSetting> {
        self.update_setting_impl(key, value, user_id).await
    }

    // 统计
    async fn admin_stats(&self, now: i64) -> Result<AdminStatsResponse> {
        self.admin_stats_impl(now).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_database_url() {
        assert_eq!(
            SeaOrmStorage::build_database_url("paperhub.db").unwrap(),
            "sqlite://paperhub.db?mode=rwc"
        );
        assert_eq!(
            SeaOrmStorage::build_database_url(":memory:").unwrap(),
            "sqlite::memory:"
        );
        assert!(SeaOrmStorage::build_database_url("postgres://u:p@localhost/db").is_ok());
        assert!(SeaOrmStorage::build_database_url("ftp://nope").is_err());
    }
}
