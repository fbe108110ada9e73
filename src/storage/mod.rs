use std::sync::Arc;

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

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过用户名获取用户信息
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    // 通过邮箱获取用户信息
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    // 通过用户名或邮箱获取用户信息
    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>>;
    // 列出用户
    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse>;
    // 更新用户信息
    async fn update_user(&self, id: i64, changes: UserChanges) -> Result<Option<User>>;
    // 更新用户最后登录时间
    async fn update_last_login(&self, id: i64) -> Result<bool>;
    // 用户总数
    async fn count_users(&self) -> Result<u64>;

    /// 目录（学院/系/课程）
    async fn list_schools(&self) -> Result<Vec<School>>;
    async fn list_departments(&self, school_id: Option<&str>) -> Result<Vec<Department>>;
    async fn list_all_courses(&self) -> Result<Vec<Course>>;
    // 课程列表（带系、学院名称）
    async fn list_courses(&self, params: &CourseListParams) -> Result<Vec<CourseSummary>>;
    async fn get_course(&self, id: &str) -> Result<Option<CourseSummary>>;
    async fn get_school(&self, id: &str) -> Result<Option<School>>;
    async fn get_department(&self, id: &str) -> Result<Option<Department>>;
    async fn create_school(&self, name: &str) -> Result<School>;
    async fn create_department(&self, school_id: &str, name: &str) -> Result<Department>;
    async fn create_course(&self, department_id: &str, code: &str, name: &str) -> Result<Course>;

    /// 文件管理方法
    // 记录上传的文件
    async fn upload_file(
        &self,
        download_token: &str,
        original_name: &str,
        stored_name: &str,
        file_size: i64,
        file_type: &str,
        user_id: i64,
    ) -> Result<File>;
    // 通过唯一 token 获取文件信息
    async fn get_file_by_token(&self, token: &str) -> Result<Option<File>>;

    /// 试卷
    async fn create_paper(&self, record: CreatePaperRecord) -> Result<Paper>;
    async fn get_paper(&self, id: i64) -> Result<Option<PaperWithCourse>>;
    // 分页列出（按创建时间倒序）
    async fn list_papers(
        &self,
        filter: &PaperFilter,
        page: u64,
        size: u64,
    ) -> Result<PaperListResponse>;
    // 审核，返回 None 表示试卷不存在
    async fn review_paper(
        &self,
        id: i64,
        status: PaperStatus,
        reviewer_id: i64,
        notes: Option<String>,
    ) -> Result<Option<Paper>>;
    async fn increment_download_count(&self, id: i64) -> Result<bool>;
    async fn delete_paper(&self, id: i64) -> Result<bool>;
    async fn get_paper_text(&self, id: i64) -> Result<Option<PaperText>>;
    async fn set_paper_text(&self, id: i64, text: &PaperText) -> Result<bool>;

    /// 支付
    async fn create_payment(&self, record: CreatePaymentRecord) -> Result<Payment>;
    async fn get_payment(&self, id: &str) -> Result<Option<Payment>>;
    // 仅在 pending 时修改状态
    async fn update_pending_payment_status(&self, id: &str, status: PaymentStatus)
    -> Result<bool>;
    async fn create_mpesa_transaction(
        &self,
        record: CreateMpesaTransactionRecord,
    ) -> Result<MpesaTransaction>;
    async fn get_transaction_by_payment(&self, payment_id: &str)
    -> Result<Option<MpesaTransaction>>;
    // 处理回调：记录结果并结算支付（幂等）
    async fn settle_payment_from_callback(
        &self,
        outcome: &CallbackOutcome,
    ) -> Result<CallbackSettlement>;
    async fn list_user_payments(&self, user_id: i64) -> Result<Vec<Payment>>;
    async fn list_payments(&self, query: PaymentListQuery) -> Result<PaymentListResponse>;
    // 最晚到期的有效支付
    async fn find_active_access(&self, user_id: i64, now: i64) -> Result<Option<Payment>>;
    // 将创建早于 cutoff 的 pending 支付标记为 cancelled
    async fn cancel_stale_payments(&self, cutoff: i64) -> Result<u64>;

    /// 系统设置
    async fn list_all_settings(&self) -> Result<Vec<SystemSetting>>;
    async fn get_setting_by_key(&self, key: &str) -> Result<Option<SystemSetting>>;
    async fn update_setting(&self, key: &str, value: &str, user_id: i64) -> Result<SystemSetting>;

    /// 管理统计
    async fn admin_stats(&self, now: i64) -> Result<AdminStatsResponse>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
