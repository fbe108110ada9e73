use super::SeaOrmStorage;
use crate::entity::users::{ActiveModel, Column, Entity as Users};
use crate::errors::{PaperHubError, Result};
use crate::models::{
    PaginationInfo,
    users::{
        entities::{User, UserStatus},
        requests::{CreateUserRequest, UserChanges, UserListQuery},
        responses::UserListResponse,
    },
};
use crate::utils::contains_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set,
};

impl SeaOrmStorage {
    /// 创建用户
    pub async fn create_user_impl(&self, req: CreateUserRequest) -> Result<User> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            username: Set(req.username),
            email: Set(req.email),
            password_hash: Set(req.password),
            role: Set(req.role.to_string()),
            status: Set(UserStatus::Active.to_string()),
            display_name: Set(req.display_name),
            avatar_url: Set(req.avatar_url),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| PaperHubError::database_operation(format!("创建用户失败: {e}")))?;

        Ok(result.into_user())
    }

    pub async fn get_user_by_id_impl(&self, id: i64) -> Result<Option<User>> {
        let result = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| PaperHubError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    pub async fn get_user_by_username_impl(&self, username: &str) -> Result<Option<User>> {
        let result = Users::find()
            .filter(Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(|e| PaperHubError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    pub async fn get_user_by_email_impl(&self, email: &str) -> Result<Option<User>> {
        let result = Users::find()
            .filter(Column::Email.eq(email.to_lowercase()))
            .one(&self.db)
            .await
            .map_err(|e| PaperHubError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 登录时使用：用户名或邮箱
    pub async fn get_user_by_username_or_email_impl(
        &self,
        identifier: &str,
    ) -> Result<Option<User>> {
        let result = Users::find()
            .filter(
                Condition::any()
                    .add(Column::Username.eq(identifier))
                    .add(Column::Email.eq(identifier.to_lowercase())),
            )
            .one(&self.db)
            .await
            .map_err(|e| PaperHubError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 分页列出用户
    pub async fn list_users_with_pagination_impl(
        &self,
        query: UserListQuery,
    ) -> Result<UserListResponse> {
        let page = query.page.max(1);
        let size = query.size.max(1);

        let mut select = Users::find();

        if let Some(search) = query.search.as_deref().map(str::trim)
            && !search.is_empty()
        {
            select = select.filter(
                Condition::any()
                    .add(Column::Username.like(contains_pattern(search)))
                    .add(Column::Email.like(contains_pattern(search)))
                    .add(Column::DisplayName.like(contains_pattern(search))),
            );
        }

        if let Some(ref role) = query.role {
            select = select.filter(Column::Role.eq(role.to_string()));
        }

        if let Some(ref status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }

        let paginator = select
            .order_by_desc(Column::CreatedAt)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| PaperHubError::database_operation(format!("查询用户总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| PaperHubError::database_operation(format!("查询用户页数失败: {e}")))?;
        let users = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| PaperHubError::database_operation(format!("查询用户列表失败: {e}")))?;

        Ok(UserListResponse {
            items: users.into_iter().map(|m| m.into_user()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    pub async fn update_last_login_impl(&self, id: i64) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();

        let result = Users::update_many()
            .col_expr(Column::LastLogin, sea_orm::sea_query::Expr::value(now))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| PaperHubError::database_operation(format!("更新最后登录时间失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 部分更新；用户不存在时返回 None
    pub async fn update_user_impl(&self, id: i64, changes: UserChanges) -> Result<Option<User>> {
        let Some(existing) = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| PaperHubError::database_operation(format!("查询用户失败: {e}")))?
        else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        model.updated_at = Set(chrono::Utc::now().timestamp());

        if let Some(email) = changes.email {
            model.email = Set(email.to_lowercase());
        }
        if let Some(password_hash) = changes.password_hash {
            model.password_hash = Set(password_hash);
        }
        if let Some(role) = changes.role {
            model.role = Set(role.to_string());
        }
        if let Some(status) = changes.status {
            model.status = Set(status.to_string());
        }
        if let Some(display_name) = changes.display_name {
            model.display_name = Set(Some(display_name).filter(|s| !s.trim().is_empty()));
        }
        if let Some(avatar_url) = changes.avatar_url {
            model.avatar_url = Set(Some(avatar_url).filter(|s| !s.trim().is_empty()));
        }

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| PaperHubError::database_operation(format!("更新用户失败: {e}")))?;

        Ok(Some(updated.into_user()))
    }

    pub async fn count_users_impl(&self) -> Result<u64> {
        Users::find()
            .count(&self.db)
            .await
            .map_err(|e| PaperHubError::database_operation(format!("统计用户数量失败: {e}")))
    }
}
