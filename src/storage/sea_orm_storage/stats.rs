//! 管理后台统计

use std::collections::HashSet;

use super::SeaOrmStorage;
use crate::entity::prelude::{Papers, UserPayments, Users};
use crate::entity::{papers, user_payments};
use crate::errors::{PaperHubError, Result};
use crate::models::{
    papers::entities::PaperStatus, payments::entities::PaymentStatus,
    system::responses::AdminStatsResponse,
};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QuerySelect};

impl SeaOrmStorage {
    async fn count_papers_with_status(&self, status: PaperStatus) -> Result<i64> {
        let count = Papers::find()
            .filter(papers::Column::Status.eq(status.as_str()))
            .count(&self.db)
            .await
            .map_err(|e| PaperHubError::database_operation(format!("统计试卷失败: {e}")))?;
        Ok(count as i64)
    }

    pub async fn admin_stats_impl(&self, now: i64) -> Result<AdminStatsResponse> {
        let db_err = |e: sea_orm::DbErr| PaperHubError::database_operation(format!("统计失败: {e}"));

        let total_papers = Papers::find().count(&self.db).await.map_err(db_err)? as i64;
        let pending_papers = self.count_papers_with_status(PaperStatus::Pending).await?;
        let approved_papers = self.count_papers_with_status(PaperStatus::Approved).await?;
        let rejected_papers = self.count_papers_with_status(PaperStatus::Rejected).await?;

        let downloads: Vec<i64> = Papers::find()
            .select_only()
            .column(papers::Column::DownloadCount)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(db_err)?;
        let total_users = Users::find().count(&self.db).await.map_err(db_err)? as i64;

        let total_payments = UserPayments::find().count(&self.db).await.map_err(db_err)? as i64;
        let completed: Vec<(i64, f64, i64)> = UserPayments::find()
            .select_only()
            .column(user_payments::Column::UserId)
            .column(user_payments::Column::Amount)
            .column(user_payments::Column::ExpiresAt)
            .filter(user_payments::Column::Status.eq(PaymentStatus::Completed.as_str()))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(db_err)?;

        // 同一用户的多笔有效支付只算一个订阅
        let active_subscriptions = completed
            .iter()
            .filter(|(_, _, expires_at)| *expires_at > now)
            .map(|(user_id, _, _)| *user_id)
            .collect::<HashSet<_>>()
            .len() as i64;

        Ok(AdminStatsResponse {
            total_papers,
            pending_papers,
            approved_papers,
            rejected_papers,
            total_downloads: downloads.iter().sum(),
            total_users,
            total_payments,
            completed_payments: completed.len() as i64,
            active_subscriptions,
            total_revenue: completed.iter().map(|(_, amount, _)| amount).sum(),
        })
    }
}
