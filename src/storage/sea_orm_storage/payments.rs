//! 支付与 M-Pesa 交易存储操作

use super::SeaOrmStorage;
use crate::entity::prelude::{MpesaTransactions, UserPayments};
use crate::entity::{mpesa_transactions, user_payments};
use crate::errors::{PaperHubError, Result};
use crate::models::{
    PaginationInfo,
    payments::{
        callback::CallbackOutcome,
        entities::{CallbackSettlement, MpesaTransaction, Payment, PaymentStatus},
        requests::{CreateMpesaTransactionRecord, CreatePaymentRecord, PaymentListQuery},
        responses::PaymentListResponse,
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait, sea_query::Expr,
};

/// 支付方式固定为 M-Pesa
const PAYMENT_METHOD: &str = "mpesa";

impl SeaOrmStorage {
    pub async fn create_payment_impl(&self, record: CreatePaymentRecord) -> Result<Payment> {
        let now = chrono::Utc::now().timestamp();

        let model = user_payments::ActiveModel {
            id: Set(record.id),
            user_id: Set(record.user_id),
            phone_number: Set(record.phone_number),
            amount: Set(record.amount),
            currency: Set(record.currency),
            payment_method: Set(PAYMENT_METHOD.to_string()),
            status: Set(PaymentStatus::Pending.as_str().to_string()),
            transaction_id: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            expires_at: Set(record.expires_at.timestamp()),
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| PaperHubError::database_operation(format!("创建支付记录失败: {e}")))?;

        Ok(result.into_payment())
    }

    pub async fn get_payment_impl(&self, id: &str) -> Result<Option<Payment>> {
        let result = UserPayments::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .map_err(|e| PaperHubError::database_operation(format!("查询支付记录失败: {e}")))?;

        Ok(result.map(|m| m.into_payment()))
    }

    /// 仅修改仍处于 pending 的支付，返回是否生效
    pub async fn update_pending_payment_status_impl(
        &self,
        id: &str,
        status: PaymentStatus,
    ) -> Result<bool> {
        let result = UserPayments::update_many()
            .col_expr(
                user_payments::Column::Status,
                Expr::value(status.as_str().to_string()),
            )
            .col_expr(
                user_payments::Column::UpdatedAt,
                Expr::value(chrono::Utc::now().timestamp()),
            )
            .filter(user_payments::Column::Id.eq(id))
            .filter(user_payments::Column::Status.eq(PaymentStatus::Pending.as_str()))
            .exec(&self.db)
            .await
            .map_err(|e| PaperHubError::database_operation(format!("更新支付状态失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn create_mpesa_transaction_impl(
        &self,
        record: CreateMpesaTransactionRecord,
    ) -> Result<MpesaTransaction> {
        let now = chrono::Utc::now().timestamp();

        let model = mpesa_transactions::ActiveModel {
            payment_id: Set(record.payment_id),
            merchant_request_id: Set(record.merchant_request_id),
            checkout_request_id: Set(record.checkout_request_id),
            phone_number: Set(record.phone_number),
            amount: Set(record.amount),
            result_code: Set(None),
            result_desc: Set(None),
            mpesa_receipt_number: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| PaperHubError::database_operation(format!("创建交易记录失败: {e}")))?;

        Ok(result.into_transaction())
    }

    pub async fn get_transaction_by_payment_impl(
        &self,
        payment_id: &str,
    ) -> Result<Option<MpesaTransaction>> {
        let result = MpesaTransactions::find()
            .filter(mpesa_transactions::Column::PaymentId.eq(payment_id))
            .order_by_desc(mpesa_transactions::Column::CreatedAt)
            .one(&self.db)
            .await
            .map_err(|e| PaperHubError::database_operation(format!("查询交易记录失败: {e}")))?;

        Ok(result.map(|m| m.into_transaction()))
    }

    /// 处理 STK 回调：记录结果并结算支付，同一支付只结算一次
    ///
    /// 成功回调也会结算已被超时清理取消的支付（用户确实付了钱）；
    /// 失败回调只作用于 pending。交易记录只在本次结算生效或尚无结果时写入，
    /// 重放的回调不会覆盖已有结果。
    pub async fn settle_payment_from_callback_impl(
        &self,
        outcome: &CallbackOutcome,
    ) -> Result<CallbackSettlement> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| PaperHubError::database_operation(format!("开启事务失败: {e}")))?;

        let Some(transaction) = MpesaTransactions::find()
            .filter(
                mpesa_transactions::Column::CheckoutRequestId
                    .eq(outcome.checkout_request_id.as_str()),
            )
            .one(&txn)
            .await
            .map_err(|e| PaperHubError::database_operation(format!("查询交易记录失败: {e}")))?
        else {
            return Ok(CallbackSettlement::UnknownCheckout);
        };

        let payment_id = transaction.payment_id.clone();
        let now = chrono::Utc::now().timestamp();

        let (status, settleable) = if outcome.is_success() {
            (
                PaymentStatus::Completed,
                vec![PaymentStatus::Pending.as_str(), PaymentStatus::Cancelled.as_str()],
            )
        } else {
            (PaymentStatus::Failed, vec![PaymentStatus::Pending.as_str()])
        };

        // 条件更新保证只有第一次回调生效
        let mut update = UserPayments::update_many()
            .col_expr(
                user_payments::Column::Status,
                Expr::value(status.as_str().to_string()),
            )
            .col_expr(user_payments::Column::UpdatedAt, Expr::value(now));
        if status == PaymentStatus::Completed {
            update = update.col_expr(
                user_payments::Column::TransactionId,
                Expr::value(outcome.receipt_number.clone()),
            );
        }
        let settled = update
            .filter(user_payments::Column::Id.eq(payment_id.as_str()))
            .filter(user_payments::Column::Status.is_in(settleable))
            .exec(&txn)
            .await
            .map_err(|e| PaperHubError::database_operation(format!("结算支付失败: {e}")))?
            .rows_affected
            > 0;

        if settled || transaction.result_code.is_none() {
            let mut model: mpesa_transactions::ActiveModel = transaction.into();
            model.result_code = Set(Some(outcome.result_code));
            model.result_desc = Set(Some(outcome.result_desc.clone()));
            if let Some(ref receipt) = outcome.receipt_number {
                model.mpesa_receipt_number = Set(Some(receipt.clone()));
            }
            if let Some(amount) = outcome.amount {
                model.amount = Set(amount);
            }
            if let Some(ref phone) = outcome.phone_number {
                model.phone_number = Set(phone.clone());
            }
            model.updated_at = Set(now);
            model
                .update(&txn)
                .await
                .map_err(|e| PaperHubError::database_operation(format!("更新交易记录失败: {e}")))?;
        }

        txn.commit()
            .await
            .map_err(|e| PaperHubError::database_operation(format!("提交事务失败: {e}")))?;

        let payment = self
            .get_payment_impl(&payment_id)
            .await?
            .ok_or_else(|| PaperHubError::not_found(format!("支付记录不存在: {payment_id}")))?;

        Ok(if settled {
            CallbackSettlement::Settled(payment)
        } else {
            CallbackSettlement::AlreadySettled(payment)
        })
    }

    pub async fn list_user_payments_impl(&self, user_id: i64) -> Result<Vec<Payment>> {
        let result = UserPayments::find()
            .filter(user_payments::Column::UserId.eq(user_id))
            .order_by_desc(user_payments::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| PaperHubError::database_operation(format!("查询支付记录失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_payment()).collect())
    }

    pub async fn list_payments_impl(&self, query: PaymentListQuery) -> Result<PaymentListResponse> {
        let page = query.page.max(1);
        let size = query.size.max(1);

        let mut select = UserPayments::find();
        if let Some(status) = query.status {
            select = select.filter(user_payments::Column::Status.eq(status.as_str()));
        }
        if let Some(user_id) = query.user_id {
            select = select.filter(user_payments::Column::UserId.eq(user_id));
        }

        let paginator = select
            .order_by_desc(user_payments::Column::CreatedAt)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| PaperHubError::database_operation(format!("查询支付总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| PaperHubError::database_operation(format!("查询支付页数失败: {e}")))?;
        let models = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| PaperHubError::database_operation(format!("查询支付列表失败: {e}")))?;

        Ok(PaymentListResponse {
            items: models.into_iter().map(|m| m.into_payment()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    /// 最晚到期的有效支付
    pub async fn find_active_access_impl(&self, user_id: i64, now: i64) -> Result<Option<Payment>> {
        let result = UserPayments::find()
            .filter(user_payments::Column::UserId.eq(user_id))
            .filter(user_payments::Column::Status.eq(PaymentStatus::Completed.as_str()))
            .filter(user_payments::Column::ExpiresAt.gt(now))
            .order_by_desc(user_payments::Column::ExpiresAt)
            .one(&self.db)
            .await
            .map_err(|e| PaperHubError::database_operation(format!("查询访问权限失败: {e}")))?;

        Ok(result.map(|m| m.into_payment()))
    }

    /// 将创建时间早于 cutoff 的 pending 支付标记为 cancelled
    pub async fn cancel_stale_payments_impl(&self, cutoff: i64) -> Result<u64> {
        let result = UserPayments::update_many()
            .col_expr(
                user_payments::Column::Status,
                Expr::value(PaymentStatus::Cancelled.as_str().to_string()),
            )
            .col_expr(
                user_payments::Column::UpdatedAt,
                Expr::value(chrono::Utc::now().timestamp()),
            )
            .filter(user_payments::Column::Status.eq(PaymentStatus::Pending.as_str()))
            .filter(user_payments::Column::CreatedAt.lt(cutoff))
            .exec(&self.db)
            .await
            .map_err(|e| PaperHubError::database_operation(format!("取消超时支付失败: {e}")))?;

        Ok(result.rows_affected)
    }
}
