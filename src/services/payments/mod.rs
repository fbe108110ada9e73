pub mod callback;
pub mod initiate;
pub mod list;
pub mod mpesa;
pub mod status;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use once_cell::sync::OnceCell;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::errors::Result;
use crate::models::payments::{
    callback::StkCallbackEnvelope,
    requests::{CallbackQuery, InitiatePaymentRequest, PaymentListParams},
};
use crate::storage::Storage;
use mpesa::MpesaClient;

pub struct PaymentService {
    storage: Option<Arc<dyn Storage>>,
    mpesa: OnceCell<MpesaClient>,
}

impl PaymentService {
    pub fn new_lazy() -> Self {
        Self {
            storage: None,
            mpesa: OnceCell::new(),
        }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    pub(crate) fn mpesa(&self) -> Result<&MpesaClient> {
        self.mpesa
            .get_or_try_init(|| MpesaClient::new(AppConfig::get().mpesa.clone()))
    }

    // 发起 STK push
    pub async fn initiate_payment(
        &self,
        req: InitiatePaymentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        initiate::initiate_payment(self, req, request).await
    }

    // 网关回调（公开）
    pub async fn handle_callback(
        &self,
        query: CallbackQuery,
        body: StkCallbackEnvelope,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        callback::handle_callback(self, query, body, request).await
    }

    pub async fn payment_status(
        &self,
        id: String,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        status::payment_status(self, id, request).await
    }

    // 服务端轮询直到支付结束或超时
    pub async fn await_payment(
        &self,
        id: String,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        status::await_payment(self, id, request).await
    }

    pub async fn check_access(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        status::check_access(self, request).await
    }

    pub async fn list_my_payments(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::list_my_payments(self, request).await
    }

    pub async fn list_payments(
        &self,
        params: PaymentListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_payments(self, params, request).await
    }
}

/// 取消超时未完成的支付，返回处理条数
pub async fn expire_stale_payments(storage: &Arc<dyn Storage>) -> Result<u64> {
    let timeout = AppConfig::get().access.pending_timeout_secs.max(0);
    let cutoff = chrono::Utc::now().timestamp() - timeout;
    let cancelled = storage.cancel_stale_payments(cutoff).await?;
    if cancelled > 0 {
        tracing::info!("Cancelled {} stale pending payments", cancelled);
    }
    Ok(cancelled)
}
