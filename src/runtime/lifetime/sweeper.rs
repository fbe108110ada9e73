//! 后台任务：定期取消超时的待支付记录

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::config::AppConfig;
use crate::services::payments::expire_stale_payments;
use crate::storage::Storage;

/// 启动清理任务，返回句柄供关闭时中止
pub fn spawn_payment_sweeper(storage: Arc<dyn Storage>) -> JoinHandle<()> {
    let interval_secs = AppConfig::get().access.sweep_interval_secs.max(1);

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs));
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            match expire_stale_payments(&storage).await {
                Ok(count) => debug!("Payment sweep finished, {} cancelled", count),
                Err(e) => warn!("Payment sweep failed: {}", e),
            }
        }
    })
}
