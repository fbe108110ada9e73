use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;
use tracing::debug;

use crate::cache::{CacheResult, ObjectCache};
use crate::config::AppConfig;
use crate::declare_object_cache_plugin;

declare_object_cache_plugin!("moka", MokaCacheWrapper);

/// 值连同各自的 TTL 一起存放
#[derive(Clone)]
struct Entry {
    value: String,
    ttl: Duration,
}

struct PerEntryExpiry;

impl Expiry<String, Entry> for PerEntryExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        entry: &Entry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }
}

pub struct MokaCacheWrapper {
    inner: Cache<String, Entry>,
    default_ttl: Duration,
}

impl MokaCacheWrapper {
    pub fn new() -> Result<Self, String> {
        let config = AppConfig::get();
        Ok(Self::with_capacity(
            config.cache.memory.max_capacity,
            config.cache.default_ttl,
        ))
    }

    /// 不依赖全局配置的构造方式
    pub fn with_capacity(max_capacity: u64, default_ttl_secs: u64) -> Self {
        let inner = Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(PerEntryExpiry)
            .build();

        debug!(
            "MokaCacheWrapper initialized (capacity: {}, default ttl: {}s)",
            max_capacity, default_ttl_secs
        );
        Self {
            inner,
            default_ttl: Duration::from_secs(default_ttl_secs),
        }
    }
}

#[async_trait]
impl ObjectCache for MokaCacheWrapper {
    async fn get_raw(&self, key: &str) -> CacheResult<String> {
        match self.inner.get(key).await {
            Some(entry) => {
                debug!("Cache hit: {}", key);
                CacheResult::Found(entry.value)
            }
            None => {
                debug!("Cache miss: {}", key);
                CacheResult::NotFound
            }
        }
    }

    async fn insert_raw(&self, key: String, value: String, ttl: u64) {
        let ttl = if ttl == 0 {
            self.default_ttl
        } else {
            Duration::from_secs(ttl)
        };
        self.inner.insert(key, Entry { value, ttl }).await;
    }

    async fn remove(&self, key: &str) {
        self.inner.invalidate(key).await;
    }

    async fn invalidate_all(&self) {
        self.inner.invalidate_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_and_get() {
        let cache = MokaCacheWrapper::with_capacity(100, 60);
        cache
            .insert_raw("paper_text:1".to_string(), "Question 1".to_string(), 0)
            .await;
        assert_eq!(
            cache.get_raw("paper_text:1").await,
            CacheResult::Found("Question 1".to_string())
        );
    }

    #[tokio::test]
    async fn test_remove() {
        let cache = MokaCacheWrapper::with_capacity(100, 60);
        cache
            .insert_raw("user:abc".to_string(), "{}".to_string(), 30)
            .await;
        cache.remove("user:abc").await;
        assert_eq!(cache.get_raw("user:abc").await, CacheResult::NotFound);
    }

    #[tokio::test]
    async fn test_entry_expires_after_its_own_ttl() {
        let cache = MokaCacheWrapper::with_capacity(100, 3600);
        cache
            .insert_raw("short".to_string(), "v".to_string(), 1)
            .await;
        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(cache.get_raw("short").await, CacheResult::NotFound);
    }
}
