//! 对象缓存层
//!
//! 后端通过 `declare_object_cache_plugin!` 在程序启动前注册到插件表，
//! 启动时按配置选择（Redis 不可用时回退到 Moka）。

pub mod object_cache;
pub mod register;

use async_trait::async_trait;

/// 缓存查询结果
#[derive(Debug, Clone, PartialEq)]
pub enum CacheResult<T> {
    Found(T),
    NotFound,
    /// 后端出错，无法确定键是否存在
    ExistsButNoValue,
}

#[async_trait]
pub trait ObjectCache: Send + Sync {
    async fn get_raw(&self, key: &str) -> CacheResult<String>;
    /// `ttl` 为 0 时使用后端默认 TTL
    async fn insert_raw(&self, key: String, value: String, ttl: u64);
    async fn remove(&self, key: &str);
    async fn invalidate_all(&self);
}

/// 注册缓存插件
///
/// 插件类型需提供 `fn new() -> Result<Self, String>`。
#[macro_export]
macro_rules! declare_object_cache_plugin {
    ($name:expr, $ty:ty) => {
        #[ctor::ctor]
        unsafe fn __register_object_cache_plugin() {
            $crate::cache::register::register_object_cache_plugin(
                $name,
                std::sync::Arc::new(|| {
                    Box::pin(async {
                        let cache = <$ty>::new()
                            .map_err($crate::errors::PaperHubError::cache_connection)?;
                        Ok(Box::new(cache) as Box<dyn $crate::cache::ObjectCache>)
                    })
                }),
            );
        }
    };
}

/// 用户缓存键（按 access token）
pub fn user_cache_key(token: &str) -> String {
    format!("user:{token}")
}

/// 试卷文本缓存键
pub fn paper_text_cache_key(paper_id: i64) -> String {
    format!("paper_text:{paper_id}")
}

/// 目录树缓存键
pub const CATALOG_CACHE_KEY: &str = "catalog:tree";
