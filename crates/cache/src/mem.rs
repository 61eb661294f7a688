use async_trait::async_trait;
use dashmap::DashMap;
use optrack_core::cache::error::CacheError;
use optrack_core::cache::port::Cache;
use optrack_core::common::time::TimeProvider;
use std::sync::Arc;
use std::time::Duration;

// 单个缓存条目：载荷字节与绝对过期时间戳
struct Entry {
    bytes: Vec<u8>,
    expires_at_millis: i64,
}

/// # Summary
/// 基于 DashMap 的内存 TTL 缓存实现。
///
/// # Invariants
/// - 所有操作均通过并发哈希表 `DashMap` 执行，保证多线程安全。
/// - 过期判断只发生在读取路径上 (惰性清除)，不存在后台清扫线程。
/// - 时间一律经由注入的 `TimeProvider` 获取，测试可拨快虚拟时钟。
pub struct MemCache {
    storage: DashMap<String, Entry>,
    clock: Arc<dyn TimeProvider>,
}

impl MemCache {
    /// # Summary
    /// 使用指定时钟创建一个新的 MemCache 实例。
    ///
    /// # Arguments
    /// * `clock`: 时间供给器，生产环境传入 `RealTimeProvider`。
    ///
    /// # Returns
    /// * `Self` - 初始化的缓存实例。
    pub fn new(clock: Arc<dyn TimeProvider>) -> Self {
        Self {
            storage: DashMap::new(),
            clock,
        }
    }
}

#[async_trait]
impl Cache for MemCache {
    /// # Summary
    /// 设置原始字节数据并附带存活时长。
    ///
    /// # Logic
    /// 1. 以当前时钟加 TTL 计算绝对过期时间。
    /// 2. 插入哈希表；同名键覆盖旧条目并重置存活窗口。
    ///
    /// # Arguments
    /// * `key`: 唯一索引。
    /// * `value`: 待存入的字节序列。
    /// * `ttl`: 条目的存活窗口。
    ///
    /// # Returns
    /// * `Result<(), CacheError>` - 始终返回 Ok，除非内存分配失败。
    async fn set_raw(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), CacheError> {
        let ttl_millis = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
        let expires_at_millis = self.clock.now_millis().saturating_add(ttl_millis);
        self.storage.insert(
            key.to_string(),
            Entry {
                bytes: value,
                expires_at_millis,
            },
        );
        Ok(())
    }

    /// # Summary
    /// 获取原始字节数据。
    ///
    /// # Logic
    /// 1. 从哈希表中检索 Key 对应的条目。
    /// 2. 若当前时间已越过过期时间戳，则移除该条目并按未命中处理。
    /// 3. 未过期则克隆为独立的所有权对象返回。
    ///
    /// # Arguments
    /// * `key`: 唯一索引。
    ///
    /// # Returns
    /// * `Result<Option<Vec<u8>>, CacheError>` - 存在且未过期则返回克隆的数据，否则返回 None。
    async fn get_raw(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let now = self.clock.now_millis();
        let expired = match self.storage.get(key) {
            Some(entry) if now > entry.expires_at_millis => true,
            Some(entry) => return Ok(Some(entry.bytes.clone())),
            None => return Ok(None),
        };
        if expired {
            tracing::debug!("cache entry '{}' expired, evicting lazily", key);
            self.storage.remove(key);
        }
        Ok(None)
    }

    /// # Summary
    /// 删除指定键。
    ///
    /// # Arguments
    /// * `key`: 待删除的唯一索引。
    ///
    /// # Returns
    /// * `Result<(), CacheError>` - 无论键是否存在均返回 Ok。
    async fn del(&self, key: &str) -> Result<(), CacheError> {
        self.storage.remove(key);
        Ok(())
    }
}
