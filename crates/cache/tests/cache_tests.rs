use optrack_cache::mem::MemCache;
use optrack_core::cache::port::{Cache, CacheExt};
use optrack_core::common::time::{FakeClockProvider, RealTimeProvider};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
struct TestItem {
    id: u32,
    name: String,
}

const TTL: Duration = Duration::from_secs(30);

#[tokio::test]
async fn test_mem_cache_raw_ops() {
    let cache = MemCache::new(Arc::new(RealTimeProvider));
    let key = "raw_key";
    let value = vec![1, 2, 3, 4];

    // 测试存取
    cache.set_raw(key, value.clone(), TTL).await.unwrap();
    let result = cache.get_raw(key).await.unwrap().unwrap();
    assert_eq!(result, value);

    // 测试删除
    cache.del(key).await.unwrap();
    let result = cache.get_raw(key).await.unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn test_mem_cache_typed_ops() {
    let cache = MemCache::new(Arc::new(RealTimeProvider));
    let key = "typed_key";
    let item = TestItem {
        id: 42,
        name: "Optrack".to_string(),
    };

    // 使用 CacheExt 提供的 set 方法
    cache.set(key, &item, TTL).await.unwrap();

    // 使用 CacheExt 提供的 get 方法
    let result: TestItem = cache.get(key).await.unwrap().unwrap();
    assert_eq!(result, item);
}

#[tokio::test]
async fn test_entry_expires_lazily_after_ttl() {
    let clock = Arc::new(FakeClockProvider::new(1_000));
    let cache = MemCache::new(clock.clone());
    let key = "markets:20:1";

    cache.set_raw(key, vec![7, 7, 7], TTL).await.unwrap();

    // 窗口内命中
    clock.advance(29_999);
    assert!(cache.get_raw(key).await.unwrap().is_some());

    // 恰好到达过期时间戳仍算有效 (过期判定是 now > expires_at)
    clock.advance(1);
    assert!(cache.get_raw(key).await.unwrap().is_some());

    // 越过窗口后，下一次读取触发惰性清除并报告未命中
    clock.advance(1);
    assert!(cache.get_raw(key).await.unwrap().is_none());
    assert!(cache.get_raw(key).await.unwrap().is_none());
}

#[tokio::test]
async fn test_overwrite_resets_ttl_window() {
    let clock = Arc::new(FakeClockProvider::new(0));
    let cache = MemCache::new(clock.clone());
    let key = "markets:20:1";

    cache.set_raw(key, vec![1], TTL).await.unwrap();

    // 20 秒后重写同名键：旧窗口作废，新窗口从当前时间起算
    clock.advance(20_000);
    cache.set_raw(key, vec![2], TTL).await.unwrap();

    // 距首次写入已 45 秒，但距重写仅 25 秒，仍应命中新值
    clock.advance(25_000);
    let result = cache.get_raw(key).await.unwrap().unwrap();
    assert_eq!(result, vec![2]);

    // 距重写 35 秒后过期
    clock.advance(10_000);
    assert!(cache.get_raw(key).await.unwrap().is_none());
}
