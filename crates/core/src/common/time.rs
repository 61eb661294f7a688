use chrono::Utc;
use std::sync::RwLock;

/// # Summary
/// 时间供给器接口，用于劫持和隔离物理系统时钟。
/// 缓存的 TTL 过期判断必须通过此接口获取当前毫秒时间戳。
pub trait TimeProvider: Send + Sync {
    /// 获取当前 Unix 毫秒时间戳
    fn now_millis(&self) -> i64;
}

/// # Summary
/// 生产环境使用的真实时钟，直接返回操作系统当前时间。
pub struct RealTimeProvider;

impl TimeProvider for RealTimeProvider {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// # Summary
/// 测试专用虚拟时钟，允许测试主动拨快时间以触发 TTL 过期。
///
/// # Invariants
/// - 并发安全：内部利用 `RwLock` 提供给多线程安全修改和读取时间的权限。
pub struct FakeClockProvider {
    current_millis: RwLock<i64>,
}

impl FakeClockProvider {
    /// 使用指定的初始毫秒时间戳创建虚拟时钟
    pub fn new(initial_millis: i64) -> Self {
        Self {
            current_millis: RwLock::new(initial_millis),
        }
    }

    /// 强制修改时钟的当前时间
    pub fn set_millis(&self, new_millis: i64) {
        if let Ok(mut millis) = self.current_millis.write() {
            *millis = new_millis;
        }
    }

    /// 在当前时间基础上拨快指定毫秒数
    pub fn advance(&self, delta_millis: i64) {
        if let Ok(mut millis) = self.current_millis.write() {
            *millis += delta_millis;
        }
    }
}

impl TimeProvider for FakeClockProvider {
    fn now_millis(&self) -> i64 {
        self.current_millis.read().map(|m| *m).unwrap_or(0)
    }
}
