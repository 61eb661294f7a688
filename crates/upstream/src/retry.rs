use async_trait::async_trait;
use optrack_core::config::RetryConfig;
use optrack_core::upstream::error::UpstreamError;
use optrack_core::upstream::port::UpstreamPort;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// # Summary
/// 有界线性退避重试策略。
///
/// # Invariants
/// - 总尝试次数不超过 `1 + max_retries`。
/// - 第 n 次重试前等待 `n * base_delay` (500ms, 1000ms, ...)。
#[derive(Clone, Copy, Debug)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay: Duration::from_millis(500),
        }
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            base_delay: config.base_delay(),
        }
    }
}

impl RetryPolicy {
    /// 第 `attempt` 次失败后的等待时长 (attempt 从 0 起计)
    fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt.saturating_add(1))
    }
}

/// # Summary
/// 为任意上游端口叠加重试的装饰器，自身同样实现 `UpstreamPort`。
///
/// # Invariants
/// - 重试资格完全委托给 `UpstreamError::is_retryable` (仅 429 与 5xx)。
/// - 重试对调用方透明；只有最终耗尽才向上传播最后一次失败。
pub struct Retrying {
    inner: Arc<dyn UpstreamPort>,
    policy: RetryPolicy,
}

impl Retrying {
    pub fn new(inner: Arc<dyn UpstreamPort>, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }
}

#[async_trait]
impl UpstreamPort for Retrying {
    /// # Summary
    /// 带重试地执行上游 GET 请求。
    ///
    /// # Logic
    /// 1. 以显式循环计数尝试次数 (上界很小，不使用递归)。
    /// 2. 失败且具备重试资格、次数未耗尽时，等待线性退避时长后重试。
    /// 3. 不可重试的失败 (4xx、无状态码故障) 立即返回，零等待。
    ///
    /// # Arguments
    /// * `path`: 相对路径。
    ///
    /// # Returns
    /// 成功返回 JSON 载荷，耗尽后返回最后一次的 `UpstreamError`。
    async fn get(&self, path: &str) -> Result<Value, UpstreamError> {
        let mut attempt: u32 = 0;
        loop {
            match self.inner.get(path).await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_retryable() && attempt < self.policy.max_retries => {
                    let delay = self.policy.delay_for(attempt);
                    attempt += 1;
                    tracing::warn!(
                        "upstream GET {} failed ({}), retry {}/{} in {:?}",
                        path,
                        err,
                        attempt,
                        self.policy.max_retries,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
