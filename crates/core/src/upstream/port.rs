use crate::upstream::error::UpstreamError;
use async_trait::async_trait;
use serde_json::Value;

/// # Summary
/// 上游交易数据 API 的访问端口 (Port)。
///
/// # Invariants
/// - 一次调用对应一次逻辑请求；是否包含重试由具体实现决定。
/// - `path` 为相对上游基地址的路径 (含查询串)，如 `/markets?limit=20&page=1`。
#[async_trait]
pub trait UpstreamPort: Send + Sync {
    /// # Summary
    /// 对上游执行 GET 请求并返回原始 JSON 载荷。
    ///
    /// # Arguments
    /// * `path`: 相对路径，以 `/` 开头。
    ///
    /// # Returns
    /// 成功返回解析后的 JSON 值，失败返回 `UpstreamError`。
    async fn get(&self, path: &str) -> Result<Value, UpstreamError>;
}
