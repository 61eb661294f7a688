use serde_json::Value;
use thiserror::Error;

/// # Summary
/// 上游 API 域错误枚举，覆盖网络故障、超时、非 2xx 应答与解码失败。
///
/// # Invariants
/// - 必须通过 `thiserror` 派生 `Error` trait。
/// - 重试资格只由捕获到的 HTTP 状态码决定，无状态码的失败不重试。
#[derive(Error, Debug)]
pub enum UpstreamError {
    // 上游返回了非 2xx 状态码，尽量保留其 JSON 应答体
    #[error("upstream returned HTTP {status}")]
    Status { status: u16, body: Option<Value> },
    // 网络层错误，包含底层 HTTP 客户端错误信息
    #[error("network error: {0}")]
    Network(String),
    // 请求超过固定的客户端超时
    #[error("upstream request timed out")]
    Timeout,
    // 2xx 应答但载荷不是合法 JSON
    #[error("decode error: {0}")]
    Decode(String),
}

impl UpstreamError {
    /// 捕获到的上游 HTTP 状态码 (网络失败与超时没有状态码)
    pub fn status(&self) -> Option<u16> {
        match self {
            UpstreamError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// 保留下来的上游应答体 (用于错误信封透传)
    pub fn upstream_body(&self) -> Option<&Value> {
        match self {
            UpstreamError::Status { body, .. } => body.as_ref(),
            _ => None,
        }
    }

    /// # Summary
    /// 判断本次失败是否具备重试资格。
    ///
    /// # Logic
    /// 1. 429 (限流) 与 [500, 600) 区间的服务端错误可重试。
    /// 2. 其余客户端错误 (如 400/404) 与无状态码的失败立即失败。
    pub fn is_retryable(&self) -> bool {
        match self.status() {
            Some(429) => true,
            Some(status) => (500..600).contains(&status),
            None => false,
        }
    }
}
