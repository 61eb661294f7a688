use crate::upstream::error::UpstreamError;
use crate::upstream::port::UpstreamPort;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// # Summary
/// 测试专用的上游桩实现，按脚本顺序弹出预置应答并统计调用。
///
/// # Invariants
/// - 应答队列耗尽后返回 `Network` 错误，提示脚本配置不足。
/// - 调用计数与路径记录对测试断言可见。
pub struct MockUpstream {
    responses: Mutex<VecDeque<Result<Value, UpstreamError>>>,
    calls: AtomicUsize,
    paths: Mutex<Vec<String>>,
}

impl MockUpstream {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
            paths: Mutex::new(Vec::new()),
        }
    }

    /// 追加一条预置应答 (按先进先出顺序消费)
    pub fn push_response(&self, response: Result<Value, UpstreamError>) {
        if let Ok(mut queue) = self.responses.lock() {
            queue.push_back(response);
        }
    }

    /// 已发生的上游调用总数
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// 按调用顺序记录的请求路径
    pub fn requested_paths(&self) -> Vec<String> {
        self.paths.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

impl Default for MockUpstream {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UpstreamPort for MockUpstream {
    async fn get(&self, path: &str) -> Result<Value, UpstreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut paths) = self.paths.lock() {
            paths.push(path.to_string());
        }
        let scripted = self.responses.lock().ok().and_then(|mut queue| queue.pop_front());
        match scripted {
            Some(response) => response,
            None => Err(UpstreamError::Network(
                "mock upstream: response queue exhausted".to_string(),
            )),
        }
    }
}
