use async_trait::async_trait;
use optrack_core::config::UpstreamConfig;
use optrack_core::upstream::error::UpstreamError;
use optrack_core::upstream::port::UpstreamPort;
use reqwest::Client;
use serde_json::Value;

/// # Summary
/// Opinion 开放 API 的 HTTP 客户端实现。
///
/// # Invariants
/// - 使用 `reqwest` 异步客户端进行通讯，超时与鉴权头在构造时固定。
/// - 每次 `get` 只发起一次尝试，重试由 `retry::Retrying` 装饰器负责。
#[derive(Clone)]
pub struct OpinionClient {
    /// 内部使用的 HTTP 客户端
    client: Client,
    /// 上游基地址，如 `https://openapi.opinion.trade/openapi`
    base_url: String,
}

impl OpinionClient {
    /// # Summary
    /// 按配置创建一个新的 OpinionClient 实例。
    ///
    /// # Logic
    /// 1. 配置固定请求超时 (默认 8 秒)。
    /// 2. 设置 `apikey` 鉴权头与 `Content-Type`。
    /// 3. 初始化 reqwest 客户端。
    ///
    /// # Arguments
    /// * `config`: 上游访问配置。
    ///
    /// # Returns
    /// 返回初始化后的 OpinionClient。
    pub fn new(config: &UpstreamConfig) -> Self {
        let mut headers = reqwest::header::HeaderMap::new();
        match config.api_key.parse() {
            Ok(value) => {
                headers.insert("apikey", value);
            }
            Err(_) => {
                tracing::warn!("apikey contains non-header characters, requests go out unauthenticated");
            }
        }
        headers.insert(
            reqwest::header::CONTENT_TYPE,
            reqwest::header::HeaderValue::from_static("application/json"),
        );

        Self {
            client: Client::builder()
                .timeout(config.timeout())
                .default_headers(headers)
                .build()
                .expect("Failed to build HTTP client"),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl UpstreamPort for OpinionClient {
    /// # Summary
    /// 对上游执行单次 GET 请求并返回原始 JSON 载荷。
    ///
    /// # Logic
    /// 1. 拼接基地址与相对路径。
    /// 2. 发起请求；超时与传输故障归类为无状态码失败。
    /// 3. 非 2xx 应答保留状态码，并尽量把应答体解析为 JSON 随错误携带。
    /// 4. 2xx 应答解析为 JSON 值返回。
    ///
    /// # Arguments
    /// * `path`: 相对路径 (含查询串)。
    ///
    /// # Returns
    /// 成功返回 JSON 载荷，失败返回 `UpstreamError`。
    async fn get(&self, path: &str) -> Result<Value, UpstreamError> {
        let url = format!("{}{}", self.base_url, path);

        let resp = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                UpstreamError::Timeout
            } else {
                UpstreamError::Network(e.to_string())
            }
        })?;

        let status = resp.status();
        if !status.is_success() {
            // 应答体无法解析为 JSON 时只携带状态码
            let body = resp
                .bytes()
                .await
                .ok()
                .and_then(|bytes| serde_json::from_slice(&bytes).ok());
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body,
            });
        }

        resp.json()
            .await
            .map_err(|e| UpstreamError::Decode(e.to_string()))
    }
}
