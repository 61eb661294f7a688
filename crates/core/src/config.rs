use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 全局应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
    pub retry: RetryConfig,
    pub cache: CacheConfig,
    pub cors: CorsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Opinion 上游 API 访问配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout_ms: u64,
}

impl UpstreamConfig {
    /// 单次请求的超时时长
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// 上游请求重试策略配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// 首次请求之外允许的最大重试次数
    pub max_retries: u32,
    /// 线性退避的基础等待毫秒数 (第 n 次重试等待 n * base_delay_ms)
    pub base_delay_ms: u64,
}

impl RetryConfig {
    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }
}

/// 行情缓存配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// /api/markets 标准化结果的存活毫秒数
    pub markets_ttl_ms: u64,
}

impl CacheConfig {
    pub fn markets_ttl(&self) -> Duration {
        Duration::from_millis(self.markets_ttl_ms)
    }
}

/// CORS 来源准入配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// 显式放行的前端来源列表 (来自 FRONTEND_ORIGIN 环境变量)
    pub allowed_origins: Vec<String>,
    /// 开发模式下额外放行任意 localhost / 127.0.0.1 来源
    pub dev_mode: bool,
}

impl CorsConfig {
    /// # Summary
    /// 判断一个携带 Origin 头的请求来源是否被放行。
    ///
    /// # Logic
    /// 1. 命中显式列表则放行。
    /// 2. 开发模式下，来源指向本机 (localhost / 127.0.0.1) 亦放行。
    /// 3. 其余来源一律拒绝。不携带 Origin 的请求不经过本判断。
    pub fn is_allowed(&self, origin: &str) -> bool {
        if self.allowed_origins.iter().any(|o| o == origin) {
            return true;
        }
        if self.dev_mode {
            return ["http://localhost", "https://localhost", "http://127.0.0.1", "https://127.0.0.1"]
                .iter()
                .any(|prefix| origin.starts_with(prefix));
        }
        false
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3001,
            },
            upstream: UpstreamConfig {
                base_url: "https://openapi.opinion.trade/openapi".to_string(),
                api_key: String::new(), // Default for dev, should be overwritten by env
                timeout_ms: 8_000,
            },
            retry: RetryConfig {
                max_retries: 2,
                base_delay_ms: 500,
            },
            cache: CacheConfig {
                markets_ttl_ms: 30_000,
            },
            cors: CorsConfig {
                allowed_origins: Vec::new(),
                dev_mode: true,
            },
        }
    }
}
