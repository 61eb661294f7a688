use std::sync::Arc;

use optrack_api::server::{AppState, start_server};
use optrack_cache::mem::MemCache;
use optrack_core::common::time::RealTimeProvider;
use optrack_core::config::AppConfig;
use optrack_upstream::client::OpinionClient;
use optrack_upstream::retry::{Retrying, RetryPolicy};
use tracing::info;

/// # Summary
/// 从进程环境加载配置：默认值之上叠加环境变量覆盖。
///
/// # Logic
/// 1. `.env` 文件先行载入 (存在则生效，缺失则静默跳过)。
/// 2. `PORT` / `OPINION_API_KEY` / `FRONTEND_ORIGIN` / `NODE_ENV`
///    逐项覆盖默认配置；缺失或无法解析的项保留默认值。
fn load_config() -> Result<AppConfig, Box<dyn std::error::Error>> {
    let mut app_config = AppConfig::default();

    let env = config::Config::builder()
        .add_source(config::Environment::default())
        .build()?;

    if let Ok(port) = env.get_int("port") {
        app_config.server.port = u16::try_from(port)?;
    }
    if let Ok(api_key) = env.get_string("opinion_api_key") {
        app_config.upstream.api_key = api_key;
    }
    if let Ok(origins) = env.get_string("frontend_origin") {
        // 逗号分隔的来源列表
        app_config.cors.allowed_origins = origins
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();
    }
    if let Ok(node_env) = env.get_string("node_env") {
        app_config.cors.dev_mode = node_env != "production";
    }

    Ok(app_config)
}

/// # Summary
/// 应用启动入口，纯粹的 DI 容器。
/// 负责实例化所有具体实现组件并通过 Arc<dyn Trait> 注入到 API 层。
///
/// # Logic
/// 1. 载入 .env 与全局日志。
/// 2. 从环境加载配置。
/// 3. 实例化基础设施层（时钟、缓存、上游客户端）。
/// 4. 为上游客户端叠加重试装饰器。
/// 5. 组装共享状态并启动 HTTP 服务，直至收到退出信号。
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 0. 安装 reqwest (rustls-no-provider) 所需的 ring 加密提供者
    //    重复安装返回 Err，忽略即可。
    if rustls::crypto::ring::default_provider().install_default().is_err() {
        tracing::debug!("rustls crypto provider already installed");
    }

    // 1. 载入 .env 与初始化日志
    dotenv::dotenv().ok();
    tracing_subscriber::fmt::init();
    info!("Opinion Portfolio Tracker proxy starting...");

    // 2. 加载配置
    let app_config = Arc::new(load_config()?);
    if app_config.upstream.api_key.is_empty() {
        tracing::warn!("OPINION_API_KEY is not set, upstream calls will be unauthenticated");
    }

    // 3. 实例化基础设施层
    let clock = Arc::new(RealTimeProvider);
    let cache = Arc::new(MemCache::new(clock));
    let client = Arc::new(OpinionClient::new(&app_config.upstream));

    // 4. 叠加重试装饰器（Handler 只见到装饰后的端口）
    let upstream = Arc::new(Retrying::new(
        client,
        RetryPolicy::from(&app_config.retry),
    ));

    // 5. 组装状态并启动服务
    let state = AppState {
        upstream,
        cache,
        config: app_config.clone(),
    };
    let bind_addr = format!("{}:{}", app_config.server.host, app_config.server.port);
    start_server(state, &bind_addr).await?;

    info!("Server stopped. Exiting...");
    Ok(())
}
