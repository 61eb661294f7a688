//! # API 服务启动器
//!
//! 组装 axum 路由、挂载 Swagger UI、配置 CORS 来源准入并绑定 TCP 端口对外提供服务。
//! 本模块不直接启动 `main()`, 而是由 `crates/app` 的 DI 容器持有并调用。

use std::sync::Arc;

use axum::Router;
use axum::http::HeaderValue;
use axum::http::request::Parts;
use axum::routing::get;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;
use utoipa_swagger_ui::SwaggerUi;

use optrack_core::cache::port::Cache;
use optrack_core::config::AppConfig;
use optrack_core::upstream::port::UpstreamPort;

use crate::routes::{health, market, portfolio, trade};

// ============================================================
//  共享应用状态
// ============================================================

/// 全局应用状态，通过 axum 的 `State` 提取器注入到每个 Handler 中。
///
/// # Invariants
/// - `upstream` 与 `cache` 在服务启动前由 DI 容器注入，生命周期与进程等同。
/// - `upstream` 注入的是已叠加重试装饰器的端口，Handler 不感知重试。
#[derive(Clone)]
pub struct AppState {
    /// 上游访问端口 (含重试)
    pub upstream: Arc<dyn UpstreamPort>,
    /// 行情结果缓存
    pub cache: Arc<dyn Cache>,
    /// 全局配置
    pub config: Arc<AppConfig>,
}

// ============================================================
//  OpenAPI 文档定义
// ============================================================

/// 全局 OpenAPI 文档结构
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Opinion Portfolio Tracker API",
        version = "1.0.0",
        description = "Opinion 交易数据的轻量代理网关。提供持仓、成交、行情与余额转发接口。",
        license(name = "MIT")
    ),
    tags(
        (name = "系统 (System)", description = "健康检查"),
        (name = "行情 (Market)", description = "市场列表查询 (标准化 + 缓存)"),
        (name = "持仓 (Portfolio)", description = "按钱包地址查询持仓与余额"),
        (name = "交易 (Trade)", description = "按钱包地址查询成交记录")
    )
)]
pub struct ApiDoc;

// ============================================================
//  服务构建与启动
// ============================================================

/// # Summary
/// 构建完整的 axum 应用路由树 (含 Swagger UI、落地页与 CORS 层)。
///
/// # Logic
/// 1. 通过 `OpenApiRouter` 注册全部 REST 路由并收集 OpenAPI 文档。
/// 2. 追加不进入文档的 HTML 落地页。
/// 3. 以配置驱动的来源断言套上 CORS 层：不携带 Origin 的请求天然放行，
///    列表内来源放行，开发模式额外放行本机来源，其余拒绝。
pub fn build_router(state: AppState) -> Router {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .routes(routes!(health::health))
        .routes(routes!(health::api_health))
        .routes(routes!(market::get_markets))
        .routes(routes!(portfolio::get_positions))
        .routes(routes!(portfolio::get_balance))
        .routes(routes!(trade::get_trades))
        .with_state(state.clone())
        .split_for_parts();

    let cors_config = state.config.cors.clone();
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(
            move |origin: &HeaderValue, _parts: &Parts| {
                origin
                    .to_str()
                    .map(|o| cors_config.is_allowed(o))
                    .unwrap_or(false)
            },
        ))
        .allow_methods(Any)
        .allow_headers(Any);

    router
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api))
        .route("/", get(health::landing))
        .layer(cors)
}

/// # Summary
/// 启动 HTTP 监听并一直服务到收到退出信号。
///
/// # Arguments
/// * `state` - 由外部 DI 容器注入的共享状态
/// * `bind_addr` - 监听的地址与端口，如 `"0.0.0.0:3001"`
pub async fn start_server(
    state: AppState,
    bind_addr: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = build_router(state);

    tracing::info!("🚀 Opinion Portfolio Tracker API listening on {}", bind_addr);
    tracing::info!("📖 Swagger UI: http://{}/swagger-ui/", bind_addr);

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

// ctrl-c 触发优雅退出；信号注册失败时挂起等价于不支持优雅退出
async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received. Exiting...");
}
