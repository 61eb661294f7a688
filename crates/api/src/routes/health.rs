//! # 系统路由控制器
//!
//! 落地页与健康检查。健康检查同时挂载在 `/health` 与 `/api/health`
//! 两个路径上，兼容旧版前端与部署探针。

use axum::Json;
use axum::response::Html;

use crate::types::HealthResponse;

// 落地页：提示这是纯后端服务，并指向健康检查
const LANDING_HTML: &str = r#"<!doctype html>
<html lang="uk">
  <head>
    <meta charset="utf-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1" />
    <title>Opinion Portfolio Tracker</title>
    <style>
      body { font-family: Arial, sans-serif; background: #0f1115; color: #f5f5f5; margin: 0; }
      main { max-width: 720px; margin: 48px auto; padding: 0 16px; }
      a { color: #7dd3fc; }
      code { background: #1f2937; padding: 2px 6px; border-radius: 4px; }
    </style>
  </head>
  <body>
    <main>
      <h1>Opinion Portfolio Tracker</h1>
      <p>Це бекенд API. Для сайту потрібен окремий фронтенд-деплой (Vercel/Netlify).</p>
      <p>Health-check: <a href="/health"><code>/health</code></a></p>
    </main>
  </body>
</html>"#;

/// HTML 落地页
pub async fn landing() -> Html<&'static str> {
    Html(LANDING_HTML)
}

/// 健康检查
#[utoipa::path(
    get,
    path = "/health",
    tag = "系统 (System)",
    responses(
        (status = 200, description = "服务存活", body = HealthResponse)
    )
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

/// 健康检查 (兼容旧版 `/api` 前缀)
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "系统 (System)",
    responses(
        (status = 200, description = "服务存活", body = HealthResponse)
    )
)]
pub async fn api_health() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
