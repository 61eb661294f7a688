//! # `optrack-api` - HTTP API 网关
//!
//! 本 crate 是 Opinion Portfolio Tracker 代理后端的 HTTP/REST 服务入口。
//! 使用 `axum` 构建路由与控制器，通过 `utoipa` 自动生成 OpenAPI 3.0 Swagger 文档。
//!
//! ## 架构职责
//! - 接收来自浏览器前端的 HTTP 请求并执行 CORS 来源准入
//! - 校验分页参数后调用缓存与上游端口完成数据转发
//! - 把上游结果包装为统一的 `{ok, ...}` 信封返回给前端

pub mod error;
pub mod routes;
pub mod server;
pub mod types;
