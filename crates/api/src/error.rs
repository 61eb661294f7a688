//! # API 统一错误处理
//!
//! 将校验失败、上游失败与内部异常统一映射到 HTTP 状态码与 JSON 失败信封。

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use optrack_core::upstream::error::UpstreamError;

use crate::types::ErrorEnvelope;

/// API 层统一错误枚举
#[derive(Error, Debug)]
pub enum ApiError {
    /// 请求参数错误 (400)，在触达缓存与上游之前拦截
    #[error("请求参数错误: {0}")]
    BadRequest(String),

    /// 上游失败 (上游状态码，未知时 502)
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    /// 处理过程中的未预期异常 (500)
    #[error("内部服务错误: {0}")]
    Internal(String),
}

/// 将 `ApiError` 转换为 axum 的 HTTP 响应
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, upstream) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, None),
            ApiError::Upstream(err) => {
                let status = err
                    .status()
                    .and_then(|code| StatusCode::from_u16(code).ok())
                    .unwrap_or(StatusCode::BAD_GATEWAY);
                let upstream = err.upstream_body().cloned();
                (status, err.to_string(), upstream)
            }
            ApiError::Internal(msg) => {
                // 内部错误只记录日志，不向客户端透传细节
                tracing::error!("内部服务错误: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "服务器内部错误".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorEnvelope {
            ok: false,
            error: message,
            status: status.as_u16(),
            upstream,
        });
        (status, body).into_response()
    }
}
