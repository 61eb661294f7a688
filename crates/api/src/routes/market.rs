//! # 行情路由控制器
//!
//! 实现 `/api/markets` 转发接口，是本服务中唯一带策略的路径：
//! 分页校验 → 缓存查询 → (未命中) 带重试上游拉取 → 标准化 → 缓存写回。

use axum::Json;
use axum::extract::{Query, State};
use serde::Deserialize;
use utoipa::ToSchema;

use optrack_core::cache::port::CacheExt;
use optrack_core::market::entity::{MarketsPage, Pagination};
use optrack_upstream::normalize::normalize_markets;

use crate::error::ApiError;
use crate::server::AppState;
use crate::types::{ErrorEnvelope, MarketsEnvelope};

#[derive(Deserialize, ToSchema)]
pub struct MarketsQuery {
    pub limit: Option<i64>,
    pub page: Option<i64>,
}

/// 获取市场列表 (标准化 + 30 秒缓存)
///
/// 上游的裸数组、`{list,total}`、`{data,total}` 三种载荷形态统一
/// 收敛为 `{ok,total,list}`。同一 (limit, page) 的结果在 TTL 窗口内
/// 直接出缓存，不触发上游调用。
#[utoipa::path(
    get,
    path = "/api/markets",
    tag = "行情 (Market)",
    params(
        ("limit" = Option<i64>, Query, description = "每页条数，默认 20，必须为正数"),
        ("page" = Option<i64>, Query, description = "页码，默认 1，必须为正数")
    ),
    responses(
        (status = 200, description = "成功获取市场列表", body = MarketsEnvelope),
        (status = 400, description = "分页参数非法", body = ErrorEnvelope),
        (status = 502, description = "上游失败", body = ErrorEnvelope)
    )
)]
pub async fn get_markets(
    State(state): State<AppState>,
    Query(query): Query<MarketsQuery>,
) -> Result<Json<MarketsEnvelope>, ApiError> {
    let pagination = Pagination {
        limit: query.limit.unwrap_or(20),
        page: query.page.unwrap_or(1),
    };

    // 校验先于缓存与上游
    if !pagination.is_valid() {
        return Err(ApiError::BadRequest(
            "limit and page must be positive integers".to_string(),
        ));
    }

    let key = pagination.cache_key();

    // 缓存故障降级为未命中，不影响请求本身
    match state.cache.get::<MarketsPage>(&key).await {
        Ok(Some(page)) => {
            tracing::debug!("markets cache hit for {}", key);
            return Ok(Json(page.into()));
        }
        Ok(None) => {}
        Err(err) => {
            tracing::warn!("markets cache lookup failed, treating as miss: {}", err);
        }
    }

    let path = format!(
        "/markets?limit={}&page={}",
        pagination.limit, pagination.page
    );
    let body = state.upstream.get(&path).await?;
    let page = normalize_markets(&body);

    if let Err(err) = state
        .cache
        .set(&key, &page, state.config.cache.markets_ttl())
        .await
    {
        tracing::warn!("markets cache store failed: {}", err);
    }

    Ok(Json(page.into()))
}
