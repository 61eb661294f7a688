//! # 成交记录路由控制器

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::server::AppState;
use crate::types::{DataEnvelope, ErrorEnvelope};

#[derive(Deserialize, ToSchema)]
pub struct TradesQuery {
    pub limit: Option<i64>,
}

/// 查询指定钱包的成交记录
#[utoipa::path(
    get,
    path = "/api/trades/{wallet_address}",
    tag = "交易 (Trade)",
    params(
        ("wallet_address" = String, Path, description = "用户钱包地址"),
        ("limit" = Option<i64>, Query, description = "返回条数，默认 50")
    ),
    responses(
        (status = 200, description = "成功获取成交记录", body = DataEnvelope),
        (status = 502, description = "上游失败", body = ErrorEnvelope)
    )
)]
pub async fn get_trades(
    State(state): State<AppState>,
    Path(wallet_address): Path<String>,
    Query(query): Query<TradesQuery>,
) -> Result<Json<DataEnvelope>, ApiError> {
    let limit = query.limit.unwrap_or(50);
    let path = format!("/trade/user/{}?limit={}", wallet_address, limit);
    let data = state.upstream.get(&path).await?;
    Ok(Json(DataEnvelope::ok(data)))
}
