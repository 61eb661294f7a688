//! # 持仓与余额路由控制器
//!
//! 纯转发：按钱包地址查询上游的持仓列表与账户余额，
//! 成功载荷不做形态改写，原样装入 `{ok,data}` 信封。

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::server::AppState;
use crate::types::{DataEnvelope, ErrorEnvelope};

#[derive(Deserialize, ToSchema)]
pub struct PositionsQuery {
    pub limit: Option<i64>,
}

/// 查询指定钱包的持仓列表
#[utoipa::path(
    get,
    path = "/api/positions/{wallet_address}",
    tag = "持仓 (Portfolio)",
    params(
        ("wallet_address" = String, Path, description = "用户钱包地址"),
        ("limit" = Option<i64>, Query, description = "返回条数，默认 20")
    ),
    responses(
        (status = 200, description = "成功获取持仓", body = DataEnvelope),
        (status = 502, description = "上游失败", body = ErrorEnvelope)
    )
)]
pub async fn get_positions(
    State(state): State<AppState>,
    Path(wallet_address): Path<String>,
    Query(query): Query<PositionsQuery>,
) -> Result<Json<DataEnvelope>, ApiError> {
    let limit = query.limit.unwrap_or(20);
    let path = format!("/positions/user/{}?limit={}", wallet_address, limit);
    let data = state.upstream.get(&path).await?;
    Ok(Json(DataEnvelope::ok(data)))
}

/// 查询指定钱包的账户余额
#[utoipa::path(
    get,
    path = "/api/balance/{wallet_address}",
    tag = "持仓 (Portfolio)",
    params(
        ("wallet_address" = String, Path, description = "用户钱包地址")
    ),
    responses(
        (status = 200, description = "成功获取余额", body = DataEnvelope),
        (status = 502, description = "上游失败", body = ErrorEnvelope)
    )
)]
pub async fn get_balance(
    State(state): State<AppState>,
    Path(wallet_address): Path<String>,
) -> Result<Json<DataEnvelope>, ApiError> {
    let path = format!("/balance/user/{}", wallet_address);
    let data = state.upstream.get(&path).await?;
    Ok(Json(DataEnvelope::ok(data)))
}
