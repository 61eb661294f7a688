//! # DTO (Data Transfer Object) 层
//!
//! 面向前端 JSON 输出的统一信封结构体。
//! 所有 DTO 必须派生 `utoipa::ToSchema` 以自动进入 Swagger 文档。

use optrack_core::market::entity::MarketsPage;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

// ============================================================
//  成功信封
// ============================================================

/// 透传型成功信封 - 持仓 / 成交 / 余额接口共用
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DataEnvelope {
    /// 固定为 true
    pub ok: bool,
    /// 上游原样透传的数据载荷
    #[schema(value_type = Object)]
    pub data: Value,
}

impl DataEnvelope {
    /// 构建成功响应
    pub fn ok(data: Value) -> Self {
        Self { ok: true, data }
    }
}

/// 行情列表成功信封 - 承载标准化后的分页结果
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MarketsEnvelope {
    /// 固定为 true
    pub ok: bool,
    /// 上游汇报的记录总数 (可能大于当前页长度)
    #[schema(example = 400)]
    pub total: u64,
    /// 当前页的市场记录列表
    #[schema(value_type = Vec<Object>)]
    pub list: Vec<Value>,
}

impl From<MarketsPage> for MarketsEnvelope {
    fn from(page: MarketsPage) -> Self {
        Self {
            ok: true,
            total: page.total,
            list: page.list,
        }
    }
}

/// 健康检查响应
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// 固定为 true
    pub ok: bool,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self { ok: true }
    }
}

// ============================================================
//  失败信封
// ============================================================

/// 统一失败信封
///
/// 每次失败现场构建，绝不进入缓存。
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorEnvelope {
    /// 固定为 false
    pub ok: bool,
    /// 人类可读的错误描述
    pub error: String,
    /// 与 HTTP 应答一致的状态码回显
    #[schema(example = 502)]
    pub status: u16,
    /// 捕获到的上游应答体 (仅上游失败且应答体可解析时存在)
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub upstream: Option<Value>,
}
