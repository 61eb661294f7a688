use serde::{Deserialize, Serialize};
use serde_json::Value;

/// # Summary
/// 标准化后的行情列表页实体，是 /api/markets 的规范载荷。
/// 上游返回的裸数组、`{list,total}`、`{data,total}` 三种形态
/// 统一收敛到本结构。
///
/// # Invariants
/// - `list.len()` 不必等于 `total`：上游可能汇报大于当前页的总数。
/// - 市场记录本身对代理不透明，原样透传 (`serde_json::Value`)。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketsPage {
    // 上游汇报的记录总数
    pub total: u64,
    // 当前页的市场记录列表
    pub list: Vec<Value>,
}

impl MarketsPage {
    /// 空页，用于无法识别的上游载荷形态
    pub fn empty() -> Self {
        Self::default()
    }
}

/// # Summary
/// 行情分页参数，同时充当缓存键的来源。
///
/// # Invariants
/// - `limit` 与 `page` 必须为正数，校验由 API 层在触达缓存前完成。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub limit: i64,
    pub page: i64,
}

impl Pagination {
    /// 组合出按 (limit, page) 唯一的缓存键
    pub fn cache_key(&self) -> String {
        format!("markets:{}:{}", self.limit, self.page)
    }

    /// 两个参数均为正数时才是合法的分页请求
    pub fn is_valid(&self) -> bool {
        self.limit > 0 && self.page > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_is_unique_per_pagination() {
        let a = Pagination { limit: 20, page: 1 };
        let b = Pagination { limit: 20, page: 2 };
        let c = Pagination { limit: 2, page: 2 };
        assert_ne!(a.cache_key(), b.cache_key());
        assert_ne!(b.cache_key(), c.cache_key());
    }

    #[test]
    fn test_pagination_validity() {
        assert!(Pagination { limit: 20, page: 1 }.is_valid());
        assert!(!Pagination { limit: 0, page: 1 }.is_valid());
        assert!(!Pagination { limit: 20, page: 0 }.is_valid());
        assert!(!Pagination { limit: -5, page: 1 }.is_valid());
    }
}
