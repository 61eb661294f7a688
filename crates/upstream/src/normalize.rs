use optrack_core::market::entity::MarketsPage;
use serde_json::Value;

/// # Summary
/// 把上游 /markets 的异构载荷收敛为规范的 `MarketsPage`。
///
/// # Logic
/// 按固定顺序对一个封闭的形态集合做显式判定，首个命中者生效：
/// 1. 载荷本身是数组 → `list` 取载荷，`total` 取其长度。
/// 2. 载荷的 `list` 字段是数组 → `list` 取该字段，`total` 优先取
///    载荷的 `total` 字段，缺失或类型不符时退化为列表长度。
/// 3. 载荷的 `data` 字段是数组 → 同上，以 `data` 充当列表。
/// 4. 均不命中 → 空页 `{ total: 0, list: [] }`。
///
/// # Arguments
/// * `body`: 上游返回的原始 JSON 载荷。
///
/// # Returns
/// 规范化结果；本函数是纯函数，永不失败。
pub fn normalize_markets(body: &Value) -> MarketsPage {
    if let Some(items) = body.as_array() {
        return MarketsPage {
            total: items.len() as u64,
            list: items.clone(),
        };
    }
    if let Some(items) = body.get("list").and_then(Value::as_array) {
        return MarketsPage {
            total: reported_total(body, items),
            list: items.clone(),
        };
    }
    if let Some(items) = body.get("data").and_then(Value::as_array) {
        return MarketsPage {
            total: reported_total(body, items),
            list: items.clone(),
        };
    }
    MarketsPage::empty()
}

// `total` 字段缺失、为负或非整数时退化为列表长度
fn reported_total(body: &Value, items: &[Value]) -> u64 {
    body.get("total")
        .and_then(Value::as_u64)
        .unwrap_or(items.len() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bare_array_shape() {
        let page = normalize_markets(&json!([{"a": 1}]));
        assert_eq!(page.total, 1);
        assert_eq!(page.list, vec![json!({"a": 1})]);
    }

    #[test]
    fn test_list_field_with_reported_total() {
        let page = normalize_markets(&json!({"list": [{"a": 1}, {"a": 2}], "total": 5}));
        assert_eq!(page.total, 5);
        assert_eq!(page.list.len(), 2);
    }

    #[test]
    fn test_data_field_without_total_falls_back_to_len() {
        let page = normalize_markets(&json!({"data": [{"a": 1}]}));
        assert_eq!(page.total, 1);
        assert_eq!(page.list, vec![json!({"a": 1})]);
    }

    #[test]
    fn test_unrecognized_shape_degrades_to_empty_page() {
        assert_eq!(normalize_markets(&json!({})), MarketsPage::empty());
        assert_eq!(normalize_markets(&json!("markets")), MarketsPage::empty());
        assert_eq!(normalize_markets(&json!(null)), MarketsPage::empty());
    }

    #[test]
    fn test_list_field_wins_over_data_field() {
        let page = normalize_markets(&json!({
            "list": [{"a": 1}],
            "data": [{"b": 1}, {"b": 2}],
        }));
        assert_eq!(page.total, 1);
        assert_eq!(page.list, vec![json!({"a": 1})]);
    }

    #[test]
    fn test_invalid_total_type_falls_back_to_len() {
        let negative = normalize_markets(&json!({"list": [{"a": 1}], "total": -3}));
        assert_eq!(negative.total, 1);

        let fractional = normalize_markets(&json!({"list": [{"a": 1}], "total": 2.5}));
        assert_eq!(fractional.total, 1);

        let stringly = normalize_markets(&json!({"list": [{"a": 1}], "total": "7"}));
        assert_eq!(stringly.total, 1);
    }

    #[test]
    fn test_total_may_exceed_page_length() {
        let page = normalize_markets(&json!({"list": [{"a": 1}], "total": 400}));
        assert_eq!(page.total, 400);
        assert_eq!(page.list.len(), 1);
    }
}
