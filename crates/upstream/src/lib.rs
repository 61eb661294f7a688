//! # `optrack-upstream` - Opinion 上游接入层
//!
//! `optrack-core` 上游端口的具体实现：
//! - `client` 负责单次 HTTP 调用与错误归类
//! - `retry` 以装饰器形式为任意端口叠加有界线性退避重试
//! - `normalize` 把上游的多种载荷形态收敛为规范的 `MarketsPage`

pub mod client;
pub mod normalize;
pub mod retry;
