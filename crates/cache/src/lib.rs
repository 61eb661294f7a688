//! # `optrack-cache` - 内存 TTL 缓存
//!
//! `optrack-core` 缓存端口的进程内实现。
//! 条目随请求惰性过期，不运行任何后台清扫任务。

pub mod mem;
