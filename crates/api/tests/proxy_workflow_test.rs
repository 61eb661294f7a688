use std::sync::Arc;
use std::time::Duration;

use serde_json::{Value, json};
use tokio::net::TcpListener;

use optrack_api::server::{AppState, build_router};
use optrack_cache::mem::MemCache;
use optrack_core::common::time::FakeClockProvider;
use optrack_core::config::AppConfig;
use optrack_core::upstream::error::UpstreamError;
use optrack_core::upstream::mock::MockUpstream;
use optrack_upstream::retry::{Retrying, RetryPolicy};

// 帮助函数：在随机端口启动测试服务器，上游与时钟均为可控桩
async fn spawn_test_server(config: AppConfig) -> (String, Arc<MockUpstream>, Arc<FakeClockProvider>) {
    // reqwest 的 rustls-no-provider 构建要求进程内预装 ring 加密提供者。
    // 幂等：重复安装返回 Err，忽略即可。
    let _ = rustls::crypto::ring::default_provider().install_default();

    let mock = Arc::new(MockUpstream::new());
    let clock = Arc::new(FakeClockProvider::new(0));
    let cache = Arc::new(MemCache::new(clock.clone()));

    // 退避压缩到 10ms，保持重试语义的同时让测试快速结束
    let policy = RetryPolicy {
        max_retries: config.retry.max_retries,
        base_delay: Duration::from_millis(10),
    };
    let upstream = Arc::new(Retrying::new(mock.clone(), policy));

    let state = AppState {
        upstream,
        cache,
        config: Arc::new(config),
    };

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let addr = format!("http://127.0.0.1:{}", port);

    let router = build_router(state);
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    (addr, mock, clock)
}

#[tokio::test]
async fn test_full_proxy_workflow() {
    let _ = tracing_subscriber::fmt().with_env_filter("debug").try_init();

    let (base_url, mock, _clock) = spawn_test_server(AppConfig::default()).await;
    let client = reqwest::Client::new();

    // ============================================
    // Case 1: 落地页与健康检查
    // ============================================
    let res = client.get(format!("{}/", base_url)).send().await.unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::OK);
    let html = res.text().await.unwrap();
    assert!(html.contains("Opinion Portfolio Tracker"));

    for path in ["/health", "/api/health"] {
        let res = client.get(format!("{}{}", base_url, path)).send().await.unwrap();
        assert_eq!(res.status(), reqwest::StatusCode::OK);
        let body: Value = res.json().await.unwrap();
        assert_eq!(body, json!({"ok": true}));
    }

    // ============================================
    // Case 2: 分页参数非法 → 400，且不触达上游
    // ============================================
    for bad in ["limit=0", "page=0", "limit=-5", "limit=20&page=-1"] {
        let res = client
            .get(format!("{}/api/markets?{}", base_url, bad))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), reqwest::StatusCode::BAD_REQUEST);
        let body: Value = res.json().await.unwrap();
        assert_eq!(body["ok"], json!(false));
        assert_eq!(body["status"], json!(400));
    }
    assert_eq!(mock.calls(), 0);

    // ============================================
    // Case 3: 行情拉取 → 标准化信封，分页参数透传上游
    // ============================================
    mock.push_response(Ok(json!({
        "list": [{"id": 1}, {"id": 2}, {"id": 3}],
        "total": 3,
    })));
    let res = client
        .get(format!("{}/api/markets?limit=20&page=1", base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["ok"], json!(true));
    assert_eq!(body["total"], json!(3));
    assert_eq!(body["list"].as_array().unwrap().len(), 3);
    assert_eq!(mock.calls(), 1);
    assert_eq!(mock.requested_paths(), vec!["/markets?limit=20&page=1".to_string()]);

    // ============================================
    // Case 4: TTL 窗口内重复请求 → 缓存命中，零上游调用
    // ============================================
    let res = client
        .get(format!("{}/api/markets?limit=20&page=1", base_url))
        .send()
        .await
        .unwrap();
    let cached: Value = res.json().await.unwrap();
    assert_eq!(cached, body);
    assert_eq!(mock.calls(), 1);

    // 不同分页键各自独立未命中
    mock.push_response(Ok(json!({"data": [{"id": 9}]})));
    let res = client
        .get(format!("{}/api/markets?limit=20&page=2", base_url))
        .send()
        .await
        .unwrap();
    let second_page: Value = res.json().await.unwrap();
    assert_eq!(second_page["total"], json!(1));
    assert_eq!(mock.calls(), 2);

    // ============================================
    // Case 5: 上游 500 两次后恢复 → 重试对调用方透明
    // ============================================
    mock.push_response(Err(UpstreamError::Status { status: 500, body: None }));
    mock.push_response(Err(UpstreamError::Status { status: 500, body: None }));
    mock.push_response(Ok(json!([{"id": 42}])));
    let res = client
        .get(format!("{}/api/markets?limit=5&page=1", base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::OK);
    let recovered: Value = res.json().await.unwrap();
    assert_eq!(recovered["total"], json!(1));
    assert_eq!(mock.calls(), 5);

    // ============================================
    // Case 6: 上游 404 → 立即失败，信封回显状态码与上游应答体
    // ============================================
    mock.push_response(Err(UpstreamError::Status {
        status: 404,
        body: Some(json!({"code": 404, "msg": "wallet not found"})),
    }));
    let res = client
        .get(format!("{}/api/positions/0xdeadbeef?limit=10", base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::NOT_FOUND);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["ok"], json!(false));
    assert_eq!(body["status"], json!(404));
    assert_eq!(body["upstream"]["msg"], json!("wallet not found"));
    assert_eq!(mock.calls(), 6);
    assert!(
        mock.requested_paths()
            .contains(&"/positions/user/0xdeadbeef?limit=10".to_string())
    );

    // ============================================
    // Case 7: 透传路由 (成交 / 余额) 的信封与默认参数
    // ============================================
    mock.push_response(Ok(json!({"trades": [{"id": "t1"}]})));
    let res = client
        .get(format!("{}/api/trades/0xdeadbeef", base_url))
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["ok"], json!(true));
    assert_eq!(body["data"]["trades"][0]["id"], json!("t1"));
    assert!(
        mock.requested_paths()
            .contains(&"/trade/user/0xdeadbeef?limit=50".to_string())
    );

    mock.push_response(Ok(json!({"balance": "123.45"})));
    let res = client
        .get(format!("{}/api/balance/0xdeadbeef", base_url))
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["ok"], json!(true));
    assert_eq!(body["data"]["balance"], json!("123.45"));
    assert!(
        mock.requested_paths()
            .contains(&"/balance/user/0xdeadbeef".to_string())
    );
}

#[tokio::test]
async fn test_markets_cache_expires_after_ttl() {
    let (base_url, mock, clock) = spawn_test_server(AppConfig::default()).await;
    let client = reqwest::Client::new();

    mock.push_response(Ok(json!({"list": [{"id": 1}], "total": 1})));
    let res = client
        .get(format!("{}/api/markets?limit=20&page=1", base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::OK);
    assert_eq!(mock.calls(), 1);

    // 30 秒之内仍命中缓存
    clock.advance(29_000);
    client
        .get(format!("{}/api/markets?limit=20&page=1", base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(mock.calls(), 1);

    // 越过 30 秒窗口后惰性清除，恰好触发一次新的上游拉取
    clock.advance(1_001);
    mock.push_response(Ok(json!({"list": [{"id": 2}], "total": 1})));
    let res = client
        .get(format!("{}/api/markets?limit=20&page=1", base_url))
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["list"][0]["id"], json!(2));
    assert_eq!(mock.calls(), 2);
}

#[tokio::test]
async fn test_cors_origin_gating() {
    let mut config = AppConfig::default();
    config.cors.allowed_origins = vec!["https://tracker.example.com".to_string()];
    config.cors.dev_mode = false;

    let (base_url, _mock, _clock) = spawn_test_server(config).await;
    let client = reqwest::Client::new();

    // 列表内来源放行
    let res = client
        .get(format!("{}/health", base_url))
        .header("Origin", "https://tracker.example.com")
        .send()
        .await
        .unwrap();
    assert_eq!(
        res.headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("https://tracker.example.com")
    );

    // 陌生来源拒绝 (不回 CORS 头)
    let res = client
        .get(format!("{}/health", base_url))
        .header("Origin", "https://evil.example.com")
        .send()
        .await
        .unwrap();
    assert!(res.headers().get("access-control-allow-origin").is_none());

    // 生产模式下本机来源同样拒绝
    let res = client
        .get(format!("{}/health", base_url))
        .header("Origin", "http://localhost:3000")
        .send()
        .await
        .unwrap();
    assert!(res.headers().get("access-control-allow-origin").is_none());

    // 不携带 Origin 的请求不受 CORS 影响
    let res = client.get(format!("{}/health", base_url)).send().await.unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::OK);
}
