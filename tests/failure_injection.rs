//! Gateway orchestration against programmable downstreams.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::http::{HeaderValue, StatusCode};
use newsroom::config::ServiceKind;
use newsroom::lifecycle::Shutdown;
use serde_json::{json, Value};

mod common;
use common::RecordedRequest;

type Calls = Arc<Mutex<Vec<RecordedRequest>>>;

/// Mock downstream that records every call and answers with a fixed status and body.
async fn recording_backend(status: u16, body: &'static str) -> (SocketAddr, Calls) {
    let calls: Calls = Arc::default();
    let recorded = calls.clone();
    let addr = common::start_programmable_backend(move |req| {
        recorded.lock().unwrap().push(req);
        async move { (status, body.to_string()) }
    })
    .await;
    (addr, calls)
}

async fn post_comment(
    gateway: SocketAddr,
    body: Value,
    request_id: Option<&str>,
) -> reqwest::Response {
    let mut req = common::http_client()
        .post(format!("http://{}/comment", gateway))
        .json(&body);
    if let Some(id) = request_id {
        req = req.header("X-Request-ID", id);
    }
    req.send().await.expect("gateway unreachable")
}

#[tokio::test]
async fn test_rejected_text_never_reaches_store() {
    let (censor, censor_calls) =
        recording_backend(400, "Text contains prohibited content").await;
    let (comments, comment_calls) = recording_backend(201, r#"{"id": 1}"#).await;

    let shutdown = Shutdown::new();
    let config = common::gateway_config(common::url_of(censor), common::url_of(comments));
    let gateway = common::spawn_service(ServiceKind::Gateway, &config, &shutdown).await;

    let res = post_comment(gateway, json!({"news_id": 1, "text": "QWERTY"}), None).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.text().await.unwrap(), "Comment contains prohibited content");
    assert_eq!(censor_calls.lock().unwrap().len(), 1);
    assert_eq!(comment_calls.lock().unwrap().len(), 0, "store must not be called");

    shutdown.trigger();
}

#[tokio::test]
async fn test_accepted_comment_returns_store_id_and_propagates_request_id() {
    let (censor, censor_calls) =
        recording_backend(200, r#"{"message":"Text passed censorship check"}"#).await;
    let (comments, comment_calls) = recording_backend(201, r#"{"id": 42}"#).await;

    let shutdown = Shutdown::new();
    let config = common::gateway_config(common::url_of(censor), common::url_of(comments));
    let gateway = common::spawn_service(ServiceKind::Gateway, &config, &shutdown).await;

    let res = post_comment(
        gateway,
        json!({"news_id": 7, "parent_id": 3, "text": "nice article"}),
        Some("corr-123"),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.headers().get("x-request-id").unwrap().to_str().unwrap(),
        "corr-123"
    );
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({"message": "Comment created successfully", "id": 42}));

    let censor_calls = censor_calls.lock().unwrap();
    assert_eq!(censor_calls.len(), 1);
    assert_eq!(censor_calls[0].path, "/check");
    assert_eq!(censor_calls[0].request_id(), Some("corr-123"));
    assert_eq!(censor_calls[0].json(), json!({"text": "nice article"}));

    let comment_calls = comment_calls.lock().unwrap();
    assert_eq!(comment_calls.len(), 1);
    assert_eq!(comment_calls[0].method, "POST");
    assert_eq!(comment_calls[0].path, "/comments");
    assert_eq!(comment_calls[0].request_id(), Some("corr-123"));
    let stored = comment_calls[0].json();
    assert_eq!(stored["news_id"], 7);
    assert_eq!(stored["parent_id"], 3);
    assert_eq!(stored["text"], "nice article");

    shutdown.trigger();
}

#[tokio::test]
async fn test_generated_request_id_is_shared_by_both_calls() {
    let (censor, censor_calls) = recording_backend(200, r#"{"message":"ok"}"#).await;
    let (comments, comment_calls) = recording_backend(200, r#"{"id": 1}"#).await;

    let shutdown = Shutdown::new();
    let config = common::gateway_config(common::url_of(censor), common::url_of(comments));
    let gateway = common::spawn_service(ServiceKind::Gateway, &config, &shutdown).await;

    let res = post_comment(gateway, json!({"news_id": 1, "text": "hi"}), None).await;
    assert_eq!(res.status(), StatusCode::OK);

    let echoed = res
        .headers()
        .get("x-request-id")
        .expect("gateway assigns an id")
        .to_str()
        .unwrap()
        .to_string();
    assert!(!echoed.is_empty());
    assert_eq!(censor_calls.lock().unwrap()[0].request_id(), Some(echoed.as_str()));
    assert_eq!(comment_calls.lock().unwrap()[0].request_id(), Some(echoed.as_str()));

    shutdown.trigger();
}

#[tokio::test]
async fn test_non_utf8_request_id_is_forwarded_byte_for_byte() {
    let (censor, censor_calls) = recording_backend(200, r#"{"message":"ok"}"#).await;
    let (comments, comment_calls) = recording_backend(200, r#"{"id": 3}"#).await;

    let shutdown = Shutdown::new();
    let config = common::gateway_config(common::url_of(censor), common::url_of(comments));
    let gateway = common::spawn_service(ServiceKind::Gateway, &config, &shutdown).await;

    let raw = HeaderValue::from_bytes(b"caf\xe9-1").unwrap();
    let res = common::http_client()
        .post(format!("http://{}/comment", gateway))
        .header("X-Request-ID", raw.clone())
        .json(&json!({"news_id": 1, "text": "bonjour"}))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers().get("x-request-id"), Some(&raw));
    assert_eq!(censor_calls.lock().unwrap()[0].headers.get("x-request-id"), Some(&raw));
    assert_eq!(comment_calls.lock().unwrap()[0].headers.get("x-request-id"), Some(&raw));

    shutdown.trigger();
}

#[tokio::test]
async fn test_store_failure_after_acceptance_is_internal_error() {
    let (censor, censor_calls) = recording_backend(200, r#"{"message":"ok"}"#).await;
    let (comments, comment_calls) = recording_backend(503, "unavailable").await;

    let shutdown = Shutdown::new();
    let config = common::gateway_config(common::url_of(censor), common::url_of(comments));
    let gateway = common::spawn_service(ServiceKind::Gateway, &config, &shutdown).await;

    let res = post_comment(gateway, json!({"news_id": 1, "text": "fine"}), None).await;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(res.text().await.unwrap(), "Failed to save comment");
    assert_eq!(censor_calls.lock().unwrap().len(), 1);
    assert_eq!(comment_calls.lock().unwrap().len(), 1, "no retry");

    shutdown.trigger();
}

#[tokio::test]
async fn test_store_unreachable_after_acceptance_is_internal_error() {
    let (censor, _) = recording_backend(200, r#"{"message":"ok"}"#).await;

    let shutdown = Shutdown::new();
    let config = common::gateway_config(common::url_of(censor), common::unreachable_url());
    let gateway = common::spawn_service(ServiceKind::Gateway, &config, &shutdown).await;

    let res = post_comment(gateway, json!({"news_id": 1, "text": "fine"}), None).await;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

    shutdown.trigger();
}

#[tokio::test]
async fn test_filter_unreachable_is_bad_gateway() {
    let (comments, comment_calls) = recording_backend(201, r#"{"id": 1}"#).await;

    let shutdown = Shutdown::new();
    let config = common::gateway_config(common::unreachable_url(), common::url_of(comments));
    let gateway = common::spawn_service(ServiceKind::Gateway, &config, &shutdown).await;

    let res = post_comment(gateway, json!({"news_id": 1, "text": "hello"}), None).await;

    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(res.text().await.unwrap(), "Content filter unavailable");
    assert_eq!(comment_calls.lock().unwrap().len(), 0);

    shutdown.trigger();
}

#[tokio::test]
async fn test_filter_server_error_is_bad_gateway() {
    let (censor, _) = recording_backend(500, "boom").await;
    let (comments, comment_calls) = recording_backend(201, r#"{"id": 1}"#).await;

    let shutdown = Shutdown::new();
    let config = common::gateway_config(common::url_of(censor), common::url_of(comments));
    let gateway = common::spawn_service(ServiceKind::Gateway, &config, &shutdown).await;

    let res = post_comment(gateway, json!({"news_id": 1, "text": "hello"}), None).await;

    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(comment_calls.lock().unwrap().len(), 0);

    shutdown.trigger();
}

#[tokio::test]
async fn test_slow_filter_times_out() {
    let censor = common::start_programmable_backend(|_| async {
        tokio::time::sleep(Duration::from_secs(5)).await;
        (200, r#"{"message":"late"}"#.to_string())
    })
    .await;
    let comment_calls = Arc::new(AtomicU32::new(0));
    let cc = comment_calls.clone();
    let comments = common::start_programmable_backend(move |_| {
        cc.fetch_add(1, Ordering::SeqCst);
        async { (201, r#"{"id": 1}"#.to_string()) }
    })
    .await;

    let shutdown = Shutdown::new();
    let mut config = common::gateway_config(common::url_of(censor), common::url_of(comments));
    config.timeouts.upstream_secs = 1;
    let gateway = common::spawn_service(ServiceKind::Gateway, &config, &shutdown).await;

    let start = Instant::now();
    let res = post_comment(gateway, json!({"news_id": 1, "text": "hello"}), None).await;

    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
    assert!(start.elapsed() < Duration::from_secs(4), "deadline not enforced");
    assert_eq!(comment_calls.load(Ordering::SeqCst), 0);

    shutdown.trigger();
}

#[tokio::test]
async fn test_malformed_comment_touches_no_downstream() {
    let (censor, censor_calls) = recording_backend(200, r#"{"message":"ok"}"#).await;
    let (comments, comment_calls) = recording_backend(201, r#"{"id": 1}"#).await;

    let shutdown = Shutdown::new();
    let config = common::gateway_config(common::url_of(censor), common::url_of(comments));
    let gateway = common::spawn_service(ServiceKind::Gateway, &config, &shutdown).await;

    let res = common::http_client()
        .post(format!("http://{}/comment", gateway))
        .body("{\"news_id\": 1, \"text\": ")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.text().await.unwrap(), "Invalid JSON");
    assert!(censor_calls.lock().unwrap().is_empty());
    assert!(comment_calls.lock().unwrap().is_empty());

    shutdown.trigger();
}

#[tokio::test]
async fn test_news_detail_survives_unreachable_store() {
    let shutdown = Shutdown::new();
    let config = common::gateway_config(common::unreachable_url(), common::unreachable_url());
    let gateway = common::spawn_service(ServiceKind::Gateway, &config, &shutdown).await;

    let res = common::http_client()
        .get(format!("http://{}/news/5", gateway))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["id"], 5);
    assert_eq!(body["comments"], json!([]));

    shutdown.trigger();
}

#[tokio::test]
async fn test_news_detail_survives_store_error_status() {
    let (comments, calls) = recording_backend(500, "broken").await;

    let shutdown = Shutdown::new();
    let config = common::gateway_config(common::unreachable_url(), common::url_of(comments));
    let gateway = common::spawn_service(ServiceKind::Gateway, &config, &shutdown).await;

    let res = common::http_client()
        .get(format!("http://{}/news/9", gateway))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["comments"], json!([]));
    assert_eq!(calls.lock().unwrap().len(), 1);

    shutdown.trigger();
}

#[tokio::test]
async fn test_news_detail_embeds_store_comments() {
    let (comments, calls) = recording_backend(
        200,
        r#"[{"id":1,"news_id":7,"text":"first"},{"id":4,"news_id":7,"parent_id":1,"text":"reply"}]"#,
    )
    .await;

    let shutdown = Shutdown::new();
    let config = common::gateway_config(common::unreachable_url(), common::url_of(comments));
    let gateway = common::spawn_service(ServiceKind::Gateway, &config, &shutdown).await;

    let res = common::http_client()
        .get(format!("http://{}/news/7", gateway))
        .header("X-Request-ID", "detail-1")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["title"], "News 7");
    assert_eq!(
        body["comments"],
        json!([
            {"id": 1, "news_id": 7, "text": "first"},
            {"id": 4, "news_id": 7, "parent_id": 1, "text": "reply"}
        ])
    );

    let calls = calls.lock().unwrap();
    assert_eq!(calls[0].path, "/comments");
    assert_eq!(calls[0].query.as_deref(), Some("news_id=7"));
    assert_eq!(calls[0].request_id(), Some("detail-1"));

    shutdown.trigger();
}

#[tokio::test]
async fn test_news_detail_treats_null_listing_as_empty() {
    let (comments, _) = recording_backend(200, "null").await;

    let shutdown = Shutdown::new();
    let config = common::gateway_config(common::unreachable_url(), common::url_of(comments));
    let gateway = common::spawn_service(ServiceKind::Gateway, &config, &shutdown).await;

    let body: Value = common::http_client()
        .get(format!("http://{}/news/2", gateway))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["comments"], json!([]));

    shutdown.trigger();
}

/// Serve a gateway from `config`, returning its address and the `run` task.
async fn run_gateway(
    config: &newsroom::NewsroomConfig,
    shutdown: &Shutdown,
) -> (
    SocketAddr,
    tokio::task::JoinHandle<Result<(), newsroom::http::ServerError>>,
) {
    let server = newsroom::HttpServer::new(ServiceKind::Gateway, config).unwrap();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(server.run(listener, shutdown.subscribe()));
    (addr, handle)
}

#[tokio::test]
async fn test_in_flight_comment_completes_after_shutdown_starts() {
    let censor = common::start_programmable_backend(|_| async {
        tokio::time::sleep(Duration::from_millis(800)).await;
        (200, r#"{"message":"ok"}"#.to_string())
    })
    .await;
    let (comments, comment_calls) = recording_backend(200, r#"{"id": 7}"#).await;

    let shutdown = Shutdown::new();
    let mut config = common::gateway_config(common::url_of(censor), common::url_of(comments));
    config.timeouts.shutdown_grace_secs = 5;
    let (gateway, server) = run_gateway(&config, &shutdown).await;

    let in_flight = tokio::spawn(post_comment(
        gateway,
        json!({"news_id": 1, "text": "slow but fine"}),
        None,
    ));
    tokio::time::sleep(Duration::from_millis(200)).await;
    shutdown.trigger();

    let res = in_flight.await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await.unwrap()["id"], 7);
    assert_eq!(comment_calls.lock().unwrap().len(), 1);

    let stopped = tokio::time::timeout(Duration::from_secs(5), server)
        .await
        .expect("server should stop once drained")
        .unwrap();
    assert!(stopped.is_ok());
}

#[tokio::test]
async fn test_grace_period_bounds_shutdown_with_stalled_request() {
    let censor = common::start_programmable_backend(|_| async {
        tokio::time::sleep(Duration::from_secs(30)).await;
        (200, r#"{"message":"ok"}"#.to_string())
    })
    .await;

    let shutdown = Shutdown::new();
    let mut config = common::gateway_config(common::url_of(censor), common::unreachable_url());
    config.timeouts.upstream_secs = 60;
    config.timeouts.request_secs = 60;
    config.timeouts.shutdown_grace_secs = 1;
    let (gateway, server) = run_gateway(&config, &shutdown).await;

    let stalled = tokio::spawn(post_comment(
        gateway,
        json!({"news_id": 1, "text": "never answered"}),
        None,
    ));
    tokio::time::sleep(Duration::from_millis(200)).await;

    let start = Instant::now();
    shutdown.trigger();
    let stopped = tokio::time::timeout(Duration::from_secs(5), server)
        .await
        .expect("grace period not enforced")
        .unwrap();

    assert!(stopped.is_ok());
    let elapsed = start.elapsed();
    assert!(
        elapsed >= Duration::from_millis(900),
        "returned before the grace period: {elapsed:?}"
    );
    assert!(elapsed < Duration::from_secs(3), "grace period overrun: {elapsed:?}");

    stalled.abort();
}
