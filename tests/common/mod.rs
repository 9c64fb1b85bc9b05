//! Shared utilities for integration and load testing.

#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::Request,
    http::{header, HeaderMap, Method, StatusCode},
    Router,
};
use newsroom::config::{NewsroomConfig, ServiceKind};
use newsroom::http::HttpServer;
use newsroom::lifecycle::Shutdown;
use tokio::net::TcpListener;
use url::Url;

/// What a mock downstream saw.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl RecordedRequest {
    pub fn request_id(&self) -> Option<&str> {
        self.headers.get("x-request-id").and_then(|v| v.to_str().ok())
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap_or(serde_json::Value::Null)
    }
}

/// Serve `router` on an ephemeral local port.
pub async fn spawn_router(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    addr
}

/// Start a programmable mock backend answering every path with `f`.
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn(RecordedRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let f = Arc::new(f);
    let router = Router::new().fallback(move |request: Request| {
        let f = f.clone();
        async move {
            let (parts, body) = request.into_parts();
            let body = axum::body::to_bytes(body, usize::MAX)
                .await
                .unwrap_or_default();
            let recorded = RecordedRequest {
                method: parts.method,
                path: parts.uri.path().to_string(),
                query: parts.uri.query().map(str::to_string),
                headers: parts.headers,
                body,
            };

            let (status, body) = f(recorded).await;
            (
                StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                [(header::CONTENT_TYPE, "application/json")],
                body,
            )
        }
    });
    spawn_router(router).await
}

/// A mock backend that always answers 200 with `response`.
pub async fn start_mock_backend(response: &'static str) -> SocketAddr {
    start_programmable_backend(move |_| async move { (200, response.to_string()) }).await
}

pub fn url_of(addr: SocketAddr) -> Url {
    Url::parse(&format!("http://{}", addr)).unwrap()
}

/// A local URL nothing listens on.
pub fn unreachable_url() -> Url {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    url_of(addr)
}

/// Defaults with the gateway pointed at the given downstreams.
pub fn gateway_config(censor_url: Url, comments_url: Url) -> NewsroomConfig {
    let mut config = NewsroomConfig::default();
    config.gateway.censor_url = censor_url;
    config.gateway.comments_url = comments_url;
    config.timeouts.upstream_secs = 2;
    config.timeouts.shutdown_grace_secs = 1;
    config
}

/// Build `service` from `config` and serve it until `shutdown` fires.
pub async fn spawn_service(
    service: ServiceKind,
    config: &NewsroomConfig,
    shutdown: &Shutdown,
) -> SocketAddr {
    let server = HttpServer::new(service, config).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });
    addr
}

/// Start censor and comments, then a gateway in front of them. Returns the gateway address.
pub async fn spawn_newsroom(shutdown: &Shutdown) -> SocketAddr {
    let defaults = NewsroomConfig::default();
    let censor = spawn_service(ServiceKind::Censor, &defaults, shutdown).await;
    let comments = spawn_service(ServiceKind::Comments, &defaults, shutdown).await;

    let config = gateway_config(url_of(censor), url_of(comments));
    spawn_service(ServiceKind::Gateway, &config, shutdown).await
}

pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
