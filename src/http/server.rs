//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Build the Axum Router of the selected service
//! - Wire up middleware (request ID, tracing, metrics, timeout, body limit)
//! - Serve on a bound listener
//! - Drain in-flight requests on shutdown within the grace period

use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::Request,
    middleware,
    routing::get,
    Json, Router,
};
use serde_json::json;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, oneshot};
use tower::ServiceBuilder;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::censor::{self, Denylist};
use crate::comments::{self, CommentStore};
use crate::config::{NewsroomConfig, ServiceKind};
use crate::gateway::{self, ClientBuildError, GatewayState};
use crate::http::request::{RequestId, X_REQUEST_ID};
use crate::observability::metrics;

/// Error starting or running a server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Client(#[from] ClientBuildError),

    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// HTTP server for one of the three services.
pub struct HttpServer {
    service: ServiceKind,
    router: Router,
    grace: Duration,
}

impl HttpServer {
    /// Create the server of `service`, building its state from `config`.
    pub fn new(service: ServiceKind, config: &NewsroomConfig) -> Result<Self, ServerError> {
        let routes = match service {
            ServiceKind::Gateway => gateway::router(GatewayState::from_config(config)?),
            ServiceKind::Comments => comments::router(Arc::new(CommentStore::new())),
            ServiceKind::Censor => {
                censor::router(Arc::new(Denylist::new(&config.censor.denylist)))
            }
        };
        Ok(Self::with_routes(service, routes, config))
    }

    /// Wrap already-built routes with the shared middleware stack.
    pub fn with_routes(service: ServiceKind, routes: Router, config: &NewsroomConfig) -> Self {
        Self {
            service,
            router: Self::build_router(service, routes, config),
            grace: Duration::from_secs(config.timeouts.shutdown_grace_secs),
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(service: ServiceKind, routes: Router, config: &NewsroomConfig) -> Router {
        routes
            .route(
                "/health",
                get(move || async move {
                    Json(json!({ "status": "ok", "service": service.as_str() }))
                }),
            )
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuid))
                    .layer(TraceLayer::new_for_http().make_span_with(request_span))
                    .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
                    .layer(middleware::from_fn_with_state(service, metrics::track_requests))
                    .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
                    .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs))),
            )
    }

    pub fn service(&self) -> ServiceKind {
        self.service
    }

    /// The fully layered router, for driving the service without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires, then drain for the grace period.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;
        tracing::info!(
            service = %self.service,
            address = %addr,
            "HTTP server starting"
        );

        let (draining_tx, draining_rx) = oneshot::channel::<()>();
        let serve = axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                let _ = draining_tx.send(());
            })
            .into_future();
        tokio::pin!(serve);

        tokio::select! {
            biased;
            result = &mut serve => {
                result?;
                tracing::info!(service = %self.service, "HTTP server stopped");
                return Ok(());
            }
            _ = draining_rx => {}
        }

        tracing::info!(
            service = %self.service,
            grace_secs = self.grace.as_secs(),
            "No longer accepting connections, draining in-flight requests"
        );

        match tokio::time::timeout(self.grace, &mut serve).await {
            Ok(result) => result?,
            Err(_) => tracing::warn!(
                service = %self.service,
                "Grace period elapsed, abandoning in-flight requests"
            ),
        }

        tracing::info!(service = %self.service, "HTTP server stopped");
        Ok(())
    }
}

fn request_span(request: &Request<Body>) -> tracing::Span {
    let request_id = request
        .extensions()
        .get::<tower_http::request_id::RequestId>()
        .map(|id| RequestId::new(id.header_value().clone()).to_string())
        .unwrap_or_default();

    tracing::info_span!(
        "request",
        method = %request.method(),
        path = %request.uri().path(),
        request_id = %request_id,
    )
}
