//! Metrics collection and exposition.
//!
//! # Metrics
//! - `newsroom_requests_total` (counter): requests by service, method, status
//! - `newsroom_request_duration_seconds` (histogram): latency by service
//! - `newsroom_upstream_failures_total` (counter): failed downstream calls by upstream
//! - `newsroom_comments_created_total` (counter): comments stored
//! - `newsroom_censor_rejections_total` (counter): texts rejected by the denylist
//!
//! # Design Decisions
//! - Recording is a no-op until a recorder is installed
//! - The Prometheus endpoint is optional and off by default

use std::net::SocketAddr;
use std::time::Instant;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::config::ServiceKind;

/// Install the Prometheus recorder and its scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;

    describe_counter!("newsroom_requests_total", "Inbound HTTP requests");
    describe_histogram!(
        "newsroom_request_duration_seconds",
        "Time to answer an inbound request in seconds"
    );
    describe_counter!(
        "newsroom_upstream_failures_total",
        "Downstream calls from the gateway that failed"
    );
    describe_counter!("newsroom_comments_created_total", "Comments stored");
    describe_counter!(
        "newsroom_censor_rejections_total",
        "Texts rejected by the content filter"
    );

    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_request(service: ServiceKind, method: &str, status: u16, start: Instant) {
    counter!(
        "newsroom_requests_total",
        "service" => service.as_str(),
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("newsroom_request_duration_seconds", "service" => service.as_str())
        .record(start.elapsed().as_secs_f64());
}

pub fn record_upstream_failure(upstream: &'static str) {
    counter!("newsroom_upstream_failures_total", "upstream" => upstream).increment(1);
}

pub fn record_comment_created() {
    counter!("newsroom_comments_created_total").increment(1);
}

pub fn record_censor_rejection() {
    counter!("newsroom_censor_rejections_total").increment(1);
}

/// Middleware recording count and latency of every request.
pub async fn track_requests(
    State(service): State<ServiceKind>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let response = next.run(request).await;
    record_request(service, &method, response.status().as_u16(), start);
    response
}
