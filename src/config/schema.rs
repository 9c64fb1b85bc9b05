//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure shared by the
//! three services. All types derive Serde traits for deserialization from
//! config files.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::censor::DEFAULT_DENYLIST;

/// The service a `newsroom` process runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum ServiceKind {
    /// Public API: news feed and comment creation.
    Gateway,
    /// In-memory comment store.
    Comments,
    /// Denylist content filter.
    Censor,
}

impl ServiceKind {
    /// Name used in logs and metric labels.
    pub fn as_str(self) -> &'static str {
        match self {
            ServiceKind::Gateway => "gateway",
            ServiceKind::Comments => "comments",
            ServiceKind::Censor => "censor",
        }
    }
}

impl std::fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct NewsroomConfig {
    /// Gateway listener and downstream addresses.
    pub gateway: GatewayConfig,

    /// Comment store listener.
    pub comments: CommentsConfig,

    /// Content filter listener and denylist.
    pub censor: CensorConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Request limits.
    pub security: SecurityConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl NewsroomConfig {
    /// Bind address of the given service.
    pub fn bind_address(&self, service: ServiceKind) -> &str {
        match service {
            ServiceKind::Gateway => &self.gateway.bind_address,
            ServiceKind::Comments => &self.comments.bind_address,
            ServiceKind::Censor => &self.censor.bind_address,
        }
    }
}

/// Gateway configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Base URL of the comment store.
    pub comments_url: Url,

    /// Base URL of the content filter.
    pub censor_url: Url,

    /// News items per page on `/news`.
    pub page_size: usize,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            comments_url: Url::parse("http://127.0.0.1:8081").expect("static url"),
            censor_url: Url::parse("http://127.0.0.1:8082").expect("static url"),
            page_size: 10,
        }
    }
}

/// Comment store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CommentsConfig {
    /// Bind address (e.g., "0.0.0.0:8081").
    pub bind_address: String,
}

impl Default for CommentsConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8081".to_string(),
        }
    }
}

/// Content filter configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CensorConfig {
    /// Bind address (e.g., "0.0.0.0:8082").
    pub bind_address: String,

    /// Terms whose case-insensitive presence rejects a text.
    pub denylist: Vec<String>,
}

impl Default for CensorConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8082".to_string(),
            denylist: DEFAULT_DENYLIST.iter().map(|t| t.to_string()).collect(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment timeout for downstream calls, in seconds.
    pub connect_secs: u64,

    /// Total time allowed for one downstream call, in seconds.
    pub upstream_secs: u64,

    /// Ceiling on handling one inbound request, in seconds.
    pub request_secs: u64,

    /// How long in-flight requests may run after shutdown starts, in seconds.
    pub shutdown_grace_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            upstream_secs: 10,
            request_secs: 30,
            shutdown_grace_secs: 5,
        }
    }
}

/// Request limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Maximum body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_body_size: 64 * 1024,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` takes precedence.
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable the Prometheus scrape endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
