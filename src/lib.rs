//! Newsroom: a news gateway, a comment store and a content filter.
//!
//! Each process runs one service; they talk JSON over HTTP and share a
//! correlation id through the `X-Request-ID` header.

pub mod censor;
pub mod comments;
pub mod config;
pub mod gateway;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resilience;

pub use config::{NewsroomConfig, ServiceKind};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
