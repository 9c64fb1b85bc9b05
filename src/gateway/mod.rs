//! Gateway service.
//!
//! # Data Flow
//! ```text
//! POST /comment
//!     → handlers.rs (decode)
//!     → upstream.rs CensorClient   ── rejected ──▶ 400
//!                                  ── failed   ──▶ 502
//!     → upstream.rs CommentClient  ── failed   ──▶ 500
//!     → 200 {message, id}
//!
//! GET /news/{id}  (GET /news/ ──▶ 400)
//!     → news.rs (fabricate item)
//!     → upstream.rs CommentClient  ── failed ──▶ empty comments
//!     → 200 NewsDetail
//!
//! GET /news
//!     → news.rs (search, paginate)
//! ```
//!
//! # Design Decisions
//! - Downstream calls are sequential and never retried
//! - The request id is passed explicitly to every downstream call

pub mod handlers;
pub mod news;
pub mod upstream;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    routing::{get, post},
    Router,
};

pub use news::{NewsDetail, NewsFeed, NewsItem, NewsPage, NewsQuery, Pagination};
pub use upstream::{CensorClient, ClientBuildError, CommentClient, UpstreamError};

use crate::config::NewsroomConfig;
use crate::http::response::method_not_allowed;

/// State injected into gateway handlers.
#[derive(Debug, Clone)]
pub struct GatewayState {
    pub news: Arc<NewsFeed>,
    pub censor: CensorClient,
    pub comments: CommentClient,
}

impl GatewayState {
    /// Wire the news feed and both downstream clients from configuration.
    pub fn from_config(config: &NewsroomConfig) -> Result<Self, ClientBuildError> {
        let http = upstream::build_http_client(&config.timeouts)?;
        let timeout = Duration::from_secs(config.timeouts.upstream_secs);

        Ok(Self {
            news: Arc::new(NewsFeed::new(config.gateway.page_size)),
            censor: CensorClient::new(http.clone(), &config.gateway.censor_url, timeout)?,
            comments: CommentClient::new(http, &config.gateway.comments_url, timeout)?,
        })
    }
}

/// Routes of the gateway.
pub fn router(state: GatewayState) -> Router {
    Router::new()
        .route("/news", get(handlers::list_news).fallback(method_not_allowed))
        .route(
            "/news/",
            get(handlers::missing_news_id).fallback(method_not_allowed),
        )
        .route(
            "/news/{id}",
            get(handlers::news_detail).fallback(method_not_allowed),
        )
        .route(
            "/comment",
            post(handlers::create_comment).fallback(method_not_allowed),
        )
        .with_state(state)
}
