//! Content filter service.
//!
//! # Data Flow
//! ```text
//! POST /check {text}
//!     → handlers.rs (decode, log with request id)
//!     → filter.rs (denylist predicate)
//!     → 200 {message} | 400 plain text
//! ```
//!
//! # Design Decisions
//! - Stateless: the denylist is built once at startup and never changes
//! - Matching is case-insensitive substring search, not tokenized

pub mod filter;
pub mod handlers;
pub mod types;

use std::sync::Arc;

use axum::{routing::post, Router};

pub use filter::{Denylist, Verdict, DEFAULT_DENYLIST};
pub use types::{CheckRequest, CheckResponse};

use crate::http::response::method_not_allowed;

/// Routes of the content filter.
pub fn router(denylist: Arc<Denylist>) -> Router {
    Router::new()
        .route(
            "/check",
            post(handlers::check_text).fallback(method_not_allowed),
        )
        .with_state(denylist)
}
