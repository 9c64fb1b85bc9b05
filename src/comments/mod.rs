//! Comment store service.
//!
//! # Data Flow
//! ```text
//! POST /comments {news_id, parent_id?, text}
//!     → handlers.rs (decode)
//!     → store.rs (assign id, append)
//!     → 200 {id}
//!
//! GET /comments?news_id=N
//!     → handlers.rs (validate query)
//!     → store.rs (filter, insertion order)
//!     → 200 [Comment]
//! ```
//!
//! # Design Decisions
//! - The store is owned by the composition root and injected as router state
//! - No referential checks on news_id or parent_id

pub mod handlers;
pub mod store;
pub mod types;

use std::sync::Arc;

use axum::{routing::get, Router};

pub use store::CommentStore;
pub use types::{Comment, CommentCreated, NewComment};

use crate::http::response::method_not_allowed;

/// Routes of the comment store.
pub fn router(store: Arc<CommentStore>) -> Router {
    Router::new()
        .route(
            "/comments",
            get(handlers::list_comments)
                .post(handlers::create_comment)
                .fallback(method_not_allowed),
        )
        .with_state(store)
}
