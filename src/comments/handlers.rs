use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::comments::store::CommentStore;
use crate::comments::types::{Comment, CommentCreated, NewComment};
use crate::http::{JsonBody, RequestId, ServiceError};
use crate::observability::metrics;

/// Query of `GET /comments`.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub news_id: Option<String>,
}

/// `POST /comments`
pub async fn create_comment(
    State(store): State<Arc<CommentStore>>,
    request_id: RequestId,
    JsonBody(new): JsonBody<NewComment>,
) -> Json<CommentCreated> {
    let comment = store.create(new);
    metrics::record_comment_created();

    tracing::info!(
        request_id = %request_id,
        comment_id = comment.id,
        news_id = comment.news_id,
        parent_id = ?comment.parent_id,
        "Comment stored"
    );

    Json(CommentCreated { id: comment.id })
}

/// `GET /comments?news_id=`
pub async fn list_comments(
    State(store): State<Arc<CommentStore>>,
    request_id: RequestId,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Comment>>, ServiceError> {
    let raw = query
        .news_id
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ServiceError::BadRequest("news_id parameter is required".into()))?;

    let news_id: i64 = raw
        .trim()
        .parse()
        .map_err(|_| ServiceError::BadRequest("Invalid news_id parameter".into()))?;

    let comments = store.list_by_news(news_id);
    tracing::debug!(
        request_id = %request_id,
        news_id,
        count = comments.len(),
        "Listing comments"
    );

    Ok(Json(comments))
}
