//! Gateway handlers.
//!
//! Comment creation runs the content filter first and only then the comment
//! store, with the same request id on both calls. News detail degrades to an
//! empty comment list when the store cannot answer.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::comments::NewComment;
use crate::gateway::news::{NewsDetail, NewsPage, NewsQuery};
use crate::gateway::GatewayState;
use crate::http::{JsonBody, RequestId, ServiceError};
use crate::observability::metrics;

pub const COMMENT_CREATED_MESSAGE: &str = "Comment created successfully";

/// Body of a successful `POST /comment`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentCreatedResponse {
    pub message: String,
    pub id: u64,
}

/// `GET /news`
pub async fn list_news(
    State(state): State<GatewayState>,
    Query(query): Query<NewsQuery>,
) -> Json<NewsPage> {
    Json(state.news.page(&query, Utc::now()))
}

/// `GET /news/` with the id left out.
pub async fn missing_news_id() -> ServiceError {
    ServiceError::BadRequest("News ID is required".into())
}

/// `GET /news/{id}`
pub async fn news_detail(
    State(state): State<GatewayState>,
    Path(raw_id): Path<String>,
    request_id: RequestId,
) -> Result<Json<NewsDetail>, ServiceError> {
    let news_id: i64 = raw_id
        .parse()
        .map_err(|_| ServiceError::BadRequest("Invalid news ID".into()))?;

    let news = state.news.item(news_id, Utc::now());

    let comments = match state.comments.list(news_id, &request_id).await {
        Ok(comments) => comments,
        Err(e) => {
            tracing::warn!(
                request_id = %request_id,
                news_id,
                error = %e,
                "Comment store unavailable, serving news without comments"
            );
            metrics::record_upstream_failure("comments");
            Vec::new()
        }
    };

    Ok(Json(NewsDetail { news, comments }))
}

/// `POST /comment`
pub async fn create_comment(
    State(state): State<GatewayState>,
    request_id: RequestId,
    JsonBody(comment): JsonBody<NewComment>,
) -> Result<Json<CommentCreatedResponse>, ServiceError> {
    if let Err(e) = state.censor.check(&comment.text, &request_id).await {
        if e.is_rejection() {
            tracing::info!(request_id = %request_id, news_id = comment.news_id, "Comment rejected by content filter");
            return Err(ServiceError::BadRequest(
                "Comment contains prohibited content".into(),
            ));
        }
        tracing::error!(request_id = %request_id, error = %e, "Content filter call failed");
        metrics::record_upstream_failure("censor");
        return Err(ServiceError::UpstreamUnavailable(
            "Content filter unavailable".into(),
        ));
    }

    let created = state
        .comments
        .create(&comment, &request_id)
        .await
        .map_err(|e| {
            tracing::error!(request_id = %request_id, error = %e, "Comment store call failed");
            metrics::record_upstream_failure("comments");
            ServiceError::Internal("Failed to save comment".into())
        })?;

    tracing::info!(
        request_id = %request_id,
        comment_id = created.id,
        news_id = comment.news_id,
        "Comment created"
    );

    Ok(Json(CommentCreatedResponse {
        message: COMMENT_CREATED_MESSAGE.to_string(),
        id: created.id,
    }))
}
