//! HTTP clients for the gateway's downstream services.
//!
//! # Responsibilities
//! - Call the content filter and the comment store
//! - Attach the caller's request id to every downstream request
//! - Enforce the per-call deadline
//! - Classify failures (rejection, status, transport, decode, timeout)
//!
//! # Design Decisions
//! - One shared `reqwest::Client` (connection pool) per gateway process
//! - The deadline covers sending the request and reading the whole body
//! - No retries

use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;
use url::Url;

use crate::censor::types::CheckRequest;
use crate::comments::types::{Comment, CommentCreated, NewComment};
use crate::config::TimeoutConfig;
use crate::http::{RequestId, X_REQUEST_ID};
use crate::resilience::{with_timeout, TimeoutError};

/// Failure of one downstream call.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// The content filter refused the text.
    #[error("rejected: {0}")]
    Rejected(String),

    /// Unexpected status code.
    #[error("unexpected status {0}")]
    Status(StatusCode),

    /// Connection or protocol failure.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The body did not match the expected shape.
    #[error("undecodable response: {0}")]
    Decode(String),

    #[error(transparent)]
    Timeout(#[from] TimeoutError),
}

impl UpstreamError {
    /// True when the downstream gave a definite negative answer.
    pub fn is_rejection(&self) -> bool {
        matches!(self, UpstreamError::Rejected(_))
    }
}

/// Error building the downstream clients.
#[derive(Debug, Error)]
pub enum ClientBuildError {
    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid downstream URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Build the connection pool shared by both clients.
pub fn build_http_client(timeouts: &TimeoutConfig) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(timeouts.connect_secs))
        .no_proxy()
        .build()
}

/// `endpoint` under `base`, keeping any path prefix the base carries.
fn endpoint_url(base: &Url, endpoint: &str) -> Result<Url, url::ParseError> {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let dir = format!("{}/", base.path());
        base.set_path(&dir);
    }
    base.join(endpoint)
}

/// Client of the content filter.
#[derive(Debug, Clone)]
pub struct CensorClient {
    http: reqwest::Client,
    check_url: Url,
    timeout: Duration,
}

impl CensorClient {
    pub fn new(http: reqwest::Client, base_url: &Url, timeout: Duration) -> Result<Self, url::ParseError> {
        Ok(Self {
            http,
            check_url: endpoint_url(base_url, "check")?,
            timeout,
        })
    }

    /// `Ok(())` when the text passed, `Rejected` when the filter answered 400.
    pub async fn check(&self, text: &str, request_id: &RequestId) -> Result<(), UpstreamError> {
        let call = async {
            let response = self
                .http
                .post(self.check_url.clone())
                .header(X_REQUEST_ID, request_id.header_value().clone())
                .json(&CheckRequest {
                    text: text.to_string(),
                })
                .send()
                .await?;

            match response.status() {
                StatusCode::OK => Ok(()),
                StatusCode::BAD_REQUEST => {
                    let reason = response.text().await.unwrap_or_default();
                    Err(UpstreamError::Rejected(reason.trim().to_string()))
                }
                status => Err(UpstreamError::Status(status)),
            }
        };

        with_timeout(self.timeout, call).await?
    }
}

/// Client of the comment store.
#[derive(Debug, Clone)]
pub struct CommentClient {
    http: reqwest::Client,
    comments_url: Url,
    timeout: Duration,
}

impl CommentClient {
    pub fn new(http: reqwest::Client, base_url: &Url, timeout: Duration) -> Result<Self, url::ParseError> {
        Ok(Self {
            http,
            comments_url: endpoint_url(base_url, "comments")?,
            timeout,
        })
    }

    /// Persist a comment and return the id the store assigned.
    pub async fn create(
        &self,
        comment: &NewComment,
        request_id: &RequestId,
    ) -> Result<CommentCreated, UpstreamError> {
        let call = async {
            let response = self
                .http
                .post(self.comments_url.clone())
                .header(X_REQUEST_ID, request_id.header_value().clone())
                .json(comment)
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                return Err(UpstreamError::Status(status));
            }

            response
                .json::<CommentCreated>()
                .await
                .map_err(|e| UpstreamError::Decode(e.to_string()))
        };

        with_timeout(self.timeout, call).await?
    }

    /// All comments of a news item. A `null` body is read as no comments.
    pub async fn list(&self, news_id: i64, request_id: &RequestId) -> Result<Vec<Comment>, UpstreamError> {
        let call = async {
            let response = self
                .http
                .get(self.comments_url.clone())
                .query(&[("news_id", news_id)])
                .header(X_REQUEST_ID, request_id.header_value().clone())
                .send()
                .await?;

            let status = response.status();
            if status != StatusCode::OK {
                return Err(UpstreamError::Status(status));
            }

            response
                .json::<Option<Vec<Comment>>>()
                .await
                .map(Option::unwrap_or_default)
                .map_err(|e| UpstreamError::Decode(e.to_string()))
        };

        with_timeout(self.timeout, call).await?
    }
}
