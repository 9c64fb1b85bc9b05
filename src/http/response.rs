//! Error responses.
//!
//! # Responsibilities
//! - Define the error taxonomy handlers return
//! - Map each error to an HTTP status with a plain-text body
//!
//! # Design Decisions
//! - No structured error codes; clients only see status and text
//! - Downstream failures are translated at the call site, not here

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Errors a handler can answer with.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Malformed client input or denied content.
    #[error("{0}")]
    BadRequest(String),

    /// Wrong verb for a known path.
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// A downstream service could not give an answer.
    #[error("{0}")]
    UpstreamUnavailable(String),

    /// Failure after the request was accepted.
    #[error("{0}")]
    Internal(String),
}

impl ServiceError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServiceError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServiceError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ServiceError::UpstreamUnavailable(_) => StatusCode::BAD_GATEWAY,
            ServiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}

/// Fallback for known paths hit with an unsupported verb.
pub async fn method_not_allowed() -> ServiceError {
    ServiceError::MethodNotAllowed
}
