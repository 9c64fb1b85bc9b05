//! Request handling.
//!
//! # Responsibilities
//! - Carry the correlation id (`X-Request-ID`) of an inbound request
//! - Decode JSON bodies into typed payloads with plain-text 400 rejections
//!
//! # Design Decisions
//! - The id is assigned by `SetRequestIdLayer` before any handler runs;
//!   the extractor only generates one when a router is used without it
//! - Handlers receive the id as an argument and pass it on explicitly

use std::convert::Infallible;
use std::fmt;

use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Request},
    http::{request::Parts, HeaderMap, HeaderName, HeaderValue},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::http::response::ServiceError;

/// Correlation header shared by every service.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Opaque correlation id of one logical request.
///
/// Holds the raw header value so ids that are not valid UTF-8 are forwarded
/// byte for byte.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestId(HeaderValue);

impl RequestId {
    /// Wrap an existing header value.
    pub fn new(value: HeaderValue) -> Self {
        Self(value)
    }

    /// Generate a fresh UUID v4 id.
    pub fn generate() -> Self {
        let id = Uuid::new_v4().to_string();
        Self(HeaderValue::from_str(&id).unwrap_or_else(|_| HeaderValue::from_static("unknown")))
    }

    /// The value to send as `X-Request-ID`.
    pub fn header_value(&self) -> &HeaderValue {
        &self.0
    }

    /// The id as text, if it is valid UTF-8.
    pub fn to_str(&self) -> Option<&str> {
        self.0.to_str().ok()
    }
}

impl From<&str> for RequestId {
    fn from(value: &str) -> Self {
        HeaderValue::from_str(value)
            .map(Self)
            .unwrap_or_else(|_| Self::generate())
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(self.0.as_bytes()))
    }
}

/// Read the correlation id out of a header map.
pub trait RequestIdExt {
    /// The non-blank `X-Request-ID` value, if present.
    fn request_id(&self) -> Option<RequestId>;
}

impl RequestIdExt for HeaderMap {
    fn request_id(&self) -> Option<RequestId> {
        self.get(X_REQUEST_ID)
            .filter(|v| !v.as_bytes().trim_ascii().is_empty())
            .cloned()
            .map(RequestId::new)
    }
}

impl<S> FromRequestParts<S> for RequestId
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    /// Prefers the id `SetRequestIdLayer` stored in the extensions, which is
    /// the same value echoed to the client.
    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(id) = parts.extensions.get::<tower_http::request_id::RequestId>() {
            return Ok(RequestId::new(id.header_value().clone()));
        }
        Ok(parts.headers.request_id().unwrap_or_else(RequestId::generate))
    }
}

/// JSON body extractor that answers malformed input with `400 Invalid JSON`.
///
/// Unlike `axum::Json` it ignores the `Content-Type` header.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(IntoResponse::into_response)?;

        serde_json::from_slice(&bytes).map(JsonBody).map_err(|err| {
            tracing::debug!(error = %err, "Rejecting malformed JSON body");
            ServiceError::BadRequest("Invalid JSON".into()).into_response()
        })
    }
}
