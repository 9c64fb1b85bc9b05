//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request id, JSON decoding)
//!     → service handlers (censor / comments / gateway)
//!     → response.rs (error taxonomy → status + plain text)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{JsonBody, RequestId, RequestIdExt, X_REQUEST_ID};
pub use response::ServiceError;
pub use server::{HttpServer, ServerError};
