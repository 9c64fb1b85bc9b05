//! Wire types of the content filter.

use serde::{Deserialize, Serialize};

/// Message returned when a text passes the check.
pub const PASSED_MESSAGE: &str = "Text passed censorship check";

/// Body of `POST /check`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckRequest {
    pub text: String,
}

/// Success body of `POST /check`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResponse {
    pub message: String,
}
