//! Comment records and create payloads.

use serde::{Deserialize, Serialize};

/// A stored comment. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Assigned by the store, starting at 1.
    pub id: u64,
    pub news_id: i64,
    /// Comment this one replies to. Not validated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<i64>,
    pub text: String,
}

/// Payload of a comment creation, as sent to the gateway and the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewComment {
    pub news_id: i64,
    #[serde(default)]
    pub parent_id: Option<i64>,
    pub text: String,
}

/// Store answer to a successful creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentCreated {
    pub id: u64,
}
