//! In-memory comment storage.
//!
//! # Responsibilities
//! - Assign sequential ids starting at 1
//! - Keep comments in insertion order
//! - Answer per-news listings
//!
//! # Design Decisions
//! - One `RwLock` covers the counter and the sequence; assignment and append
//!   happen under a single write guard
//! - Readers never observe a partially appended comment
//! - Nothing survives a restart; ids start over at 1

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::comments::types::{Comment, NewComment};

#[derive(Debug)]
struct StoreInner {
    next_id: u64,
    comments: Vec<Comment>,
}

/// Append-only comment store shared by the handlers.
#[derive(Debug)]
pub struct CommentStore {
    inner: RwLock<StoreInner>,
}

impl CommentStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(StoreInner {
                next_id: 1,
                comments: Vec::new(),
            }),
        }
    }

    /// Store a comment and return the full record with its assigned id.
    pub fn create(&self, new: NewComment) -> Comment {
        let mut inner = self.write();
        let comment = Comment {
            id: inner.next_id,
            news_id: new.news_id,
            parent_id: new.parent_id,
            text: new.text,
        };
        inner.next_id += 1;
        inner.comments.push(comment.clone());
        comment
    }

    /// Every comment of `news_id`, oldest first.
    pub fn list_by_news(&self, news_id: i64) -> Vec<Comment> {
        self.read()
            .comments
            .iter()
            .filter(|c| c.news_id == news_id)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.read().comments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // Poisoning is ignored: the push is the last mutation under the guard.
    fn read(&self) -> RwLockReadGuard<'_, StoreInner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreInner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for CommentStore {
    fn default() -> Self {
        Self::new()
    }
}
