//! Mocked news feed.
//!
//! There is no news backend: items are fabricated per request relative to
//! the request time.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::comments::Comment;

/// Summary of one news item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub pub_time: DateTime<Utc>,
}

/// A news item with its comments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsDetail {
    #[serde(flatten)]
    pub news: NewsItem,
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: usize,
    pub total_pages: usize,
}

/// Body of `GET /news`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsPage {
    pub news: Vec<NewsItem>,
    pub pagination: Pagination,
}

/// Query of `GET /news`. Values are kept raw so bad input falls back to defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewsQuery {
    pub page: Option<String>,
    pub s: Option<String>,
    pub search: Option<String>,
}

impl NewsQuery {
    /// Requested page; missing, unparsable or non-positive values mean 1.
    pub fn page(&self) -> usize {
        self.page
            .as_deref()
            .and_then(|p| p.trim().parse::<usize>().ok())
            .filter(|p| *p > 0)
            .unwrap_or(1)
    }

    /// Search term; `s` wins over `search` when both are set.
    pub fn search(&self) -> Option<&str> {
        [self.s.as_deref(), self.search.as_deref()]
            .into_iter()
            .flatten()
            .find(|term| !term.is_empty())
    }
}

/// Fabricates news items.
#[derive(Debug, Clone)]
pub struct NewsFeed {
    page_size: usize,
}

impl NewsFeed {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
        }
    }

    /// One page of the feed, optionally filtered by a case-insensitive title search.
    pub fn page(&self, query: &NewsQuery, now: DateTime<Utc>) -> NewsPage {
        let mut items = catalogue(now);
        if let Some(term) = query.search() {
            let term = term.to_lowercase();
            items.retain(|item| item.title.to_lowercase().contains(&term));
        }

        let page = query.page();
        let total_pages = items.len().div_ceil(self.page_size).max(1);
        let news = items
            .into_iter()
            .skip((page - 1).saturating_mul(self.page_size))
            .take(self.page_size)
            .collect();

        NewsPage {
            news,
            pagination: Pagination { page, total_pages },
        }
    }

    /// The item behind `/news/{id}`.
    pub fn item(&self, id: i64, now: DateTime<Utc>) -> NewsItem {
        NewsItem {
            id,
            title: format!("News {id}"),
            content: format!("Content of news {id}"),
            pub_time: now,
        }
    }
}

impl Default for NewsFeed {
    fn default() -> Self {
        Self::new(10)
    }
}

fn catalogue(now: DateTime<Utc>) -> Vec<NewsItem> {
    vec![
        NewsItem {
            id: 1,
            title: "First News".into(),
            content: "This is the content of the first news article".into(),
            pub_time: now - Duration::hours(24),
        },
        NewsItem {
            id: 2,
            title: "Second News".into(),
            content: "This is the content of the second news article".into(),
            pub_time: now - Duration::hours(12),
        },
    ]
}
