use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: u64,
    pub news_id: i64,
    #[serde(default)]
    pub parent_id: Option<i64>,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewComment {
    pub news_id: i64,
    pub parent_id: Option<i64>,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsItem {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub pub_time: String, // RFC 3339
}

#[derive(Debug, Clone, Serialize, Deserialize)]
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

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsPage {
    pub news: Vec<NewsItem>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentCreated {
    pub message: String,
    pub id: u64,
}

/// Error returned for non-success answers.
#[derive(Debug, Error)]
#[error("gateway returned status {status}: {body}")]
pub struct ApiError {
    pub status: u16,
    pub body: String,
}

pub struct GatewayClient {
    client: Client,
    gateway_url: String,
    request_id: Option<String>,
}

impl GatewayClient {
    pub fn new(gateway_url: &str) -> Self {
        Self {
            client: Client::builder()
                .no_proxy()
                .build()
                .unwrap_or_else(|_| Client::new()),
            gateway_url: gateway_url.trim_end_matches('/').to_string(),
            request_id: None,
        }
    }

    /// Send `request_id` as X-Request-ID on every call.
    pub fn with_request_id(mut self, request_id: &str) -> Self {
        self.request_id = Some(request_id.to_string());
        self
    }

    /// List news, optionally on a given page and filtered by title.
    pub async fn list_news(
        &self,
        page: Option<u32>,
        search: Option<&str>,
    ) -> Result<NewsPage, Box<dyn std::error::Error>> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(page) = page {
            query.push(("page", page.to_string()));
        }
        if let Some(search) = search {
            query.push(("s", search.to_string()));
        }
        let req = self.client.get(format!("{}/news", self.gateway_url)).query(&query);
        decode(self.send(req).await?).await
    }

    /// Fetch a news item with its comments.
    pub async fn news_detail(&self, id: i64) -> Result<NewsDetail, Box<dyn std::error::Error>> {
        let req = self.client.get(format!("{}/news/{}", self.gateway_url, id));
        decode(self.send(req).await?).await
    }

    /// Create a comment through the gateway.
    pub async fn create_comment(
        &self,
        comment: &NewComment,
    ) -> Result<CommentCreated, Box<dyn std::error::Error>> {
        decode(self.post_comment(comment).await?).await
    }

    /// Raw `POST /comment`, for inspecting status codes and headers.
    pub async fn post_comment(&self, comment: &NewComment) -> Result<Response, reqwest::Error> {
        let req = self
            .client
            .post(format!("{}/comment", self.gateway_url))
            .json(comment);
        self.send(req).await
    }

    async fn send(&self, req: RequestBuilder) -> Result<Response, reqwest::Error> {
        match &self.request_id {
            Some(id) => req.header("X-Request-ID", id.as_str()).send().await,
            None => req.send().await,
        }
    }
}

async fn decode<T: serde::de::DeserializeOwned>(
    resp: Response,
) -> Result<T, Box<dyn std::error::Error>> {
    let status = resp.status();
    let text = resp.text().await?;

    if !status.is_success() {
        return Err(ApiError {
            status: status.as_u16(),
            body: text,
        }
        .into());
    }

    Ok(serde_json::from_str::<T>(&text)?)
}
