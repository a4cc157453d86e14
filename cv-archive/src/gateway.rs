//! Page and payload fetching
//!
//! Blog pages are plain HTML. A transaction resolves through the gateway
//! to a JSON document describing the post.

use crate::error::{ScrapeError, ScrapeResult};
use serde::Deserialize;

/// Post document stored under a transaction
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostPayload {
    /// Post body as Markdown
    pub markdown: Option<String>,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub cover_img: Option<CoverImage>,
    /// Post body as a serialized rich-text document (JSON inside a string)
    pub json: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CoverImage {
    pub img: Option<ImageSource>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageSource {
    pub src: Option<String>,
}

impl PostPayload {
    /// Cover image URL, if the post has one
    pub fn cover_src(&self) -> Option<&str> {
        self.cover_img
            .as_ref()
            .and_then(|cover| cover.img.as_ref())
            .and_then(|img| img.src.as_deref())
            .filter(|src| !src.is_empty())
    }
}

/// GET `url` and return the body of a successful response
pub async fn fetch_page(http: &reqwest::Client, url: &str) -> ScrapeResult<String> {
    tracing::debug!(url = %url, "Fetching page");

    let response = http.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(ScrapeError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    Ok(response.text().await?)
}

/// Resolves transactions through an Arweave gateway
#[derive(Debug, Clone)]
pub struct GatewayClient {
    http: reqwest::Client,
    base: String,
}

impl GatewayClient {
    pub fn new(http: reqwest::Client, base: impl Into<String>) -> Self {
        Self {
            http,
            base: base.into(),
        }
    }

    /// Gateway URL of a transaction
    pub fn transaction_url(&self, tx: &str) -> String {
        format!("{}/{}", self.base.trim_end_matches('/'), tx)
    }

    /// Fetch and parse the post payload stored under `tx`
    pub async fn fetch_payload(&self, tx: &str) -> ScrapeResult<PostPayload> {
        let body = fetch_page(&self.http, &self.transaction_url(tx)).await?;
        Ok(serde_json::from_str(&body)?)
    }
}
