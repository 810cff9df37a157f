//! Discogs API client
//!
//! Database search and artist lookups against the Discogs API. Requests are
//! rate limited to 1/sec and carry the mandatory `User-Agent`; a personal
//! access token is attached when configured (unauthenticated requests work,
//! with tighter provider-side limits).
//!
//! # API Reference
//! - Search: `GET {api}/database/search?q=&type=&per_page=&page=1`
//! - Artist: `GET {api}/artists/{id}`

use crate::providers::RateLimiter;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

const USER_AGENT: &str = "music-db/0.1.0 (https://github.com/music-db/music-db)";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);
const RATE_LIMIT_MS: u64 = 1000; // 1 request per second

/// Discogs client errors
#[derive(Debug, Error)]
pub enum DiscogsError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Discogs artist details
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscogsArtist {
    pub id: u64,
    pub name: String,
    /// Free-text biography
    #[serde(default)]
    pub profile: Option<String>,
    #[serde(default)]
    pub images: Vec<DiscogsImage>,
    #[serde(default)]
    pub urls: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscogsImage {
    pub uri: String,
    #[serde(default, rename = "type")]
    pub image_type: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

/// Discogs API client
pub struct DiscogsClient {
    http_client: reqwest::Client,
    api_uri: String,
    token: Option<String>,
    rate_limiter: Arc<RateLimiter>,
}

impl DiscogsClient {
    pub fn new(
        api_uri: impl Into<String>,
        token: Option<String>,
    ) -> Result<Self, DiscogsError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| DiscogsError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            api_uri: api_uri.into().trim_end_matches('/').to_string(),
            token: token.map(|t| t.trim().to_string()).filter(|t| !t.is_empty()),
            rate_limiter: Arc::new(RateLimiter::new(RATE_LIMIT_MS)),
        })
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.header("Authorization", format!("Discogs token={}", token)),
            None => request,
        }
    }

    /// Run a database search, returning the raw response for table-driven
    /// candidate extraction
    pub async fn search(
        &self,
        query: &str,
        search_type: &str,
        limit: u32,
    ) -> Result<Value, DiscogsError> {
        self.rate_limiter.wait().await;

        let url = format!("{}/database/search", self.api_uri);
        debug!(query = %query, search_type = %search_type, "Discogs search");

        let request = self.http_client.get(&url).query(&[
            ("q", query),
            ("type", search_type),
            ("per_page", &limit.to_string()),
            ("page", "1"),
        ]);

        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| DiscogsError::Network(e.to_string()))?;

        Self::parse_json(response).await
    }

    /// Fetch artist details by Discogs ID
    pub async fn artist(&self, id: &str) -> Result<DiscogsArtist, DiscogsError> {
        self.rate_limiter.wait().await;

        let url = format!("{}/artists/{}", self.api_uri, id);
        debug!(url = %url, "Discogs artist lookup");

        let response = self
            .authorize(self.http_client.get(&url))
            .send()
            .await
            .map_err(|e| DiscogsError::Network(e.to_string()))?;

        let value = Self::parse_json(response).await?;
        serde_json::from_value(value).map_err(|e| DiscogsError::Parse(e.to_string()))
    }

    async fn parse_json(response: reqwest::Response) -> Result<Value, DiscogsError> {
        let status = response.status();

        if status.as_u16() == 404 {
            return Err(DiscogsError::NotFound("no such resource".to_string()));
        }
        if status.as_u16() == 429 {
            return Err(DiscogsError::RateLimitExceeded);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DiscogsError::Api(status.as_u16(), body));
        }

        response
            .json()
            .await
            .map_err(|e| DiscogsError::Parse(e.to_string()))
    }
}
