//! Spotify Web API client
//!
//! Search and detail lookups against the Spotify Web API, authenticating
//! with the OAuth2 client-credentials flow. The access token is cached and
//! refreshed shortly before expiry; callers never see token plumbing.
//!
//! # API Reference
//! - Search: `GET {api}/search?q=&type=&limit=`
//! - Details: `GET {api}/artists/{id}`, `/albums/{id}`, `/tracks/{id}`
//! - Token: `POST https://accounts.spotify.com/api/token` (HTTP Basic)

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

const TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);
/// Refresh the cached token this long before its stated expiry
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(30);

/// Spotify client errors
#[derive(Debug, Error)]
pub enum SpotifyError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

struct CachedToken {
    value: String,
    expires_at: Instant,
}

/// Spotify artist details
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifyArtist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub images: Vec<SpotifyImage>,
    #[serde(default)]
    pub popularity: Option<u32>,
}

/// Spotify album details
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifyAlbum {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub total_tracks: Option<u32>,
    #[serde(default)]
    pub images: Vec<SpotifyImage>,
    #[serde(default)]
    pub artists: Vec<SpotifyArtistRef>,
}

/// Spotify track details
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifyTrack {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub duration_ms: Option<u64>,
    #[serde(default)]
    pub artists: Vec<SpotifyArtistRef>,
    #[serde(default)]
    pub album: Option<SpotifyAlbumRef>,
}

/// Abbreviated artist reference embedded in albums/tracks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifyArtistRef {
    pub id: String,
    pub name: String,
}

/// Abbreviated album reference embedded in tracks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifyAlbumRef {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub images: Vec<SpotifyImage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifyImage {
    pub url: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

/// Spotify Web API client with cached client-credentials token
pub struct SpotifyClient {
    http_client: reqwest::Client,
    client_id: String,
    client_secret: String,
    api_uri: String,
    token: Mutex<Option<CachedToken>>,
}

impl SpotifyClient {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        api_uri: impl Into<String>,
    ) -> Result<Self, SpotifyError> {
        let http_client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| SpotifyError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            api_uri: api_uri.into().trim_end_matches('/').to_string(),
            token: Mutex::new(None),
        })
    }

    /// Get a valid access token, fetching a fresh one when the cache is
    /// empty or about to expire
    async fn access_token(&self) -> Result<String, SpotifyError> {
        let mut cached = self.token.lock().await;

        if let Some(token) = cached.as_ref() {
            if token.expires_at > Instant::now() {
                return Ok(token.value.clone());
            }
        }

        debug!("Requesting Spotify client-credentials token");
        let response = self
            .http_client
            .post(TOKEN_URL)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| SpotifyError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SpotifyError::Auth(format!(
                "Token request failed with {}: {}",
                status, body
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| SpotifyError::Parse(e.to_string()))?;

        let lifetime = Duration::from_secs(token.expires_in).saturating_sub(TOKEN_EXPIRY_MARGIN);
        *cached = Some(CachedToken {
            value: token.access_token.clone(),
            expires_at: Instant::now() + lifetime,
        });

        Ok(token.access_token)
    }

    /// Run a catalog search, returning the raw response for table-driven
    /// candidate extraction
    pub async fn search(
        &self,
        query: &str,
        search_type: &str,
        limit: u32,
    ) -> Result<Value, SpotifyError> {
        let token = self.access_token().await?;
        let url = format!("{}/search", self.api_uri);

        debug!(query = %query, search_type = %search_type, "Spotify search");

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(token)
            .query(&[
                ("q", query),
                ("type", search_type),
                ("limit", &limit.to_string()),
            ])
            .send()
            .await
            .map_err(|e| SpotifyError::Network(e.to_string()))?;

        Self::parse_json(response).await
    }

    /// Fetch artist details by Spotify ID
    pub async fn artist(&self, id: &str) -> Result<SpotifyArtist, SpotifyError> {
        self.fetch_details("artists", id).await
    }

    /// Fetch album details by Spotify ID
    pub async fn album(&self, id: &str) -> Result<SpotifyAlbum, SpotifyError> {
        self.fetch_details("albums", id).await
    }

    /// Fetch track details by Spotify ID
    pub async fn track(&self, id: &str) -> Result<SpotifyTrack, SpotifyError> {
        self.fetch_details("tracks", id).await
    }

    async fn fetch_details<T: serde::de::DeserializeOwned>(
        &self,
        resource: &str,
        id: &str,
    ) -> Result<T, SpotifyError> {
        let token = self.access_token().await?;
        let url = format!("{}/{}/{}", self.api_uri, resource, id);

        debug!(url = %url, "Spotify detail lookup");

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| SpotifyError::Network(e.to_string()))?;

        let value = Self::parse_json(response).await?;
        serde_json::from_value(value).map_err(|e| SpotifyError::Parse(e.to_string()))
    }

    async fn parse_json(response: reqwest::Response) -> Result<Value, SpotifyError> {
        let status = response.status();

        if status.as_u16() == 404 {
            return Err(SpotifyError::NotFound("no such resource".to_string()));
        }
        if status.as_u16() == 401 {
            let body = response.text().await.unwrap_or_default();
            return Err(SpotifyError::Auth(body));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SpotifyError::Api(status.as_u16(), body));
        }

        response
            .json()
            .await
            .map_err(|e| SpotifyError::Parse(e.to_string()))
    }
}
