//! # music-db
//!
//! Multi-source music search and reconciliation service. Searches Spotify
//! (primary provider) and Discogs (secondary provider) for artists, albums,
//! and songs, merges the two result lists into one deduplicated list where
//! entries for the same real-world entity carry both providers'
//! identifiers, and serves detail lookups for pre-filling content records
//! from a selected entry.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod providers;
pub mod reconcile;
pub mod services;

pub use crate::error::{ApiError, ApiResult, Error, Result};

use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::AppConfig;
use crate::services::SearchService;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Multi-provider search orchestrator
    pub search: Arc<SearchService>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
    /// Last provider error for diagnostics, written by the search service
    /// and surfaced by the health endpoint
    pub last_error: Arc<RwLock<Option<String>>>,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let last_error = Arc::new(RwLock::new(None));
        Ok(Self {
            search: Arc::new(SearchService::new(config, last_error.clone())?),
            startup_time: Utc::now(),
            last_error,
        })
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::search_routes())
        .merge(api::autocomplete_routes())
        .merge(api::details_routes())
        .merge(api::health_routes())
        .with_state(state)
}
