//! Combined search orchestration
//!
//! Queries both providers for a search phrase, maps each raw response to a
//! uniform candidate list through the routing table, and hands both lists to
//! the reconciler. A provider failure never fails the search: it degrades to
//! an empty candidate list with a warning, so the other provider's results
//! still come through.

use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::models::{AutocompleteMatch, DetailsResponse, EntityKind};
use crate::providers::{
    extract_candidates, route_for, DiscogsClient, Provider, SpotifyClient,
};
use crate::reconcile::{reconcile, Candidate, MatchMode, ReconciledEntry};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// Autocomplete inputs shorter than this return no suggestions
const AUTOCOMPLETE_MIN_CHARS: usize = 2;
/// Autocomplete suggestion cap
const AUTOCOMPLETE_LIMIT: u32 = 8;

/// Id values that mean "no id": route placeholders from selection flows
fn is_absent_id(id: Option<&str>) -> bool {
    matches!(id, None | Some("") | Some("none") | Some("0"))
}

/// Multi-provider search service
pub struct SearchService {
    spotify: SpotifyClient,
    discogs: DiscogsClient,
    max_hits: u32,
    /// Most recent provider failure, surfaced by the health endpoint
    last_error: Arc<RwLock<Option<String>>>,
}

impl SearchService {
    pub fn new(config: &AppConfig, last_error: Arc<RwLock<Option<String>>>) -> Result<Self> {
        let spotify = SpotifyClient::new(
            config.spotify_client_id.clone(),
            config.spotify_client_secret.clone(),
            config.spotify_api_uri.clone(),
        )
        .map_err(|e| Error::Internal(format!("Spotify client init failed: {}", e)))?;

        let discogs = DiscogsClient::new(
            config.discogs_api_uri.clone(),
            config.discogs_token.clone(),
        )
        .map_err(|e| Error::Internal(format!("Discogs client init failed: {}", e)))?;

        Ok(Self {
            spotify,
            discogs,
            max_hits: config.max_hits,
            last_error,
        })
    }

    async fn record_error(&self, message: String) {
        *self.last_error.write().await = Some(message);
    }

    /// Search both providers and reconcile the results into one
    /// deduplicated list
    pub async fn combined_search(&self, query: &str, kind: EntityKind) -> Vec<ReconciledEntry> {
        let (spotify_candidates, discogs_candidates) = tokio::join!(
            self.provider_candidates(Provider::Spotify, query, kind, self.max_hits),
            self.provider_candidates(Provider::Discogs, query, kind, self.max_hits),
        );

        let mode = match kind {
            EntityKind::Album => MatchMode::Album,
            _ => MatchMode::Simple,
        };

        let results = reconcile(&spotify_candidates, &discogs_candidates, mode);
        debug!(
            query = %query,
            kind = %kind,
            spotify = spotify_candidates.len(),
            discogs = discogs_candidates.len(),
            reconciled = results.len(),
            "Combined search complete"
        );
        results
    }

    /// Fetch one provider's candidates, degrading any failure to an empty
    /// list
    async fn provider_candidates(
        &self,
        provider: Provider,
        query: &str,
        kind: EntityKind,
        limit: u32,
    ) -> Vec<Candidate> {
        let Some(route) = route_for(provider, kind) else {
            // Provider cannot search this kind (e.g. Discogs songs).
            return Vec::new();
        };

        let response = match provider {
            Provider::Spotify => self
                .spotify
                .search(query, route.search_type, limit)
                .await
                .map_err(|e| e.to_string()),
            Provider::Discogs => self
                .discogs
                .search(query, route.search_type, limit)
                .await
                .map_err(|e| e.to_string()),
        };

        match response {
            Ok(value) => extract_candidates(&value, route),
            Err(e) => {
                warn!(provider = provider.as_str(), kind = %kind, error = %e, "Provider search failed");
                self.record_error(format!("{} {} search failed: {}", provider.as_str(), kind, e))
                    .await;
                Vec::new()
            }
        }
    }

    /// Single-provider suggestions for typeahead inputs
    pub async fn autocomplete(
        &self,
        provider: Provider,
        kind: EntityKind,
        input: &str,
    ) -> Vec<AutocompleteMatch> {
        let input = input.trim();
        if input.chars().count() < AUTOCOMPLETE_MIN_CHARS {
            return Vec::new();
        }

        self.provider_candidates(provider, input, kind, AUTOCOMPLETE_LIMIT)
            .await
            .into_iter()
            .map(|c| AutocompleteMatch {
                value: c.name.clone(),
                label: c.name,
                id: c.id,
            })
            .collect()
    }

    /// Fetch side-by-side provider detail payloads for a selected entry.
    ///
    /// Absent ids (`""`, `"none"`, `"0"`) skip that provider, and upstream
    /// failures degrade to an absent payload with a warning.
    pub async fn details(
        &self,
        kind: EntityKind,
        spotify_id: Option<&str>,
        discogs_id: Option<&str>,
    ) -> DetailsResponse {
        let spotify = if is_absent_id(spotify_id) {
            None
        } else {
            let id = spotify_id.unwrap_or_default();
            let result = match kind {
                EntityKind::Artist => self
                    .spotify
                    .artist(id)
                    .await
                    .and_then(|a| serde_json::to_value(a).map_err(parse_error)),
                EntityKind::Album => self
                    .spotify
                    .album(id)
                    .await
                    .and_then(|a| serde_json::to_value(a).map_err(parse_error)),
                EntityKind::Song => self
                    .spotify
                    .track(id)
                    .await
                    .and_then(|t| serde_json::to_value(t).map_err(parse_error)),
            };
            match result {
                Ok(value) => Some(value),
                Err(e) => {
                    warn!(id = %id, error = %e, "Spotify detail lookup failed");
                    self.record_error(format!("spotify {} detail lookup failed: {}", kind, e))
                        .await;
                    None
                }
            }
        };

        // Discogs detail lookups exist for artists only.
        let discogs = if kind != EntityKind::Artist || is_absent_id(discogs_id) {
            None
        } else {
            let id = discogs_id.unwrap_or_default();
            match self.discogs.artist(id).await {
                Ok(artist) => serde_json::to_value(artist).ok(),
                Err(e) => {
                    warn!(id = %id, error = %e, "Discogs detail lookup failed");
                    self.record_error(format!("discogs artist detail lookup failed: {}", e))
                        .await;
                    None
                }
            }
        };

        DetailsResponse {
            kind,
            spotify,
            discogs,
        }
    }
}

fn parse_error(e: serde_json::Error) -> crate::providers::SpotifyError {
    crate::providers::SpotifyError::Parse(e.to_string())
}
