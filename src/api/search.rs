//! Combined search endpoint

use crate::error::{ApiError, ApiResult};
use crate::models::{EntityKind, SearchResponse};
use crate::AppState;
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::info;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    /// Free-text search phrase
    pub q: String,
    /// Entity kind to search for
    pub kind: EntityKind,
}

/// GET /search?q=&kind=artist|album|song
///
/// Searches both providers and returns the reconciled, deduplicated result
/// list. Provider failures degrade to partial results rather than erroring.
pub async fn combined_search(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> ApiResult<Json<SearchResponse>> {
    let query = params.q.trim().to_string();
    if query.is_empty() {
        return Err(ApiError::BadRequest("Search query cannot be empty".to_string()));
    }

    let results = state.search.combined_search(&query, params.kind).await;

    info!(
        query = %query,
        kind = %params.kind,
        count = results.len(),
        "Search request served"
    );

    Ok(Json(SearchResponse {
        query,
        kind: params.kind,
        count: results.len(),
        results,
    }))
}

/// Build search routes
pub fn search_routes() -> Router<AppState> {
    Router::new().route("/search", get(combined_search))
}
