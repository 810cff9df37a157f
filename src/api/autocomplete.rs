//! Typeahead suggestion endpoint

use crate::error::{ApiError, ApiResult};
use crate::models::{AutocompleteMatch, EntityKind};
use crate::providers::Provider;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct AutocompleteQuery {
    /// Partial input typed so far
    #[serde(default)]
    pub q: String,
}

/// GET /autocomplete/:provider/:kind?q=
///
/// Single-provider suggestions for typeahead inputs. Inputs shorter than
/// two characters return an empty list, as does a provider/kind pair the
/// provider cannot search.
pub async fn autocomplete(
    State(state): State<AppState>,
    Path((provider, kind)): Path<(String, String)>,
    Query(params): Query<AutocompleteQuery>,
) -> ApiResult<Json<Vec<AutocompleteMatch>>> {
    let provider: Provider = provider.parse().map_err(ApiError::BadRequest)?;
    let kind: EntityKind = kind.parse().map_err(ApiError::BadRequest)?;

    let matches = state.search.autocomplete(provider, kind, &params.q).await;
    Ok(Json(matches))
}

/// Build autocomplete routes
pub fn autocomplete_routes() -> Router<AppState> {
    Router::new().route("/autocomplete/:provider/:kind", get(autocomplete))
}
