//! Provider detail lookup endpoint

use crate::error::{ApiError, ApiResult};
use crate::models::{DetailsResponse, EntityKind};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct DetailsQuery {
    pub spotify_id: Option<String>,
    pub discogs_id: Option<String>,
}

/// GET /details/:kind?spotify_id=&discogs_id=
///
/// Side-by-side provider detail payloads for a selected search entry, used
/// to pre-fill a content record (name, images, bio, release date,
/// duration). At least one id must be supplied.
pub async fn details(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Query(params): Query<DetailsQuery>,
) -> ApiResult<Json<DetailsResponse>> {
    let kind: EntityKind = kind.parse().map_err(ApiError::BadRequest)?;

    if params.spotify_id.is_none() && params.discogs_id.is_none() {
        return Err(ApiError::BadRequest(
            "At least one of spotify_id/discogs_id is required".to_string(),
        ));
    }

    let response = state
        .search
        .details(
            kind,
            params.spotify_id.as_deref(),
            params.discogs_id.as_deref(),
        )
        .await;

    Ok(Json(response))
}

/// Build details routes
pub fn details_routes() -> Router<AppState> {
    Router::new().route("/details/:kind", get(details))
}
