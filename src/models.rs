//! Shared domain and API types

use crate::reconcile::ReconciledEntry;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of catalog entity being searched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Artist,
    Album,
    Song,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Artist => "artist",
            EntityKind::Album => "album",
            EntityKind::Song => "song",
        }
    }

    /// Spotify search `type` parameter for this kind
    pub fn spotify_type(&self) -> &'static str {
        match self {
            EntityKind::Artist => "artist",
            EntityKind::Album => "album",
            EntityKind::Song => "track",
        }
    }

    /// Discogs search `type` parameter, `None` where Discogs has no
    /// equivalent (songs are not searchable there)
    pub fn discogs_type(&self) -> Option<&'static str> {
        match self {
            EntityKind::Artist => Some("artist"),
            EntityKind::Album => Some("release"),
            EntityKind::Song => None,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "artist" => Ok(EntityKind::Artist),
            "album" => Ok(EntityKind::Album),
            "song" | "track" => Ok(EntityKind::Song),
            other => Err(format!("unknown entity kind: {}", other)),
        }
    }
}

/// Response body for `GET /search`
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub kind: EntityKind,
    pub count: usize,
    pub results: Vec<ReconciledEntry>,
}

/// One autocomplete suggestion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutocompleteMatch {
    /// Value inserted into the input field
    pub value: String,
    /// Rendered label
    pub label: String,
    /// Provider identifier for the suggested entity
    pub id: String,
}

/// Response body for `GET /details/:kind`
///
/// Side-by-side provider payloads so the consumer can offer a per-field
/// source choice when pre-filling a content record. A provider the caller
/// gave no id for, or that failed upstream, is simply absent.
#[derive(Debug, Serialize)]
pub struct DetailsResponse {
    pub kind: EntityKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spotify: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discogs: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_kind_round_trip() {
        for kind in [EntityKind::Artist, EntityKind::Album, EntityKind::Song] {
            assert_eq!(kind.as_str().parse::<EntityKind>().unwrap(), kind);
        }
        assert!("playlist".parse::<EntityKind>().is_err());
    }

    #[test]
    fn test_provider_type_mapping() {
        assert_eq!(EntityKind::Song.spotify_type(), "track");
        assert_eq!(EntityKind::Album.discogs_type(), Some("release"));
        assert_eq!(EntityKind::Song.discogs_type(), None);
    }
}
