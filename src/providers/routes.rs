//! Provider response routing table
//!
//! Each provider shapes its search responses differently: Spotify nests hits
//! under `artists.items` / `albums.items` / `tracks.items` with a `name`
//! field, Discogs puts everything under `results` with a `title` field.
//! Rather than branching inside the merge logic, a small table maps
//! (provider, entity kind) to the paths and field names needed to pull a
//! uniform candidate list out of the raw JSON.

use crate::models::EntityKind;
use crate::providers::Provider;
use crate::reconcile::Candidate;
use serde_json::Value;

/// How to extract candidates from one provider's search response
#[derive(Debug, Clone, Copy)]
pub struct ProviderRoute {
    /// Provider-side search `type` parameter
    pub search_type: &'static str,
    /// Path from the response root to the hit array
    pub result_path: &'static [&'static str],
    /// Field holding the display name/title
    pub name_field: &'static str,
    /// Field holding the provider identifier
    pub id_field: &'static str,
    /// Field holding contributing artist objects (`{name}`), if the
    /// provider supplies them
    pub artists_field: Option<&'static str>,
}

const SPOTIFY_ARTIST: ProviderRoute = ProviderRoute {
    search_type: "artist",
    result_path: &["artists", "items"],
    name_field: "name",
    id_field: "id",
    artists_field: None,
};

const SPOTIFY_ALBUM: ProviderRoute = ProviderRoute {
    search_type: "album",
    result_path: &["albums", "items"],
    name_field: "name",
    id_field: "id",
    artists_field: Some("artists"),
};

const SPOTIFY_TRACK: ProviderRoute = ProviderRoute {
    search_type: "track",
    result_path: &["tracks", "items"],
    name_field: "name",
    id_field: "id",
    artists_field: None,
};

const DISCOGS_ARTIST: ProviderRoute = ProviderRoute {
    search_type: "artist",
    result_path: &["results"],
    name_field: "title",
    id_field: "id",
    artists_field: None,
};

const DISCOGS_RELEASE: ProviderRoute = ProviderRoute {
    search_type: "release",
    result_path: &["results"],
    name_field: "title",
    id_field: "id",
    artists_field: None,
};

/// Look up the extraction route for a provider/kind pair.
///
/// `None` means the provider cannot search that kind at all (Discogs has no
/// song search); callers treat it as an empty candidate list.
pub fn route_for(provider: Provider, kind: EntityKind) -> Option<&'static ProviderRoute> {
    match (provider, kind) {
        (Provider::Spotify, EntityKind::Artist) => Some(&SPOTIFY_ARTIST),
        (Provider::Spotify, EntityKind::Album) => Some(&SPOTIFY_ALBUM),
        (Provider::Spotify, EntityKind::Song) => Some(&SPOTIFY_TRACK),
        (Provider::Discogs, EntityKind::Artist) => Some(&DISCOGS_ARTIST),
        (Provider::Discogs, EntityKind::Album) => Some(&DISCOGS_RELEASE),
        (Provider::Discogs, EntityKind::Song) => None,
    }
}

/// Pull a uniform candidate list out of a raw search response.
///
/// Hits without a name are dropped; hits without an identifier are kept
/// with an empty id. Numeric identifiers (Discogs) are stringified.
pub fn extract_candidates(response: &Value, route: &ProviderRoute) -> Vec<Candidate> {
    let mut items = response;
    for key in route.result_path {
        items = match items.get(key) {
            Some(v) => v,
            None => return Vec::new(),
        };
    }
    let Some(items) = items.as_array() else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| {
            let name = item.get(route.name_field)?.as_str()?;
            if name.is_empty() {
                return None;
            }
            let id = item
                .get(route.id_field)
                .and_then(stringify_id)
                .unwrap_or_default();

            let associated_names = route
                .artists_field
                .and_then(|field| item.get(field))
                .and_then(Value::as_array)
                .map(|artists| {
                    artists
                        .iter()
                        .filter_map(|a| a.get("name").and_then(Value::as_str))
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default();

            Some(Candidate {
                name: name.to_string(),
                id,
                associated_names,
            })
        })
        .collect()
}

fn stringify_id(id: &Value) -> Option<String> {
    match id {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_route_table_coverage() {
        assert!(route_for(Provider::Spotify, EntityKind::Song).is_some());
        assert!(route_for(Provider::Discogs, EntityKind::Song).is_none());
        assert_eq!(
            route_for(Provider::Discogs, EntityKind::Album).unwrap().search_type,
            "release"
        );
    }

    #[test]
    fn test_extract_spotify_artists() {
        let response = json!({
            "artists": {
                "items": [
                    {"name": "Queen", "id": "sp1", "popularity": 90},
                    {"name": "", "id": "sp2"},
                    {"id": "sp3"},
                ]
            }
        });
        let candidates = extract_candidates(&response, &SPOTIFY_ARTIST);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].name, "Queen");
        assert_eq!(candidates[0].id, "sp1");
        assert!(candidates[0].associated_names.is_empty());
    }

    #[test]
    fn test_extract_spotify_albums_with_artists() {
        let response = json!({
            "albums": {
                "items": [
                    {
                        "name": "A Night at the Opera",
                        "id": "al1",
                        "artists": [{"name": "Queen", "id": "sp1"}],
                    },
                ]
            }
        });
        let candidates = extract_candidates(&response, &SPOTIFY_ALBUM);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].associated_names, vec!["Queen".to_string()]);
    }

    #[test]
    fn test_extract_discogs_numeric_ids() {
        let response = json!({
            "results": [
                {"title": "Queen - Innuendo", "id": 123456},
                {"title": "Queen", "id": "78"},
            ]
        });
        let candidates = extract_candidates(&response, &DISCOGS_RELEASE);
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].id, "123456");
        assert_eq!(candidates[1].id, "78");
    }

    #[test]
    fn test_extract_keeps_hits_without_ids() {
        let response = json!({
            "artists": {
                "items": [
                    {"name": "ABBA"},
                    {"name": "Queen", "id": ""},
                    {"name": "Genesis", "id": "sp9"},
                ]
            }
        });
        let candidates = extract_candidates(&response, &SPOTIFY_ARTIST);
        assert_eq!(candidates.len(), 3);
        assert_eq!(candidates[0].id, "");
        assert_eq!(candidates[1].id, "");
        assert_eq!(candidates[2].id, "sp9");
    }

    #[test]
    fn test_extract_missing_path_is_empty() {
        let response = json!({"tracks": {}});
        assert!(extract_candidates(&response, &SPOTIFY_TRACK).is_empty());
        assert!(extract_candidates(&json!(null), &DISCOGS_ARTIST).is_empty());
    }
}
