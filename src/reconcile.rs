//! Multi-source search result reconciliation
//!
//! Merges candidate lists from the primary provider (Spotify) and the
//! secondary provider (Discogs) into one deduplicated list where entries
//! describing the same real-world artist/album/song carry both providers'
//! identifiers.
//!
//! # Matching
//! Names are compared by exact equality after normalization (lowercase +
//! trim). No fuzzy or edit-distance matching. Album matching additionally
//! requires the contributing-artist sets to intersect when both sides have
//! one; an empty set on either side falls back to name equality alone.
//!
//! # Purity
//! `reconcile` performs no I/O and cannot fail. Malformed candidates
//! (empty name) are dropped, never reported. Output order is fully
//! determined by input order: primary entries first, then secondary-only
//! entries, each in their input order.

use std::collections::{HashMap, HashSet};

/// One raw search hit from a single external provider, before merging.
///
/// `id` is the provider's opaque identifier (empty when the provider did not
/// supply one). For album candidates, `associated_names` holds contributing
/// artist names; it is empty in simple (artist/song) reconciliation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Candidate {
    /// Display name (primary provider) or composite title (secondary provider).
    pub name: String,
    /// Provider-assigned identifier, empty if absent.
    pub id: String,
    /// Contributing artist names, album reconciliation only.
    pub associated_names: Vec<String>,
}

impl Candidate {
    pub fn new(name: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
            associated_names: Vec::new(),
        }
    }

    pub fn with_artists(
        name: impl Into<String>,
        id: impl Into<String>,
        artists: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
            associated_names: artists,
        }
    }
}

/// A deduplicated record combining identifiers from up to two providers.
///
/// Either identifier may be empty (entry seen by only one provider), never
/// both: an entry exists only because at least one provider reported it.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ReconciledEntry {
    /// Canonical display name (first-seen spelling wins).
    pub name: String,
    /// Primary provider identifier, empty if absent.
    pub primary_id: String,
    /// Secondary provider identifier, empty if absent.
    pub secondary_id: String,
    /// Contributing artist names, album reconciliation only.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub associated_names: Vec<String>,
}

/// How candidate names are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Artist/song matching: normalized-name equality only.
    Simple,
    /// Album matching: secondary titles are composite `"<artist> - <album>"`
    /// strings, and contributing-artist sets must be compatible.
    Album,
}

/// Normalize a name for equality comparison: lowercase + trim.
pub fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Split a composite `"<artist> - <album>"` title into its parts.
///
/// The split happens at the first dash that leaves a non-empty remainder;
/// whitespace around the dash belongs to the separator. Returns
/// `(extracted_artist, album_name)`. Titles without a usable separator come
/// back whole as the album name with no extracted artist.
pub fn split_composite_title(title: &str) -> (Option<String>, String) {
    for (idx, _) in title.match_indices('-') {
        if idx == 0 {
            continue;
        }
        let rest = title[idx + 1..].trim();
        if rest.is_empty() {
            continue;
        }
        let prefix = title[..idx].trim();
        let artist = (!prefix.is_empty()).then(|| prefix.to_string());
        return (artist, rest.to_string());
    }
    (None, title.trim().to_string())
}

fn normalize_all(names: &[String]) -> Vec<String> {
    names.iter().map(|n| normalize(n)).collect()
}

fn sets_intersect(a: &[String], b: &[String]) -> bool {
    let b: HashSet<&str> = b.iter().map(String::as_str).collect();
    a.iter().any(|n| b.contains(n.as_str()))
}

/// In-provider duplicate key: normalized name, plus the normalized artist
/// list for album candidates so that same-named albums by different artists
/// survive as separate entries.
fn seen_key(normalized_name: &str, mode: MatchMode, normalized_artists: &[String]) -> String {
    match mode {
        MatchMode::Simple => normalized_name.to_string(),
        MatchMode::Album => format!("{}|{}", normalized_name, normalized_artists.join(",")),
    }
}

/// Merge two provider candidate lists into one deduplicated list.
///
/// Primary candidates are scanned first; the first occurrence of each
/// identity wins and later in-provider duplicates are dropped. Secondary
/// candidates then either fill the `secondary_id` of a matching entry
/// (first match wins, an already-assigned id is never overwritten) or append
/// a secondary-only entry.
///
/// In [`MatchMode::Album`] the secondary side's composite title is split via
/// [`split_composite_title`]; the extracted album name is what gets compared
/// and displayed, and the extracted artist stands in for the candidate's
/// associated names when it has none of its own.
pub fn reconcile(
    primary: &[Candidate],
    secondary: &[Candidate],
    mode: MatchMode,
) -> Vec<ReconciledEntry> {
    let mut entries: Vec<ReconciledEntry> = Vec::new();
    // Normalized name -> positions in `entries`, in first-seen order.
    // Explicit lookup-then-update keeps the merge free of aliasing.
    let mut by_name: HashMap<String, Vec<usize>> = HashMap::new();
    let mut seen: HashSet<String> = HashSet::new();

    for cand in primary {
        if cand.name.is_empty() {
            continue;
        }
        let normalized = normalize(&cand.name);
        let normalized_artists = normalize_all(&cand.associated_names);
        if !seen.insert(seen_key(&normalized, mode, &normalized_artists)) {
            continue;
        }
        let mut entry = ReconciledEntry {
            name: cand.name.clone(),
            primary_id: cand.id.clone(),
            secondary_id: String::new(),
            associated_names: Vec::new(),
        };
        if mode == MatchMode::Album {
            entry.associated_names = cand.associated_names.clone();
        }
        by_name.entry(normalized).or_default().push(entries.len());
        entries.push(entry);
    }

    for cand in secondary {
        if cand.name.is_empty() {
            continue;
        }
        let normalized_title = normalize(&cand.name);

        // Album titles from the secondary provider are composite strings;
        // the album part is what identity is keyed on.
        let (display_name, normalized_name, cand_artists) = match mode {
            MatchMode::Simple => (cand.name.clone(), normalized_title.clone(), Vec::new()),
            MatchMode::Album => {
                let (extracted_artist, album_name) = split_composite_title(&cand.name);
                let artists = if cand.associated_names.is_empty() {
                    extracted_artist.into_iter().collect()
                } else {
                    cand.associated_names.clone()
                };
                let normalized_album = normalize(&album_name);
                (album_name, normalized_album, artists)
            }
        };
        let normalized_artists = normalize_all(&cand_artists);

        let mut found = false;
        if let Some(positions) = by_name.get(&normalized_name) {
            for &pos in positions {
                if mode == MatchMode::Album {
                    let existing_artists = normalize_all(&entries[pos].associated_names);
                    let artists_match = normalized_artists.is_empty()
                        || existing_artists.is_empty()
                        || sets_intersect(&normalized_artists, &existing_artists);
                    if !artists_match {
                        continue;
                    }
                }
                if entries[pos].secondary_id.is_empty() {
                    entries[pos].secondary_id = cand.id.clone();
                    if entries[pos].associated_names.is_empty() && !cand_artists.is_empty() {
                        entries[pos].associated_names = cand_artists.clone();
                    }
                }
                found = true;
                break;
            }
        }
        if found {
            continue;
        }

        if !seen.insert(seen_key(&normalized_title, mode, &normalized_artists)) {
            continue;
        }
        let mut entry = ReconciledEntry {
            name: display_name,
            primary_id: String::new(),
            secondary_id: cand.id.clone(),
            associated_names: Vec::new(),
        };
        if mode == MatchMode::Album {
            entry.associated_names = cand_artists;
        }
        by_name.entry(normalized_name).or_default().push(entries.len());
        entries.push(entry);
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(artists: &[&str]) -> Vec<String> {
        artists.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  Queen "), "queen");
        assert_eq!(normalize("ABBA"), "abba");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_split_composite_title() {
        assert_eq!(
            split_composite_title("Queen - A Night at the Opera"),
            (Some("Queen".to_string()), "A Night at the Opera".to_string())
        );
        // Split happens at the first usable dash.
        assert_eq!(
            split_composite_title("AC/DC - Rock - Bust"),
            (Some("AC/DC".to_string()), "Rock - Bust".to_string())
        );
        // Tight dashes count too.
        assert_eq!(
            split_composite_title("Queen-Innuendo"),
            (Some("Queen".to_string()), "Innuendo".to_string())
        );
        // No separator: whole string is the album name.
        assert_eq!(split_composite_title("Innuendo"), (None, "Innuendo".to_string()));
        // Leading dash is not a separator.
        assert_eq!(
            split_composite_title("-Trailing"),
            (None, "-Trailing".to_string())
        );
    }

    #[test]
    fn test_empty_inputs() {
        assert_eq!(reconcile(&[], &[], MatchMode::Simple), vec![]);
        assert_eq!(reconcile(&[], &[], MatchMode::Album), vec![]);
    }

    #[test]
    fn test_primary_only() {
        let primary = vec![
            Candidate::new("Queen", "p1"),
            Candidate::new("ABBA", "p2"),
        ];
        let result = reconcile(&primary, &[], MatchMode::Simple);
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].name, "Queen");
        assert_eq!(result[0].primary_id, "p1");
        assert_eq!(result[0].secondary_id, "");
        assert_eq!(result[1].name, "ABBA");
    }

    #[test]
    fn test_secondary_only() {
        let secondary = vec![Candidate::new("Queen", "s1")];
        let result = reconcile(&[], &secondary, MatchMode::Simple);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].primary_id, "");
        assert_eq!(result[0].secondary_id, "s1");
    }

    #[test]
    fn test_simple_merge() {
        let primary = vec![Candidate::new("Queen", "p1")];
        let secondary = vec![Candidate::new("Queen", "s1")];
        let result = reconcile(&primary, &secondary, MatchMode::Simple);
        assert_eq!(
            result,
            vec![ReconciledEntry {
                name: "Queen".to_string(),
                primary_id: "p1".to_string(),
                secondary_id: "s1".to_string(),
                associated_names: vec![],
            }]
        );
    }

    #[test]
    fn test_simple_disjoint_preserves_order() {
        let primary = vec![Candidate::new("Queen", "p1")];
        let secondary = vec![Candidate::new("ABBA", "s2")];
        let result = reconcile(&primary, &secondary, MatchMode::Simple);
        assert_eq!(result.len(), 2);
        assert_eq!((result[0].name.as_str(), result[0].primary_id.as_str()), ("Queen", "p1"));
        assert_eq!(
            (result[1].name.as_str(), result[1].secondary_id.as_str()),
            ("ABBA", "s2")
        );
    }

    #[test]
    fn test_case_and_whitespace_insensitive() {
        let primary = vec![Candidate::new("Queen", "p1")];
        let secondary = vec![Candidate::new("  qUEEN ", "s1")];
        let result = reconcile(&primary, &secondary, MatchMode::Simple);
        assert_eq!(result.len(), 1);
        // First-seen spelling is kept.
        assert_eq!(result[0].name, "Queen");
        assert_eq!(result[0].secondary_id, "s1");
    }

    #[test]
    fn test_in_provider_duplicates_collapse() {
        let primary = vec![
            Candidate::new("Queen", "p1"),
            Candidate::new("queen", "p2"),
            Candidate::new("Queen ", "p3"),
        ];
        let result = reconcile(&primary, &[], MatchMode::Simple);
        assert_eq!(result.len(), 1);
        // First occurrence wins.
        assert_eq!(result[0].primary_id, "p1");
    }

    #[test]
    fn test_secondary_duplicates_collapse() {
        let secondary = vec![
            Candidate::new("ABBA", "s1"),
            Candidate::new("abba", "s2"),
        ];
        let result = reconcile(&[], &secondary, MatchMode::Simple);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].secondary_id, "s1");
    }

    #[test]
    fn test_secondary_id_never_overwritten() {
        let primary = vec![Candidate::new("Queen", "p1")];
        let secondary = vec![
            Candidate::new("Queen", "s1"),
            Candidate::new("queen", "s2"),
        ];
        let result = reconcile(&primary, &secondary, MatchMode::Simple);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].secondary_id, "s1");
    }

    #[test]
    fn test_nameless_candidates_skipped() {
        let primary = vec![Candidate::new("", "p1"), Candidate::new("Queen", "p2")];
        let secondary = vec![Candidate::new("", "s1")];
        let result = reconcile(&primary, &secondary, MatchMode::Simple);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].primary_id, "p2");
    }

    #[test]
    fn test_album_merge_on_composite_title() {
        let primary = vec![Candidate::with_artists(
            "A Night at the Opera",
            "p1",
            names(&["Queen"]),
        )];
        let secondary = vec![Candidate::new("Queen - A Night at the Opera", "s1")];
        let result = reconcile(&primary, &secondary, MatchMode::Album);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "A Night at the Opera");
        assert_eq!(result[0].primary_id, "p1");
        assert_eq!(result[0].secondary_id, "s1");
        assert_eq!(result[0].associated_names, names(&["Queen"]));
    }

    #[test]
    fn test_album_no_merge_on_artist_mismatch() {
        let primary = vec![Candidate::with_artists(
            "A Night at the Opera",
            "p1",
            names(&["Queen"]),
        )];
        let secondary = vec![Candidate::new("Other Band - A Night at the Opera", "s2")];
        let result = reconcile(&primary, &secondary, MatchMode::Album);
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].secondary_id, "");
        assert_eq!(result[1].name, "A Night at the Opera");
        assert_eq!(result[1].secondary_id, "s2");
        assert_eq!(result[1].associated_names, names(&["Other Band"]));
    }

    #[test]
    fn test_album_merge_when_either_side_has_no_artists() {
        // Primary side has no artist names: name match alone suffices.
        let primary = vec![Candidate::new("Innuendo", "p1")];
        let secondary = vec![Candidate::new("Queen - Innuendo", "s1")];
        let result = reconcile(&primary, &secondary, MatchMode::Album);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].secondary_id, "s1");
        // The secondary side's artists are copied onto the bare entry.
        assert_eq!(result[0].associated_names, names(&["Queen"]));

        // Secondary side has no artists at all (no composite prefix).
        let primary = vec![Candidate::with_artists("Innuendo", "p1", names(&["Queen"]))];
        let secondary = vec![Candidate::new("Innuendo", "s1")];
        let result = reconcile(&primary, &secondary, MatchMode::Album);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].secondary_id, "s1");
        assert_eq!(result[0].associated_names, names(&["Queen"]));
    }

    #[test]
    fn test_album_artist_intersection_is_enough() {
        let primary = vec![Candidate::with_artists(
            "Under Pressure",
            "p1",
            names(&["Queen", "David Bowie"]),
        )];
        let secondary = vec![Candidate::with_artists(
            "Queen - Under Pressure",
            "s1",
            names(&["queen "]),
        )];
        let result = reconcile(&primary, &secondary, MatchMode::Album);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].secondary_id, "s1");
    }

    #[test]
    fn test_album_same_name_different_artists_kept_apart() {
        let primary = vec![
            Candidate::with_artists("Greatest Hits", "p1", names(&["Queen"])),
            Candidate::with_artists("Greatest Hits", "p2", names(&["ABBA"])),
        ];
        let secondary = vec![Candidate::new("ABBA - Greatest Hits", "s1")];
        let result = reconcile(&primary, &secondary, MatchMode::Album);
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].primary_id, "p1");
        assert_eq!(result[0].secondary_id, "");
        assert_eq!(result[1].primary_id, "p2");
        assert_eq!(result[1].secondary_id, "s1");
    }

    #[test]
    fn test_secondary_matches_earlier_secondary_entry() {
        // A secondary-only entry participates in later matching: the second
        // candidate for the same album is absorbed, not appended.
        let secondary = vec![
            Candidate::new("Queen - Innuendo", "s1"),
            Candidate::new("Queen - Innuendo", "s2"),
        ];
        let result = reconcile(&[], &secondary, MatchMode::Album);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].secondary_id, "s1");
    }

    #[test]
    fn test_deterministic() {
        let primary = vec![
            Candidate::new("Queen", "p1"),
            Candidate::new("ABBA", "p2"),
            Candidate::new("Genesis", "p3"),
        ];
        let secondary = vec![
            Candidate::new("abba", "s1"),
            Candidate::new("Yes", "s2"),
        ];
        let first = reconcile(&primary, &secondary, MatchMode::Simple);
        let second = reconcile(&primary, &secondary, MatchMode::Simple);
        assert_eq!(first, second);
        let order: Vec<&str> = first.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(order, vec!["Queen", "ABBA", "Genesis", "Yes"]);
    }
}
