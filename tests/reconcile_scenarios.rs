//! End-to-end reconciliation scenarios
//!
//! Candidate lists shaped like real provider responses, run through the
//! extraction table and the reconciler together.

use music_db::models::EntityKind;
use music_db::providers::{extract_candidates, route_for, Provider};
use music_db::reconcile::{reconcile, Candidate, MatchMode, ReconciledEntry};
use serde_json::json;

#[test]
fn artist_search_merges_across_providers() {
    let spotify_response = json!({
        "artists": {
            "items": [
                {"name": "Queen", "id": "1dfeR4HaWDbWqFHLkxsg1d"},
                {"name": "Queen Latifah", "id": "4HSqsJNYCLYBHWyCDnDlVw"},
                {"name": "Queens of the Stone Age", "id": "4pejUc4iciQfgdX6OKulQn"},
            ]
        }
    });
    let discogs_response = json!({
        "results": [
            {"title": "Queen", "id": 81013},
            {"title": "The Queen Family", "id": 2161441},
        ]
    });

    let spotify = extract_candidates(
        &spotify_response,
        route_for(Provider::Spotify, EntityKind::Artist).unwrap(),
    );
    let discogs = extract_candidates(
        &discogs_response,
        route_for(Provider::Discogs, EntityKind::Artist).unwrap(),
    );

    let merged = reconcile(&spotify, &discogs, MatchMode::Simple);
    assert_eq!(merged.len(), 4);

    // "Queen" exists on both sides and carries both ids.
    assert_eq!(merged[0].name, "Queen");
    assert_eq!(merged[0].primary_id, "1dfeR4HaWDbWqFHLkxsg1d");
    assert_eq!(merged[0].secondary_id, "81013");

    // Spotify-only entries keep their input order and stay secondary-less.
    assert_eq!(merged[1].name, "Queen Latifah");
    assert_eq!(merged[1].secondary_id, "");

    // The Discogs-only entry trails the primary block.
    assert_eq!(merged[3].name, "The Queen Family");
    assert_eq!(merged[3].primary_id, "");
    assert_eq!(merged[3].secondary_id, "2161441");
}

#[test]
fn album_search_merges_on_composite_titles() {
    let spotify_response = json!({
        "albums": {
            "items": [
                {
                    "name": "A Night at the Opera",
                    "id": "1GbtB4zTqAsyfZEsm1RZfx",
                    "artists": [{"name": "Queen", "id": "1dfeR4HaWDbWqFHLkxsg1d"}],
                },
                {
                    "name": "A Night at the Opera",
                    "id": "3zgnzrvRrlpJuZVSHfEBL1",
                    "artists": [{"name": "Blind Guardian", "id": "3ZQgQYkLAVfA9nqzG2pHkw"}],
                },
            ]
        }
    });
    let discogs_response = json!({
        "results": [
            {"title": "Queen - A Night At The Opera", "id": 156437},
            {"title": "Blind Guardian - A Night At The Opera", "id": 385920},
            {"title": "Marillion - Holidays In Eden", "id": 371003},
        ]
    });

    let spotify = extract_candidates(
        &spotify_response,
        route_for(Provider::Spotify, EntityKind::Album).unwrap(),
    );
    let discogs = extract_candidates(
        &discogs_response,
        route_for(Provider::Discogs, EntityKind::Album).unwrap(),
    );

    let merged = reconcile(&spotify, &discogs, MatchMode::Album);
    assert_eq!(merged.len(), 3);

    // Same album name, different artists: each primary entry picks up the
    // Discogs release whose composite-title artist matches.
    assert_eq!(merged[0].primary_id, "1GbtB4zTqAsyfZEsm1RZfx");
    assert_eq!(merged[0].secondary_id, "156437");
    assert_eq!(merged[1].primary_id, "3zgnzrvRrlpJuZVSHfEBL1");
    assert_eq!(merged[1].secondary_id, "385920");

    // Discogs-only release appends with the extracted album name.
    assert_eq!(merged[2].name, "Holidays In Eden");
    assert_eq!(merged[2].secondary_id, "371003");
    assert_eq!(merged[2].associated_names, vec!["Marillion".to_string()]);
}

#[test]
fn reconciliation_is_deterministic_across_runs() {
    let primary: Vec<Candidate> = (0..50)
        .map(|i| Candidate::new(format!("Artist {}", i % 20), format!("p{}", i)))
        .collect();
    let secondary: Vec<Candidate> = (0..50)
        .map(|i| Candidate::new(format!("artist {}", i % 30), format!("s{}", i)))
        .collect();

    let first = reconcile(&primary, &secondary, MatchMode::Simple);
    for _ in 0..5 {
        assert_eq!(reconcile(&primary, &secondary, MatchMode::Simple), first);
    }

    // 20 deduplicated primary names plus the 10 secondary-only ones.
    assert_eq!(first.len(), 30);
    let merged_count = first
        .iter()
        .filter(|e: &&ReconciledEntry| !e.primary_id.is_empty() && !e.secondary_id.is_empty())
        .count();
    assert_eq!(merged_count, 20);
}
