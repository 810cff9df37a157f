//! music-db - Music Metadata Search Service
//!
//! Searches Spotify and Discogs for artists, albums, and songs, reconciles
//! the two result lists into one deduplicated list, and serves detail
//! lookups used to pre-fill content records from a selected entry.

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use music_db::config::AppConfig;
use music_db::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting music-db (Music Metadata Search)");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::load()?;

    let state = AppState::new(&config)?;
    let app = music_db::build_router(state);

    let addr = format!("{}:{}", config.listen_host, config.listen_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
