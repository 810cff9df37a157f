//! Configuration resolution for music-db
//!
//! Two-tier resolution with ENV → TOML priority: `MUSIC_DB_*` environment
//! variables override values from the TOML config file, which overrides
//! compiled defaults. The config file lives at
//! `~/.config/music-db/config.toml` unless `MUSIC_DB_CONFIG` points
//! somewhere else.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{info, warn};

/// Default listen address
pub const DEFAULT_HOST: &str = "127.0.0.1";
/// Default listen port
pub const DEFAULT_PORT: u16 = 5730;
/// Default per-provider search result cap
pub const DEFAULT_MAX_HITS: u32 = 20;
/// Default Spotify Web API base URL
pub const DEFAULT_SPOTIFY_API_URI: &str = "https://api.spotify.com/v1";
/// Default Discogs API base URL
pub const DEFAULT_DISCOGS_API_URI: &str = "https://api.discogs.com";

/// On-disk configuration (all fields optional)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TomlConfig {
    pub listen_host: Option<String>,
    pub listen_port: Option<u16>,
    pub max_hits: Option<u32>,
    pub spotify_client_id: Option<String>,
    pub spotify_client_secret: Option<String>,
    pub spotify_api_uri: Option<String>,
    pub discogs_token: Option<String>,
    pub discogs_api_uri: Option<String>,
}

/// Resolved application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub listen_host: String,
    pub listen_port: u16,
    /// Per-provider search result cap
    pub max_hits: u32,
    pub spotify_client_id: String,
    pub spotify_client_secret: String,
    pub spotify_api_uri: String,
    /// Discogs personal access token. Optional: unauthenticated requests
    /// work with tighter rate limits.
    pub discogs_token: Option<String>,
    pub discogs_api_uri: String,
}

impl AppConfig {
    /// Load configuration with ENV → TOML → default priority.
    ///
    /// # Errors
    /// Returns `Error::Config` when the TOML file is unreadable/unparsable
    /// or when Spotify credentials are missing from every tier.
    pub fn load() -> Result<Self> {
        let toml_config = load_toml_config()?;
        Self::resolve(toml_config)
    }

    fn resolve(toml_config: TomlConfig) -> Result<Self> {
        let spotify_client_id =
            resolve_value("MUSIC_DB_SPOTIFY_CLIENT_ID", toml_config.spotify_client_id);
        let spotify_client_secret = resolve_value(
            "MUSIC_DB_SPOTIFY_CLIENT_SECRET",
            toml_config.spotify_client_secret,
        );

        let (spotify_client_id, spotify_client_secret) =
            match (spotify_client_id, spotify_client_secret) {
                (Some(id), Some(secret)) => (id, secret),
                _ => {
                    return Err(Error::Config(
                        "Spotify credentials not configured. Please configure using one of:\n\
                         1. Environment: MUSIC_DB_SPOTIFY_CLIENT_ID / MUSIC_DB_SPOTIFY_CLIENT_SECRET\n\
                         2. TOML config: ~/.config/music-db/config.toml\n\
                            (spotify_client_id = \"...\", spotify_client_secret = \"...\")\n\
                         \n\
                         Obtain credentials at: https://developer.spotify.com/dashboard"
                            .to_string(),
                    ))
                }
            };

        let discogs_token = resolve_value("MUSIC_DB_DISCOGS_TOKEN", toml_config.discogs_token);
        if discogs_token.is_none() {
            warn!("Discogs token not configured; requests will be unauthenticated");
        }

        let listen_port = match std::env::var("MUSIC_DB_LISTEN_PORT") {
            Ok(raw) => Some(raw.parse::<u16>().map_err(|_| {
                Error::Config(format!("Invalid MUSIC_DB_LISTEN_PORT value: {}", raw))
            })?),
            Err(_) => toml_config.listen_port,
        };

        let max_hits = match std::env::var("MUSIC_DB_MAX_HITS") {
            Ok(raw) => Some(raw.parse::<u32>().map_err(|_| {
                Error::Config(format!("Invalid MUSIC_DB_MAX_HITS value: {}", raw))
            })?),
            Err(_) => toml_config.max_hits,
        };

        Ok(Self {
            listen_host: resolve_value("MUSIC_DB_LISTEN_HOST", toml_config.listen_host)
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            listen_port: listen_port.unwrap_or(DEFAULT_PORT),
            max_hits: max_hits.unwrap_or(DEFAULT_MAX_HITS),
            spotify_client_id,
            spotify_client_secret,
            spotify_api_uri: resolve_value("MUSIC_DB_SPOTIFY_API_URI", toml_config.spotify_api_uri)
                .unwrap_or_else(|| DEFAULT_SPOTIFY_API_URI.to_string()),
            discogs_token,
            discogs_api_uri: resolve_value("MUSIC_DB_DISCOGS_API_URI", toml_config.discogs_api_uri)
                .unwrap_or_else(|| DEFAULT_DISCOGS_API_URI.to_string()),
        })
    }
}

/// ENV over TOML, discarding empty/whitespace values in both tiers
fn resolve_value(env_var: &str, toml_value: Option<String>) -> Option<String> {
    if let Ok(value) = std::env::var(env_var) {
        if is_valid_value(&value) {
            return Some(value);
        }
    }
    toml_value.filter(|v| is_valid_value(v))
}

/// Validate a config value (non-empty, non-whitespace)
pub fn is_valid_value(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Path of the TOML config file: `MUSIC_DB_CONFIG` override, else the
/// platform config directory.
pub fn config_file_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("MUSIC_DB_CONFIG") {
        return Some(PathBuf::from(path));
    }
    dirs::config_dir().map(|d| d.join("music-db").join("config.toml"))
}

fn load_toml_config() -> Result<TomlConfig> {
    let Some(path) = config_file_path() else {
        return Ok(TomlConfig::default());
    };
    if !path.exists() {
        return Ok(TomlConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    let config = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))?;

    info!("Configuration loaded from {}", path.display());
    Ok(config)
}
