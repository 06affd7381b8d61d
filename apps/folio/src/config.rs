use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::graffiti::scene::DEFAULT_COLOR;

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub resume_path: PathBuf,
    pub assets_dir: PathBuf,
    /// Enables the TCP peer transport when set.
    pub peer_listen_addr: Option<SocketAddr>,
    /// How long a TCP peer may take to send its hello line.
    pub peer_handshake_timeout: Duration,
    /// Peers dialled once at startup.
    pub peer_connect: Vec<String>,
    pub graffiti_color: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            resume_path: env_or("RESUME_PATH", "data/resume.json").into(),
            assets_dir: env_or("ASSETS_DIR", "public").into(),
            peer_listen_addr: optional_env("PEER_LISTEN_ADDR")
                .map(|v| v.parse::<SocketAddr>())
                .transpose()
                .context("PEER_LISTEN_ADDR must be a socket address like 0.0.0.0:9000")?,
            peer_handshake_timeout: Duration::from_secs(
                env_or("PEER_HANDSHAKE_TIMEOUT_SECS", "5")
                    .parse::<u64>()
                    .context("PEER_HANDSHAKE_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            peer_connect: parse_peer_list(&optional_env("PEER_CONNECT").unwrap_or_default()),
            graffiti_color: env_or("GRAFFITI_COLOR", DEFAULT_COLOR),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    optional_env(key).unwrap_or_else(|| default.to_string())
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Comma-separated peer addresses; blanks are skipped.
pub fn parse_peer_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
