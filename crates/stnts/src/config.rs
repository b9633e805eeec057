//! Server configuration loaded from environment variables.
//!
//! This is how the server runs, not what it shows: the page content lives
//! in the site JSON file named by `site_path` (see [`crate::site`]).

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;

use crate::icon::{DEFAULT_CANDIDATES, DEFAULT_RETRY_AFTER};

/// Default per-candidate icon fetch timeout.
const DEFAULT_ICON_TIMEOUT: Duration = Duration::from_millis(1000);

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (e.g., "localhost:8000").
    pub bind_addr: String,

    /// Path of the site JSON file.
    pub site_path: PathBuf,

    /// Timeout for each icon candidate request.
    pub icon_timeout: Duration,

    /// How long a host whose icon could not be found stays failed.
    pub icon_retry_after: Duration,

    /// Icon candidate paths in probe order.
    pub icon_candidates: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Optional:
    /// - `STNTS_ADDR`: Server bind address (default: "localhost:8000")
    /// - `STNTS_CONF`: Site JSON file (default: "stnts.json")
    /// - `STNTS_ICON_TIMEOUT_MS`: Per-candidate fetch timeout (default: 1000)
    /// - `STNTS_ICON_RETRY_SECS`: Failed host retry window (default: 600)
    /// - `STNTS_ICON_PATHS`: Comma-separated candidate paths (default: the
    ///   apple-touch-icon, favicon.png, favicon.svg, favicon.ico list)
    pub fn from_env() -> anyhow::Result<Self> {
        let bind_addr =
            std::env::var("STNTS_ADDR").unwrap_or_else(|_| "localhost:8000".to_string());

        let site_path = std::env::var("STNTS_CONF")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("stnts.json"));

        let icon_timeout = env_u64("STNTS_ICON_TIMEOUT_MS")?
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_ICON_TIMEOUT);

        let icon_retry_after = env_u64("STNTS_ICON_RETRY_SECS")?
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_RETRY_AFTER);

        let icon_candidates =
            parse_candidates(&std::env::var("STNTS_ICON_PATHS").unwrap_or_default());

        tracing::info!(
            bind_addr = %bind_addr,
            site_path = %site_path.display(),
            icon_timeout_ms = icon_timeout.as_millis() as u64,
            icon_retry_secs = icon_retry_after.as_secs(),
            icon_candidates = icon_candidates.len(),
            "server configuration loaded"
        );

        Ok(Self {
            bind_addr,
            site_path,
            icon_timeout,
            icon_retry_after,
            icon_candidates,
        })
    }
}

/// Read an optional unsigned integer variable.
fn env_u64(key: &str) -> anyhow::Result<Option<u64>> {
    match std::env::var(key) {
        Ok(value) if !value.trim().is_empty() => value
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("{key} must be a whole number, got {value:?}")),
        _ => Ok(None),
    }
}

/// Split a comma-separated candidate list, falling back to the defaults
/// when nothing usable is left.
fn parse_candidates(raw: &str) -> Vec<String> {
    let candidates: Vec<String> = raw
        .split(',')
        .map(|s| s.trim().trim_start_matches('/'))
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    if candidates.is_empty() {
        DEFAULT_CANDIDATES.iter().map(|c| c.to_string()).collect()
    } else {
        candidates
    }
}
