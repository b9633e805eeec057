//! Favicon resolution with per-host caching.
//!
//! For a cold host the resolver probes an ordered list of candidate paths
//! (`https://{host}/{candidate}`) one at a time and stops at the first that
//! returns a non-empty image. Per host the states are:
//!
//! ```text
//! Unresolved -> Resolving -> Resolved(icon)   cached for the process lifetime
//!                         -> Failed           cached for the retry window
//! ```
//!
//! Concurrent lookups of the same cold host share one probe through moka's
//! `try_get_with`. A Failed host answers fast 404s until its sentinel
//! expires, after which the next lookup probes again.
//!
//! Probes always go to `https://{host}/` on the default port. The key is the
//! bare hostname, so links served over plain http or on another port (LAN
//! routers, `:8443` services) share the host's https icon or end up Failed.

mod fetch;
mod sniff;

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use moka::future::Cache;
use url::Host;

use crate::error::{FetchError, IconError};

pub use fetch::{Fetch, HttpFetcher, MAX_ICON_BYTES};
pub use sniff::sniff_image;

/// Candidate paths in priority order.
pub const DEFAULT_CANDIDATES: &[&str] = &[
    "apple-touch-icon.png",
    "apple-touch-icon-180x180.png",
    "favicon.png",
    "favicon.svg",
    "favicon.ico",
];

/// Default time a failed host stays failed.
pub const DEFAULT_RETRY_AFTER: Duration = Duration::from_secs(600);

/// A resolved favicon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Icon {
    pub bytes: Bytes,
    /// MIME type sniffed from `bytes`.
    pub content_type: &'static str,
    /// The candidate URL that produced this icon.
    pub source: String,
}

/// Resolves and caches favicons per hostname.
pub struct IconResolver {
    fetcher: Arc<dyn Fetch>,
    candidates: Vec<String>,
    retry_after: Duration,
    resolved: Cache<String, Icon>,
    failed: Cache<String, ()>,
}

impl IconResolver {
    /// Create a resolver probing `candidates` in order, remembering failed
    /// hosts for `retry_after`.
    pub fn new(
        fetcher: impl Fetch + 'static,
        candidates: Vec<String>,
        retry_after: Duration,
    ) -> Self {
        let resolved = Cache::builder().build();
        let failed = Cache::builder().time_to_live(retry_after).build();

        tracing::info!(
            candidates = ?candidates,
            retry_secs = retry_after.as_secs(),
            "icon resolver initialized"
        );

        Self {
            fetcher: Arc::new(fetcher),
            candidates,
            retry_after,
            resolved,
            failed,
        }
    }

    /// Candidate paths in probe order.
    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    /// Return the icon for `host`, probing candidates on a cache miss.
    pub async fn resolve(&self, host: &str) -> Result<Icon, IconError> {
        let host = parse_host(host)?;
        let key = host_key(&host);

        if let Some(icon) = self.resolved.get(&key).await {
            tracing::debug!(host = %key, "icon cache hit");
            return Ok(icon);
        }

        if self.failed.get(&key).await.is_some() {
            tracing::debug!(host = %key, "icon host known to fail");
            return Err(IconError::NotFound(key));
        }

        tracing::debug!(host = %key, "icon cache miss, probing");
        self.resolved
            .try_get_with(key.clone(), self.probe(&host, &key))
            .await
            .map_err(|err| (*err).clone())
    }

    /// Try each candidate in order, stopping at the first success.
    async fn probe(&self, host: &Host, key: &str) -> Result<Icon, IconError> {
        // A probe that just finished may have marked the host after our
        // caller checked.
        if self.failed.get(key).await.is_some() {
            return Err(IconError::NotFound(key.to_string()));
        }

        for candidate in &self.candidates {
            let url = format!("https://{host}/{}", candidate.trim_start_matches('/'));

            match self.try_candidate(&url).await {
                Ok(icon) => {
                    tracing::info!(
                        host = %key,
                        url = %url,
                        content_type = icon.content_type,
                        size = icon.bytes.len(),
                        "icon resolved"
                    );
                    return Ok(icon);
                }
                Err(err) => {
                    tracing::debug!(url = %url, error = %err, "icon candidate failed");
                }
            }
        }

        self.failed.insert(key.to_string(), ()).await;
        tracing::warn!(
            host = %key,
            candidates = self.candidates.len(),
            retry_secs = self.retry_after.as_secs(),
            "no icon found, host marked failed"
        );

        Err(IconError::NotFound(key.to_string()))
    }

    async fn try_candidate(&self, url: &str) -> Result<Icon, FetchError> {
        let bytes = self.fetcher.fetch(url).await?;

        if bytes.is_empty() {
            return Err(FetchError::Empty);
        }
        if bytes.len() > MAX_ICON_BYTES {
            return Err(FetchError::TooLarge(bytes.len()));
        }

        let content_type = sniff_image(&bytes).ok_or(FetchError::NotImage)?;

        Ok(Icon {
            bytes,
            content_type,
            source: url.to_string(),
        })
    }
}

/// Validate and normalize a bare hostname, IPv4 or IPv6 address.
///
/// Ports, paths, credentials and anything else that is not a host are
/// rejected.
pub fn normalize_host(host: &str) -> Result<String, IconError> {
    parse_host(host).map(|host| host_key(&host))
}

fn parse_host(input: &str) -> Result<Host, IconError> {
    let trimmed = input.trim();
    let invalid = || IconError::InvalidHost(input.to_string());

    if trimmed.is_empty() {
        return Err(invalid());
    }

    // Bare IPv6 addresses arrive without brackets.
    let parsed = if trimmed.contains(':') && !trimmed.starts_with('[') {
        Host::parse(&format!("[{trimmed}]"))
    } else {
        Host::parse(trimmed)
    };

    parsed.map_err(|_| invalid())
}

/// Cache key for a host: domains as normalized, addresses without brackets.
fn host_key(host: &Host) -> String {
    match host {
        Host::Domain(domain) => domain.clone(),
        Host::Ipv4(ip) => ip.to_string(),
        Host::Ipv6(ip) => ip.to_string(),
    }
}
