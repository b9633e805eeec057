//! Application state shared across all request handlers.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::assets::BundledAssets;
use crate::config::Config;
use crate::icon::{Fetch, HttpFetcher, IconResolver};
use crate::site::Site;
use crate::template::{AssetSource, TemplateCache};

/// Shared application state available to all request handlers.
///
/// Built once in `main` and cloned into every handler; the caches inside
/// live as long as the process. The [`Config`] is consumed here: only the
/// icon settings outlive startup, inside the resolver.
#[derive(Clone)]
pub struct AppState {
    /// The loaded site. Never mutated after startup.
    pub site: Arc<Site>,

    /// Hostnames the icon route is allowed to probe.
    pub hosts: Arc<BTreeSet<String>>,

    /// Compiled template cache.
    pub templates: Arc<TemplateCache>,

    /// Favicon cache.
    pub icons: Arc<IconResolver>,
}

impl AppState {
    /// Create the production state: bundled templates and a reqwest fetcher.
    pub fn new(config: Config, site: Site) -> anyhow::Result<Self> {
        let fetcher = HttpFetcher::new(config.icon_timeout)?;
        Ok(Self::with_parts(config, site, BundledAssets, fetcher))
    }

    /// Create a state from explicit template source and icon fetcher.
    pub fn with_parts(
        config: Config,
        site: Site,
        assets: impl AssetSource + 'static,
        fetcher: impl Fetch + 'static,
    ) -> Self {
        let icons = IconResolver::new(
            fetcher,
            config.icon_candidates,
            config.icon_retry_after,
        );
        let hosts = site.hosts();

        tracing::info!(hosts = hosts.len(), "application state initialized");

        Self {
            site: Arc::new(site),
            hosts: Arc::new(hosts),
            templates: Arc::new(TemplateCache::new(assets)),
            icons: Arc::new(icons),
        }
    }
}
