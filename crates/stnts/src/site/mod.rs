//! Site configuration model.
//!
//! A [`Site`] is loaded once at startup from a JSON document and never
//! mutated afterwards. It is the single payload every page render reads.
//!
//! ```json
//! {
//!   "conf": {"title": "...", "blurb": "...", "footer": "...", "timezone": "Europe/London"},
//!   "icons": [{"name": "...", "addr": "https://...", "icon": "..."}],
//!   "lists": [{"name": "...", "links": [{"name": "...", "addr": "https://..."}]}]
//! }
//! ```

mod conf;
mod link;
mod list;

use std::collections::BTreeSet;
use std::path::Path;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub use conf::{Conf, Zone};
pub use link::Link;
pub use list::List;

/// A complete container of configuration and content data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Site {
    pub conf: Conf,

    /// Top-level quick icons.
    #[serde(default)]
    pub icons: Vec<Link>,

    #[serde(default)]
    pub lists: Vec<List>,
}

impl Site {
    /// Create a new Site.
    pub fn new(conf: Conf, icons: Vec<Link>, lists: Vec<List>) -> Self {
        Self { conf, icons, lists }
    }

    /// Load a Site from a JSON file.
    ///
    /// A missing file, a schema mismatch or an unknown time zone is an
    /// error. Malformed link addresses are only logged: they affect that
    /// link's derived fields, not the whole site.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        let bytes = std::fs::read(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let site: Site = serde_json::from_slice(&bytes).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        site.conf.zone()?;

        for link in site.links() {
            if let Err(err) = link.host() {
                tracing::warn!(name = %link.name, error = %err, "link address has no usable host");
            }
        }

        tracing::info!(
            path = %path.display(),
            icons = site.icons.len(),
            lists = site.lists.len(),
            timezone = %site.conf.timezone,
            "site configuration loaded"
        );

        Ok(site)
    }

    /// The current time in the configured time zone.
    pub fn now(&self) -> DateTime<FixedOffset> {
        self.conf.location().now()
    }

    /// Every link on the site: icons first, then each list in order.
    pub fn links(&self) -> impl Iterator<Item = &Link> {
        self.icons
            .iter()
            .chain(self.lists.iter().flat_map(|list| list.links.iter()))
    }

    /// The distinct hostnames of every link with a parseable address.
    pub fn hosts(&self) -> BTreeSet<String> {
        self.links().filter_map(|link| link.host().ok()).collect()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn mock_site() -> Site {
        let conf = Conf::new("Name", "Desc", "", "Asia/Tokyo");
        let icons = vec![Link::new("Mail", "https://mail.example.com").with_icon("✉")];
        let lists = vec![List::new(
            "Name",
            vec![
                Link::new("Example", "https://example.com/a"),
                Link::new("Broken", "nope"),
                Link::new("Again", "https://example.com/b"),
            ],
        )];
        Site::new(conf, icons, lists)
    }

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn site_new() {
        let site = mock_site();
        assert_eq!(site.conf.title, "Name");
        assert_eq!(site.icons.len(), 1);
        assert_eq!(site.lists.len(), 1);
    }

    #[test]
    fn site_now_uses_configured_zone() {
        let now = mock_site().now();
        assert_eq!(now.offset().local_minus_utc(), 9 * 3600);
    }

    #[test]
    fn site_links_in_display_order() {
        let site = mock_site();
        let names: Vec<_> = site.links().map(|l| l.name.as_str()).collect();
        assert_eq!(names, ["Mail", "Example", "Broken", "Again"]);
    }

    #[test]
    fn site_hosts_are_distinct_and_skip_malformed() {
        let hosts: Vec<_> = mock_site().hosts().into_iter().collect();
        assert_eq!(hosts, ["example.com", "mail.example.com"]);
    }

    #[test]
    fn site_load() {
        let file = write_temp(
            r#"{
                "conf": {"title": "Home", "blurb": "hi", "footer": "<i>x</i>", "timezone": "UTC"},
                "icons": [{"name": "Mail", "addr": "https://mail.example.com", "icon": "✉"}],
                "lists": [{"name": "Dev", "links": [{"name": "Docs", "addr": "https://docs.rs", "icon": ""}]}]
            }"#,
        );

        let site = Site::load(file.path()).unwrap();
        assert_eq!(site.conf.title, "Home");
        assert_eq!(site.conf.footer, "<i>x</i>");
        assert_eq!(site.icons[0].icon_hint(), Some("✉"));
        assert_eq!(site.lists[0].name, "Dev");
        assert_eq!(site.lists[0].links[0].icon_hint(), None);
    }

    #[test]
    fn site_load_empty_sections() {
        let file = write_temp(r#"{"conf": {"title": "Bare"}}"#);
        let site = Site::load(file.path()).unwrap();
        assert!(site.icons.is_empty());
        assert!(site.lists.is_empty());
        assert_eq!(site.conf.timezone, "");
    }

    #[test]
    fn site_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Site::load(dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn site_load_schema_mismatch() {
        let file = write_temp(r#"{"conf": {"title": "x"}, "lists": {"not": "an array"}}"#);
        let err = Site::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn site_load_missing_conf() {
        let file = write_temp(r#"{"icons": []}"#);
        let err = Site::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn site_load_unknown_timezone() {
        let file = write_temp(r#"{"conf": {"timezone": "Atlantis/Capital"}}"#);
        let err = Site::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::TimeZone(_)));
    }

    #[test]
    fn site_load_tolerates_malformed_address() {
        let file = write_temp(
            r#"{"conf": {}, "icons": [{"name": "Bad", "addr": "not a url"}]}"#,
        );
        let site = Site::load(file.path()).unwrap();
        assert!(site.icons[0].host().is_err());
    }
}
