//! Template fragments compiled into the binary.

use std::borrow::Cow;

use crate::template::AssetSource;

/// Shared page layout.
pub const BASE_HTML: &str = "html/_base.html";

/// The new tab page.
pub const INDEX_HTML: &str = "html/index.html";

const FRAGMENTS: &[(&str, &str)] = &[
    (BASE_HTML, include_str!("../assets/html/_base.html")),
    (INDEX_HTML, include_str!("../assets/html/index.html")),
];

/// The read-only set of bundled template fragments.
#[derive(Debug, Clone, Copy, Default)]
pub struct BundledAssets;

impl BundledAssets {
    /// Names of every bundled fragment.
    pub fn names() -> impl Iterator<Item = &'static str> {
        FRAGMENTS.iter().map(|(name, _)| *name)
    }
}

impl AssetSource for BundledAssets {
    fn read(&self, name: &str) -> Option<Cow<'static, str>> {
        FRAGMENTS
            .iter()
            .find(|(known, _)| *known == name)
            .map(|(_, body)| Cow::Borrowed(*body))
    }
}
