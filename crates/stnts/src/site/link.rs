//! A single named web address.

use std::fmt;

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use url::{Host, Url};

use crate::error::ParseError;

/// A single named web address with an optional icon hint.
///
/// Only `name`, `addr` and `icon` are stored. Serializing a Link also emits
/// the derived `host` and `root`, left blank when the address does not parse,
/// so templates can use them without calling back into Rust.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Link {
    pub name: String,
    pub addr: String,
    #[serde(default)]
    pub icon: Option<String>,
}

impl Link {
    /// Create a new Link without an icon hint.
    pub fn new(name: impl Into<String>, addr: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            addr: addr.into(),
            icon: None,
        }
    }

    /// Set the icon hint.
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// The icon hint, if one is set and not blank.
    pub fn icon_hint(&self) -> Option<&str> {
        self.icon.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    /// The address as a parsed URL.
    pub fn url(&self) -> Result<Url, ParseError> {
        Url::parse(&self.addr).map_err(|source| ParseError::Url {
            addr: self.addr.clone(),
            source,
        })
    }

    /// The address's hostname, without port or IPv6 brackets.
    pub fn host(&self) -> Result<String, ParseError> {
        let url = self.url()?;
        match url.host() {
            Some(Host::Domain(domain)) => Ok(domain.to_string()),
            Some(Host::Ipv4(ip)) => Ok(ip.to_string()),
            Some(Host::Ipv6(ip)) => Ok(ip.to_string()),
            None => Err(ParseError::MissingHost(self.addr.clone())),
        }
    }

    /// The address's scheme and host, e.g. `https://example.com`.
    pub fn root(&self) -> Result<String, ParseError> {
        let url = self.url()?;
        let host = url
            .host_str()
            .ok_or_else(|| ParseError::MissingHost(self.addr.clone()))?;
        Ok(format!("{}://{host}", url.scheme()))
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.addr)
    }
}

impl Serialize for Link {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Link", 5)?;
        state.serialize_field("name", &self.name)?;
        state.serialize_field("addr", &self.addr)?;
        state.serialize_field("icon", &self.icon_hint())?;
        state.serialize_field("host", &self.host().unwrap_or_default())?;
        state.serialize_field("root", &self.root().unwrap_or_default())?;
        state.end()
    }
}
