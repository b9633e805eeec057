//! A named, ordered group of links.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Link;

/// A single ordered list of Links, displayed in file order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct List {
    pub name: String,
    #[serde(default)]
    pub links: Vec<Link>,
}

impl List {
    /// Create a new List.
    pub fn new(name: impl Into<String>, links: Vec<Link>) -> Self {
        Self {
            name: name.into(),
            links,
        }
    }
}

impl fmt::Display for List {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
