//! Site-wide display settings and the configured time zone.

use chrono::{DateTime, FixedOffset, Local, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Site-wide display settings, the `conf` object of the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Conf {
    /// Page title.
    pub title: String,

    /// Short line of text shown under the title.
    pub blurb: String,

    /// Footer markup. Trusted HTML, rendered without escaping.
    pub footer: String,

    /// IANA time zone name, `"Local"`, or empty for UTC.
    pub timezone: String,
}

impl Conf {
    /// Create a new Conf.
    pub fn new(
        title: impl Into<String>,
        blurb: impl Into<String>,
        footer: impl Into<String>,
        timezone: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            blurb: blurb.into(),
            footer: footer.into(),
            timezone: timezone.into(),
        }
    }

    /// Parse the configured time zone, failing on unknown names.
    pub fn zone(&self) -> Result<Zone, ConfigError> {
        Zone::parse(&self.timezone)
    }

    /// The configured time zone, or UTC if it does not resolve.
    pub fn location(&self) -> Zone {
        self.zone().unwrap_or_else(|err| {
            tracing::warn!(error = %err, "falling back to UTC");
            Zone::Utc
        })
    }
}

/// A resolved time zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    Utc,
    /// The host system's local time.
    Local,
    Named(Tz),
}

impl Zone {
    /// Resolve a zone name. Empty and `"UTC"` mean UTC, `"Local"` means the
    /// system zone, anything else must be an IANA name.
    pub fn parse(name: &str) -> Result<Self, ConfigError> {
        match name.trim() {
            "" | "UTC" => Ok(Self::Utc),
            "Local" => Ok(Self::Local),
            other => other
                .parse::<Tz>()
                .map(Self::Named)
                .map_err(|_| ConfigError::TimeZone(name.to_string())),
        }
    }

    /// Convert an instant into this zone.
    pub fn convert(&self, instant: DateTime<Utc>) -> DateTime<FixedOffset> {
        match self {
            Self::Utc => instant.fixed_offset(),
            Self::Local => instant.with_timezone(&Local).fixed_offset(),
            Self::Named(tz) => instant.with_timezone(tz).fixed_offset(),
        }
    }

    /// The current instant in this zone. Never cached.
    pub fn now(&self) -> DateTime<FixedOffset> {
        self.convert(Utc::now())
    }
}
