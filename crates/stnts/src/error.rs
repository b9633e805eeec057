//! Error types for the new tab server.
//!
//! The library layers return small `thiserror` enums. Handlers return
//! [`AppError`], which maps every failure onto a status code and a generic
//! plain-text body. Causes, keys and file paths are logged, never sent.

use std::path::PathBuf;

use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};

/// The site configuration could not be loaded. Fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("cannot read file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid JSON or does not match the schema.
    #[error("cannot parse file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The configured time zone is not a known IANA name.
    #[error("unknown time zone {0:?}")]
    TimeZone(String),
}

/// A link address could not be turned into a URL, hostname or root.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("invalid address {addr:?}: {source}")]
    Url {
        addr: String,
        #[source]
        source: url::ParseError,
    },

    #[error("address {0:?} has no host")]
    MissingHost(String),
}

/// A template unit could not be built from its fragments.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error("no fragments given")]
    Empty,

    /// A fragment name contains the cache key separator.
    #[error("fragment name {0:?} contains the key separator")]
    InvalidName(String),

    /// The asset source has no fragment with this name.
    #[error("fragment {0:?} not found")]
    MissingFragment(String),

    /// The fragments were found but tera rejected them.
    #[error("cannot parse template {key:?}: {source}")]
    Template {
        key: String,
        #[source]
        source: tera::Error,
    },
}

/// A compiled template failed while executing against a pipeline value.
#[derive(Debug, thiserror::Error)]
#[error("cannot render template {entry:?}: {source}")]
pub struct RenderError {
    /// Name of the fragment that was being rendered.
    pub entry: String,
    #[source]
    pub source: tera::Error,
}

/// A single icon candidate failed. Never leaves the icon module on its own.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("unexpected status {0}")]
    Status(u16),

    #[error("empty body")]
    Empty,

    #[error("body too large ({0} bytes)")]
    TooLarge(usize),

    #[error("body is not an image")]
    NotImage,
}

/// Icon resolution failed for a host.
#[derive(Debug, Clone, thiserror::Error)]
pub enum IconError {
    /// The requested host is not a bare hostname.
    #[error("invalid hostname {0:?}")]
    InvalidHost(String),

    /// Every candidate failed, now or within the retry window.
    #[error("no icon found for {0:?}")]
    NotFound(String),
}

/// Error type returned by HTTP handlers.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Icon(#[from] IconError),
}

impl AppError {
    /// Status code and the generic message shown to the client.
    fn status_and_text(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "not found"),
            Self::Compile(_) | Self::Render(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "template error")
            }
            Self::Icon(IconError::InvalidHost(_)) => (StatusCode::BAD_REQUEST, "invalid hostname"),
            Self::Icon(IconError::NotFound(_)) => (StatusCode::NOT_FOUND, "icon not found"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, text) = self.status_and_text();

        match &self {
            Self::Compile(err) => tracing::error!(error = ?err, "template compile error"),
            Self::Render(err) => tracing::error!(error = ?err, "template render error"),
            Self::NotFound(path) => tracing::debug!(path = %path, "no route"),
            Self::Icon(err) => tracing::debug!(error = %err, "icon request failed"),
        }

        let body = format!("error {}: {text}", status.as_u16());
        let headers = [(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/plain; charset=utf-8"),
        )];

        (status, headers, body).into_response()
    }
}
