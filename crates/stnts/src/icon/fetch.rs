//! Outbound HTTP for icon candidates.

use std::time::Duration;

use bytes::Bytes;
use futures::future::BoxFuture;

use crate::error::FetchError;

/// Largest icon body accepted.
pub const MAX_ICON_BYTES: usize = 5_000_000;

/// A single outbound GET. The resolver's only contact with the network.
pub trait Fetch: Send + Sync {
    /// Fetch `url`, succeeding only on a 2xx status.
    fn fetch<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<Bytes, FetchError>>;
}

/// reqwest-backed [`Fetch`] with a per-request timeout.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Build a fetcher whose requests time out after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .user_agent(concat!("stnts/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client })
    }
}

impl Fetch for HttpFetcher {
    fn fetch<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<Bytes, FetchError>> {
        Box::pin(async move {
            let resp = self.client.get(url).send().await?;

            if !resp.status().is_success() {
                return Err(FetchError::Status(resp.status().as_u16()));
            }

            if let Some(len) = resp.content_length() {
                if len > MAX_ICON_BYTES as u64 {
                    return Err(FetchError::TooLarge(len as usize));
                }
            }

            Ok(resp.bytes().await?)
        })
    }
}
