//! [`PosterFetcher`] -- memoized, timeout-bounded preview image fetch.
//!
//! One fetcher is created per dispatch and lives inside the shared
//! [`PrintContext`](crate::context::PrintContext). Channels call
//! [`get`](PosterFetcher::get) on demand; the first successful fetch is
//! cached for the fetcher's lifetime, failures are swallowed and retried
//! on the next access. Nothing is fetched before the context builder
//! primes the fetcher, and nothing is ever fetched for an empty URL.

use std::time::Duration;

use bytes::Bytes;
use reqwest::Client;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Lazily fetches and caches the preview image bytes for one dispatch.
///
/// The cache is guarded by a mutex held across the fetch, so concurrent
/// accessors within a dispatch serialize and at most one network request
/// runs at a time.
#[derive(Debug)]
pub struct PosterFetcher {
    url: String,
    timeout: Duration,
    primed: bool,
    cached: Mutex<Option<Bytes>>,
    http: Client,
}

impl PosterFetcher {
    /// Create an unprimed fetcher bound to `url`.
    ///
    /// Until [`prime`](PosterFetcher::prime) is called, every access
    /// yields `None` without performing I/O.
    pub fn new(url: &str, default_timeout: Duration) -> Self {
        Self {
            url: url.to_owned(),
            timeout: default_timeout,
            primed: false,
            cached: Mutex::new(None),
            http: Client::new(),
        }
    }

    /// Mark the fetcher ready for use, optionally overriding the default
    /// per-attempt timeout.
    ///
    /// The context builder always primes before handing the fetcher to a
    /// channel; priming is a distinct step so that constructing contexts
    /// can never trigger network I/O by itself.
    pub fn prime(&mut self, timeout_override: Option<Duration>) {
        if let Some(timeout) = timeout_override {
            self.timeout = timeout;
        }
        self.primed = true;
    }

    /// The URL this fetcher is bound to, may be empty.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch the poster bytes with the configured timeout.
    pub async fn get(&self) -> Option<Bytes> {
        self.get_with_timeout(self.timeout).await
    }

    /// Fetch the poster bytes, bounding this attempt by `timeout`.
    ///
    /// Returns the cached bytes when a previous attempt succeeded. A
    /// failed attempt leaves the cache empty so the next access retries.
    pub async fn get_with_timeout(&self, timeout: Duration) -> Option<Bytes> {
        if !self.primed || self.url.is_empty() {
            return None;
        }

        let mut cached = self.cached.lock().await;
        if let Some(content) = cached.as_ref() {
            return Some(content.clone());
        }

        match self.fetch(timeout).await {
            Ok(content) => {
                debug!(url = %self.url, bytes = content.len(), "poster fetched");
                *cached = Some(content.clone());
                Some(content)
            }
            Err(err) => {
                warn!(url = %self.url, error = %err, "poster fetch failed");
                None
            }
        }
    }

    async fn fetch(&self, timeout: Duration) -> Result<Bytes, reqwest::Error> {
        let resp = self
            .http
            .get(&self.url)
            .timeout(timeout)
            .send()
            .await?
            .error_for_status()?;
        resp.bytes().await
    }
}
