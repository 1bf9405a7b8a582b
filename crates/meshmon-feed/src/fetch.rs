// ── Cached multi-source fetch ──
//
// `StatusFeed` hands back the current fleet-status document while talking
// to the network as rarely as possible. A cache younger than the
// freshness interval short-circuits everything. Otherwise the candidate
// URLs are tried in order: a timeout moves on to the next source, any
// other failure is fatal. A body must be non-empty before it is allowed
// to replace the cache.

use std::path::PathBuf;
use std::time::Duration;

use tracing::{debug, warn};
use url::Url;

use crate::cache::CacheStore;
use crate::error::FeedError;

/// Freshness interval under which the cache short-circuits the network.
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(300);

/// Per-request network timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Cache file used when the caller does not configure one.
pub fn default_cache_path() -> PathBuf {
    std::env::temp_dir().join("check-mesh-node.json")
}

/// Explicit configuration for a [`StatusFeed`].
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Candidate source URLs, tried in order; the first success wins.
    pub sources: Vec<Url>,
    /// Path of the on-disk document cache.
    pub cache_path: PathBuf,
    /// Maximum cache age before a re-fetch is required.
    pub max_age: Duration,
    /// Per-request network timeout, covering connect and body read.
    pub timeout: Duration,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
            cache_path: default_cache_path(),
            max_age: DEFAULT_MAX_AGE,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Fetches fleet-status documents through the cache.
#[derive(Debug)]
pub struct StatusFeed {
    sources: Vec<Url>,
    cache: CacheStore,
    max_age: Duration,
    http: reqwest::Client,
}

impl StatusFeed {
    /// Build a feed from its configuration.
    pub fn new(config: FeedConfig) -> Result<Self, FeedError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("check-mesh-node/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(FeedError::Client)?;
        Ok(Self {
            sources: config.sources,
            cache: CacheStore::new(config.cache_path),
            max_age: config.max_age,
            http,
        })
    }

    /// Current document bytes: the cached copy while it is younger than
    /// the freshness interval, otherwise a fresh network fetch.
    pub async fn fetch(&self) -> Result<Vec<u8>, FeedError> {
        if let Some(cached) = self.cache.get().map_err(|e| self.cache_error(e))? {
            if cached.age < self.max_age {
                debug!(age_secs = cached.age.as_secs(), "serving cached document");
                return Ok(cached.bytes);
            }
            debug!(age_secs = cached.age.as_secs(), "cache is stale");
        }
        self.refresh().await
    }

    /// One pass over the candidate sources. The winning body replaces the
    /// cache only after the non-empty check, so the previous document
    /// survives every failure mode.
    async fn refresh(&self) -> Result<Vec<u8>, FeedError> {
        if self.sources.is_empty() {
            return Err(FeedError::NoSources);
        }
        for url in &self.sources {
            debug!(%url, "fetching fleet status");
            match self.download(url).await {
                Ok(bytes) => {
                    if bytes.is_empty() {
                        return Err(FeedError::EmptyDocument { url: url.clone() });
                    }
                    self.cache.put(&bytes).map_err(|e| self.cache_error(e))?;
                    return Ok(bytes);
                }
                Err(err) if err.is_timeout() => {
                    warn!(%url, "source timed out, trying next");
                }
                Err(err) => return Err(err),
            }
        }
        Err(FeedError::AllSourcesTimedOut {
            attempts: self.sources.len(),
        })
    }

    async fn download(&self, url: &Url) -> Result<Vec<u8>, FeedError> {
        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|e| FeedError::from_reqwest(url, e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status {
                url: url.clone(),
                status: status.as_u16(),
            });
        }
        let body = response
            .bytes()
            .await
            .map_err(|e| FeedError::from_reqwest(url, e))?;
        Ok(body.to_vec())
    }

    fn cache_error(&self, source: std::io::Error) -> FeedError {
        FeedError::Cache {
            path: self.cache.path().to_path_buf(),
            source,
        }
    }
}
