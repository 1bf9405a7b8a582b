use std::path::PathBuf;

use thiserror::Error;
use url::Url;

/// Top-level error type for the `meshmon-feed` crate.
///
/// Covers every failure mode between "check invoked" and "document bytes
/// in hand": configuration, transport, and the cache file. The check
/// binary maps all of these onto the UNKNOWN service state.
#[derive(Debug, Error)]
pub enum FeedError {
    // ── Configuration ───────────────────────────────────────────────
    /// No candidate source URLs were configured.
    #[error("no status feed sources configured")]
    NoSources,

    /// Building the HTTP client failed (TLS backend initialization).
    #[error("building HTTP client failed: {0}")]
    Client(#[source] reqwest::Error),

    // ── Transport ───────────────────────────────────────────────────
    /// A source did not answer within the per-request timeout. The
    /// fetcher moves on to the next candidate instead of failing.
    #[error("{url} timed out")]
    Timeout { url: Url },

    /// Hard network failure (DNS, connection refused, TLS handshake).
    #[error("fetching {url} failed: {source}")]
    Http {
        url: Url,
        #[source]
        source: reqwest::Error,
    },

    /// The source answered with a non-success status code.
    #[error("{url} returned HTTP {status}")]
    Status { url: Url, status: u16 },

    /// Every candidate source timed out.
    #[error("all {attempts} status feed sources timed out")]
    AllSourcesTimedOut { attempts: usize },

    /// A source answered successfully with a zero-byte body.
    #[error("{url} returned an empty document")]
    EmptyDocument { url: Url },

    // ── Cache ───────────────────────────────────────────────────────
    /// Reading or replacing the cache file failed.
    #[error("cache file {}: {source}", path.display())]
    Cache {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FeedError {
    /// Classify a `reqwest` failure for `url`: timeouts get their own
    /// variant so the fetch loop can fall back, everything else is hard.
    pub(crate) fn from_reqwest(url: &Url, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout { url: url.clone() }
        } else {
            Self::Http {
                url: url.clone(),
                source: err,
            }
        }
    }

    /// `true` when this failure means "try the next source".
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}
