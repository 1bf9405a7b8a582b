//! Cached multi-source fetch of mesh fleet-status documents.
//!
//! One entry point: [`StatusFeed::fetch`] answers "give me the current
//! fleet-status document" while touching the network as rarely as
//! possible.
//!
//! - **Cache short-circuit** — a [`CacheStore`] snapshot younger than the
//!   configured freshness interval is returned without any network
//!   access; its age is the cache file's mtime.
//!
//! - **Ordered fallback** — stale or missing cache triggers one pass over
//!   the candidate source URLs: a per-request timeout moves on to the
//!   next source, while any other failure (hard network error, non-2xx
//!   status) aborts the whole fetch.
//!
//! - **Atomic replacement** — only a validated, non-empty body ever
//!   replaces the cache, via a temp-sibling-plus-rename write. A failed
//!   or empty fetch leaves the previous document untouched.
//!
//! Document *interpretation* is out of scope; `meshmon-core` consumes the
//! bytes this crate hands back.

pub mod cache;
pub mod error;
pub mod fetch;

// ── Primary re-exports ──────────────────────────────────────────────
pub use cache::{CacheStore, CachedDocument};
pub use error::FeedError;
pub use fetch::{DEFAULT_MAX_AGE, DEFAULT_TIMEOUT, FeedConfig, StatusFeed, default_cache_path};
