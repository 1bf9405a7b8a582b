//! Domain model and schema adapters for mesh fleet-status documents.
//!
//! This crate owns everything needed to turn raw status-feed bytes into a
//! monitoring verdict for one router:
//!
//! - **[`RouterStatus`]** — the normalized per-router record (hostname,
//!   stable id, online flag, optional client count).
//!
//! - **[`FeedSchema`]** — selector over the three feed generations'
//!   incompatible document shapes. Each variant carries its own serde
//!   types behind [`FeedSchema::locate`], which parses a document and
//!   finds the record for a requested hostname.
//!
//! - **[`ServiceState`] / [`Thresholds`] / [`PerfData`]** — the
//!   monitoring-plugin contract: the four service states with fixed exit
//!   codes, strict-greater threshold classification of the client count,
//!   and performance-data rendering.
//!
//! Fetching and caching live in `meshmon-feed`; this crate is pure
//! computation over bytes already in hand.

pub mod error;
pub mod model;
pub mod schema;
pub mod status;

// ── Primary re-exports ──────────────────────────────────────────────
pub use error::DocumentError;
pub use model::RouterStatus;
pub use schema::FeedSchema;
pub use status::{PerfData, ServiceState, Thresholds};
