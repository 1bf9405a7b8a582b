// ── Router domain types ──

use serde::{Deserialize, Serialize};

/// Normalized state of one mesh router, as reported by a fleet-status feed.
///
/// All three feed schemas collapse into this shape. `name` is the
/// human-readable hostname used as the lookup key; `id` is whatever stable
/// identifier the feed publishes (legacy id, `node_id`, or MAC address).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouterStatus {
    pub name: String,
    pub id: String,
    pub online: bool,
    /// Connected clients. `None` when the feed omits the count or the
    /// router is offline; an absent count is never collapsed to zero.
    pub clients: Option<u32>,
}

impl RouterStatus {
    /// `"online"` / `"offline"`, as rendered in the status line.
    pub fn state_text(&self) -> &'static str {
        if self.online { "online" } else { "offline" }
    }
}
