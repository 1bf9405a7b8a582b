// ── Core error types ──
//
// Parse-level failures only. Transport failures live in `meshmon-feed`;
// an absent router is a lookup outcome, not an error.

use thiserror::Error;

/// Errors from decoding a fleet-status document.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The document is not valid JSON for the selected schema.
    #[error("malformed status document: {0}")]
    Malformed(#[from] serde_json::Error),
}
