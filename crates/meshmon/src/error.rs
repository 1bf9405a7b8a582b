//! Check-level error type.
//!
//! Every fatal failure ends the same way for the monitoring system: one
//! `MESHNODE UNKNOWN - ...` line on stdout and exit code 3. The variants
//! exist so the line carries a precise reason, not for branching.

use thiserror::Error;

use meshmon_core::DocumentError;
use meshmon_feed::FeedError;

#[derive(Debug, Error)]
pub enum CheckError {
    /// Anything that went wrong obtaining the document bytes.
    #[error(transparent)]
    Feed(#[from] FeedError),

    /// The document did not decode under the selected schema.
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// A flag or profile value did not survive validation.
    #[error("invalid value for {field}: {reason}")]
    Validation { field: String, reason: String },

    /// The config file failed to load or merge.
    #[error("configuration: {0}")]
    Config(Box<figment::Error>),
}

impl From<figment::Error> for CheckError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}
