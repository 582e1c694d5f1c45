//! Error types for modelgate-index

use thiserror::Error;

/// Index error type
///
/// Lookups that find nothing (unknown tag, channel, or health score) are
/// normal control flow and return empty/`None` instead of an error.
#[derive(Debug, Error)]
pub enum Error {
    /// Tag selector could not be parsed
    #[error("invalid tag selector: {0}")]
    Selector(String),

    /// Snapshot source failed to produce a snapshot
    #[error("snapshot source error: {0}")]
    Source(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
