//! Store error types.

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur while loading or saving an event snapshot.
///
/// The engine never retries store failures; the caller decides whether to
/// re-attempt or report.
#[derive(Debug, Error)]
pub enum StoreError {
    /// IO error during read/write.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to encode or decode the snapshot as JSON.
    #[error("snapshot serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}
