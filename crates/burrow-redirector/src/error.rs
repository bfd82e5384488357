use burrow_core::StorageError;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RedirectError {
    /// The record exists but carries no target URL.
    #[error("record for short code {0} has no target url")]
    Integrity(String),
    #[error("storage operation failed: {0}")]
    Storage(#[from] StorageError),
    #[error("deadline exceeded while resolving a short code")]
    DeadlineExceeded,
}
