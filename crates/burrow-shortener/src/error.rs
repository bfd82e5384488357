use burrow_core::StorageError;
use burrow_generator::GeneratorError;
use thiserror::Error;

/// Errors returned by [`CodeAllocator`](crate::CodeAllocator).
///
/// A collision is not an error; it only consumes one attempt.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AllocateError {
    #[error("code synthesis failed: {0}")]
    Generator(#[from] GeneratorError),
    #[error("existence check failed: {0}")]
    Storage(#[from] StorageError),
    #[error("no free short code after {attempts} attempts")]
    Exhausted { attempts: u32 },
    #[error("deadline exceeded while allocating a short code")]
    DeadlineExceeded,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ShortenerError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error(transparent)]
    Allocate(#[from] AllocateError),
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("short code {0} was overwritten by a concurrent writer")]
    Race(String),
    #[error("deadline exceeded while persisting a link")]
    DeadlineExceeded,
}
