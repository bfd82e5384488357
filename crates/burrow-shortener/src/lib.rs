//! Short code allocation and link creation.
//!
//! [`CodeAllocator`] turns random candidates into a code that is free in the
//! store at check time; [`ShortenerService`] wraps it into the creation entry
//! point and persists the resulting link.

pub mod allocator;
pub mod error;
pub mod service;
pub mod shortener;

pub use allocator::{Allocation, CodeAllocator, RetryPolicy};
pub use error::{AllocateError, ShortenerError};
pub use service::ShortenerService;
pub use shortener::{ShortenParams, Shortener};
