//! Core types and traits for the Burrow URL shortener.
//!
//! This crate provides the types shared by the code allocator, the
//! shortener service, the redirector and every store adapter.

pub mod deadline;
pub mod error;
pub mod link;
pub mod shortcode;
pub mod store;

pub use error::{CoreError, StorageError};
pub use link::{Link, LinkRecord};
pub use shortcode::ShortCode;
pub use store::{Atomicity, ReadStore, Store};
