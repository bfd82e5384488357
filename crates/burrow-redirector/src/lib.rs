//! Redirect resolution.
//!
//! [`RedirectorService`] looks a short code up in a read-only store and tells
//! the caller where to redirect, or that there is nothing to redirect to.

pub mod error;
pub mod redirector;
pub mod service;

pub use error::RedirectError;
pub use redirector::{Redirector, Resolution};
pub use service::RedirectorService;

pub type Result<T> = std::result::Result<T, RedirectError>;
