use crate::Result;
use async_trait::async_trait;
use tokio::time::Instant;

/// Outcome of a successful lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Redirect to this URL.
    Redirect(String),
    /// No link is stored under the code.
    NotFound,
}

#[async_trait]
pub trait Redirector: Send + Sync + 'static {
    /// Resolves a raw short code taken from a request.
    async fn resolve(&self, code: &str, deadline: Option<Instant>) -> Result<Resolution>;
}
