use crate::error::ShortenerError;
use async_trait::async_trait;
use burrow_core::ShortCode;
use tokio::time::Instant;

type Result<T> = std::result::Result<T, ShortenerError>;

/// Parameters for creating a shortened URL.
#[derive(Debug, Clone)]
pub struct ShortenParams {
    /// The original URL to be shortened.
    pub target_url: String,
    /// Address of the requesting client, if known.
    pub creator_address: Option<String>,
    /// Identity of the authenticated caller, if any.
    pub creator_identity: Option<String>,
}

impl ShortenParams {
    pub fn new(target_url: impl Into<String>) -> Self {
        Self {
            target_url: target_url.into(),
            creator_address: None,
            creator_identity: None,
        }
    }
}

#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    /// Shortens a URL and returns the assigned short code.
    ///
    /// Store calls stop at `deadline` when one is given.
    async fn shorten(&self, params: ShortenParams, deadline: Option<Instant>) -> Result<ShortCode>;
}
