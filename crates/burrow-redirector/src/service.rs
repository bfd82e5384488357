use std::sync::Arc;

use crate::error::RedirectError;
use crate::redirector::{Redirector, Resolution};
use async_trait::async_trait;
use burrow_core::deadline::run_until;
use burrow_core::{ReadStore, ShortCode};
use tokio::time::Instant;
use tracing::{debug, error, trace};

/// Service for handling URL redirects.
///
/// Uses a read-only store and never writes; one lookup per resolution.
#[derive(Debug)]
pub struct RedirectorService<R> {
    store: Arc<R>,
}

impl<R: ReadStore> RedirectorService<R> {
    /// Creates a new RedirectorService with the given store.
    pub fn new(store: Arc<R>) -> Self {
        Self { store }
    }

    /// Resolves a short code to its target URL.
    ///
    /// # Returns
    ///
    /// * `Ok(Resolution::Redirect(url))` - The stored target URL
    /// * `Ok(Resolution::NotFound)` - No record under the code, or the code
    ///   is malformed and could never have been issued
    /// * `Err(RedirectError::Integrity(_))` - A record exists without a target
    /// * `Err(e)` - If there was an error accessing the store
    pub async fn resolve(&self, code: &str, deadline: Option<Instant>) -> crate::Result<Resolution> {
        Redirector::resolve(self, code, deadline).await
    }
}

#[async_trait]
impl<R: ReadStore> Redirector for RedirectorService<R> {
    async fn resolve(&self, code: &str, deadline: Option<Instant>) -> crate::Result<Resolution> {
        let Ok(code) = ShortCode::new(code) else {
            trace!(code, "malformed short code");
            return Ok(Resolution::NotFound);
        };

        trace!(code = %code, "resolving short code");

        let record = run_until(deadline, self.store.get(&code))
            .await
            .ok_or(RedirectError::DeadlineExceeded)??;

        match record {
            Some(record) => match record.target_url {
                Some(url) => {
                    debug!(code = %code, url = %url, "Resolved short code");
                    Ok(Resolution::Redirect(url))
                }
                None => {
                    error!(code = %code, "stored record has no target url");
                    Err(RedirectError::Integrity(code.to_string()))
                }
            },
            None => {
                trace!(code = %code, "Short code not found");
                Ok(Resolution::NotFound)
            }
        }
    }
}
