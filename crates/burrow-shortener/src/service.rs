use crate::allocator::{CodeAllocator, RetryPolicy};
use crate::error::{AllocateError, ShortenerError};
use crate::shortener::{ShortenParams, Shortener};
use async_trait::async_trait;
use burrow_core::deadline::run_until;
use burrow_core::{Atomicity, Link, LinkRecord, ShortCode, StorageError, Store};
use burrow_generator::Generator;
use jiff::Timestamp;
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// A concrete implementation of the `Shortener` trait.
///
/// This service wraps a `Store` and a `CodeAllocator` to handle:
/// - URL validation
/// - Short code allocation with bounded collision retry
/// - Persisting the link, guarded against concurrent writers
#[derive(Debug)]
pub struct ShortenerService<S, G> {
    store: Arc<S>,
    allocator: CodeAllocator<G>,
}

impl<S: Store, G: Generator> ShortenerService<S, G> {
    pub fn new(store: Arc<S>, generator: G, policy: RetryPolicy) -> Self {
        Self {
            store,
            allocator: CodeAllocator::new(generator, policy),
        }
    }

    /// Validates that the URL has a valid format (has a scheme and host).
    fn validate_url(url: &str) -> Result<(), ShortenerError> {
        if url.is_empty() {
            return Err(ShortenerError::InvalidUrl(
                "URL cannot be empty".to_string(),
            ));
        }

        // Such a target could never be sent back in a Location header.
        if url.chars().any(|c| c.is_control() || c.is_whitespace()) {
            return Err(ShortenerError::InvalidUrl(format!(
                "URL must not contain whitespace or control characters: {:?}",
                url
            )));
        }

        let Some((scheme, rest)) = url.split_once("://") else {
            return Err(ShortenerError::InvalidUrl(format!(
                "URL must have a valid scheme and host: {}",
                url
            )));
        };

        let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
        if scheme.is_empty() || host.is_empty() {
            return Err(ShortenerError::InvalidUrl(format!(
                "URL must have a valid scheme and host: {}",
                url
            )));
        }

        let scheme = scheme.to_lowercase();
        if scheme != "http" && scheme != "https" {
            return Err(ShortenerError::InvalidUrl(format!(
                "URL scheme must be http or https: {}",
                scheme
            )));
        }

        Ok(())
    }

    /// Writes `link` under `code` and confirms this request owns the code.
    ///
    /// Returns `Ok(false)` when an atomic store reports the code as taken,
    /// which the caller treats like a collision.
    async fn persist(
        &self,
        code: &ShortCode,
        link: Link,
        deadline: Option<Instant>,
    ) -> Result<bool, ShortenerError> {
        let expected = LinkRecord::from(link.clone());

        let created = run_until(deadline, self.store.create(code, link))
            .await
            .ok_or(ShortenerError::DeadlineExceeded)?;

        match created {
            Ok(()) => {}
            Err(StorageError::Conflict(_)) => return Ok(false),
            Err(e) => return Err(e.into()),
        }

        if self.store.atomicity() == Atomicity::CheckThenAct {
            // Another request may have written the same code between our
            // existence check and our write. Whoever is stored now owns it.
            let stored = run_until(deadline, self.store.get(code))
                .await
                .ok_or(ShortenerError::DeadlineExceeded)??;

            if stored.as_ref() != Some(&expected) {
                warn!(code = %code, "short code overwritten by a concurrent writer");
                return Err(ShortenerError::Race(code.to_string()));
            }
        }

        Ok(true)
    }
}

#[async_trait]
impl<S: Store, G: Generator> Shortener for ShortenerService<S, G> {
    async fn shorten(
        &self,
        params: ShortenParams,
        deadline: Option<Instant>,
    ) -> Result<ShortCode, ShortenerError> {
        Self::validate_url(&params.target_url)?;

        let budget = self.allocator.policy().max_attempts;
        let mut used = 0;

        while used < budget {
            let allocation = self
                .allocator
                .allocate_after(self.store.as_ref(), deadline, used)
                .await?;
            used = allocation.attempts;

            let link = Link {
                target_url: params.target_url.clone(),
                creator_address: params.creator_address.clone(),
                creator_identity: params.creator_identity.clone(),
                created_at: Timestamp::now(),
            };

            if self.persist(&allocation.code, link, deadline).await? {
                info!(
                    code = %allocation.code,
                    target_url = %params.target_url,
                    attempts = used,
                    "issued short code"
                );
                return Ok(allocation.code);
            }

            debug!(code = %allocation.code, "short code taken between check and create");
        }

        warn!(attempts = budget, "no free short code");
        Err(AllocateError::Exhausted { attempts: budget }.into())
    }
}
