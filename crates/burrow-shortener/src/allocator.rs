use crate::error::AllocateError;
use burrow_core::deadline::{expired, run_until};
use burrow_core::{ReadStore, ShortCode};
use burrow_generator::Generator;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, trace, warn};
use typed_builder::TypedBuilder;

type Result<T> = std::result::Result<T, AllocateError>;

/// Bounds the collision-retry loop of a [`CodeAllocator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, TypedBuilder)]
pub struct RetryPolicy {
    /// Candidates to try before giving up. Values below 1 are treated as 1.
    #[builder(default = 10)]
    pub max_attempts: u32,
    /// Pause after the first collision; doubles after each further one.
    #[builder(default = Duration::ZERO)]
    pub initial_backoff: Duration,
    #[builder(default = Duration::from_millis(100))]
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl RetryPolicy {
    /// Pause after the `collision`-th collision (1-based).
    pub fn backoff(&self, collision: u32) -> Duration {
        let factor = 1u32
            .checked_shl(collision.saturating_sub(1))
            .unwrap_or(u32::MAX);
        self.initial_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }
}

/// A code that was free in the store when it was checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allocation {
    pub code: ShortCode,
    /// Attempt number of the winning candidate, counted across the budget.
    pub attempts: u32,
}

/// Finds unused short codes by synthesizing candidates and checking each one
/// against a store.
///
/// The guarantee is "free at check time" only. Two allocators can pick the
/// same code concurrently; closing that window is up to the store's
/// [`Atomicity`](burrow_core::Atomicity) and the caller.
#[derive(Debug)]
pub struct CodeAllocator<G> {
    generator: G,
    policy: RetryPolicy,
}

impl<G: Generator> CodeAllocator<G> {
    pub fn new(generator: G, policy: RetryPolicy) -> Self {
        let policy = RetryPolicy {
            max_attempts: policy.max_attempts.max(1),
            ..policy
        };
        Self { generator, policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Allocates a code using the full attempt budget of the policy.
    pub async fn allocate<S>(&self, store: &S, deadline: Option<Instant>) -> Result<Allocation>
    where
        S: ReadStore + ?Sized,
    {
        self.allocate_after(store, deadline, 0).await
    }

    /// Continues an allocation that has already spent `spent` attempts of the
    /// policy's budget, e.g. on codes lost to a concurrent create.
    ///
    /// Attempts are numbered across the whole budget: backoff keeps doubling
    /// from where it left off and [`AllocateError::Exhausted`] reports the
    /// full budget. Every attempt is a completely fresh synthesis. Store
    /// errors end the loop immediately and are never read as "taken" or
    /// "free".
    pub async fn allocate_after<S>(
        &self,
        store: &S,
        deadline: Option<Instant>,
        spent: u32,
    ) -> Result<Allocation>
    where
        S: ReadStore + ?Sized,
    {
        let max_attempts = self.policy.max_attempts;

        for attempt in spent.saturating_add(1)..=max_attempts {
            if expired(deadline) {
                return Err(AllocateError::DeadlineExceeded);
            }

            let candidate = self.generator.generate()?;
            trace!(code = %candidate, attempt, "checking candidate");

            let taken = run_until(deadline, store.exists(&candidate))
                .await
                .ok_or(AllocateError::DeadlineExceeded)??;

            if !taken {
                debug!(code = %candidate, attempts = attempt, "allocated short code");
                return Ok(Allocation {
                    code: candidate,
                    attempts: attempt,
                });
            }

            debug!(code = %candidate, attempt, "short code collision");

            let pause = self.policy.backoff(attempt);
            if !pause.is_zero() && attempt < max_attempts {
                run_until(deadline, tokio::time::sleep(pause))
                    .await
                    .ok_or(AllocateError::DeadlineExceeded)?;
            }
        }

        warn!(attempts = max_attempts, "no free short code");
        Err(AllocateError::Exhausted {
            attempts: max_attempts,
        })
    }
}
