//! Request-scoped deadlines.
//!
//! Every store call made on behalf of a request runs under the request's
//! deadline. A `None` deadline means the caller imposes no limit; dropping the
//! request future still cancels it at the next suspension point.

use std::future::Future;
use tokio::time::Instant;

/// Returns whether `deadline` has already passed.
pub fn expired(deadline: Option<Instant>) -> bool {
    deadline.is_some_and(|deadline| Instant::now() >= deadline)
}

/// Runs `future` to completion unless `deadline` passes first.
///
/// Returns `None` when the deadline won.
pub async fn run_until<F: Future>(deadline: Option<Instant>, future: F) -> Option<F::Output> {
    match deadline {
        Some(deadline) => tokio::time::timeout_at(deadline, future).await.ok(),
        None => Some(future.await),
    }
}
