use std::time::Instant;

use async_trait::async_trait;

use crate::{error::BoxError, outcome::Outcome};

/// The remote query-execution capability the harness drives.
///
/// Implementations wrap whatever client talks to the system under test. The
/// call is expected to block (asynchronously) for however long the backend
/// takes; the harness imposes **no timeout of its own** — if a per-call
/// deadline is wanted, the implementation must enforce it and report the
/// expiry as an error.
///
/// `Ok(Some(n))` means the backend reported `n` rows affected, `Ok(None)`
/// means it completed without reporting a count. Stateless implementations
/// can be shared across workers behind an `Arc`.
#[async_trait]
pub trait QueryBackend: Send + Sync {
    async fn execute_remote(&self, payload: &str) -> Result<Option<u64>, BoxError>;
}

/// Runs one query against the backend and classifies the result.
///
/// Wall-clock time is measured from just before dispatch to just after the
/// call returns, for failures as much as for successes. Backend errors never
/// propagate out of here — every failure becomes an [`Outcome::Failure`]
/// carrying the error's message, so one bad query can never take down the
/// run.
pub async fn execute<B: QueryBackend + ?Sized>(backend: &B, payload: &str) -> Outcome {
    let start = Instant::now();
    match backend.execute_remote(payload).await {
        Ok(rows_affected) => Outcome::Success {
            duration: start.elapsed(),
            rows_affected,
        },
        Err(err) => Outcome::Failure {
            duration: start.elapsed(),
            error: err.to_string(),
        },
    }
}
