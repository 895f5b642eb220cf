//! Executor — orchestration of runtime execution and pacing.
//!
//! The `Executor` trait is the runtime hook that drives a load run against a
//! backend. Different executors can provide different scheduling strategies;
//! the built-in [`PacedExecutor`] implements the fixed-pool, fixed-duration
//! model this crate is built around.
//!
//! # High-level flow of a run
//! 1. Spawn an aggregator task that folds completed [`Outcome`]s into a
//!    [`RunStats`] as they arrive over a channel, in completion order.
//! 2. Spawn exactly `concurrency` worker tasks sharing one job queue. Each
//!    worker repeatedly takes a payload, runs it against the backend, and
//!    forwards the measured outcome to the aggregator.
//! 3. A single submission loop draws weighted payloads and dispatches them,
//!    sleeping a pacing interval between dispatches, until the configured
//!    duration has elapsed.
//! 4. Drain: the job queue is closed, the workers finish whatever is still
//!    in flight (however long that takes), and the aggregator returns the
//!    final accumulator.
//!
//! # Pacing is a heuristic
//! The interval between dispatches is `1 / concurrency` seconds. Assuming a
//! query lasts roughly one second, that keeps about `concurrency` queries
//! outstanding on average. It is **not** a rate limiter and there is no
//! feedback loop: when real latencies are far from one second the true
//! concurrency will sit below or above the target. The worker pool still
//! bounds it — at most `concurrency` queries ever run at once, and when all
//! workers are busy the dispatch of the next job waits for queue space
//! instead of piling up unbounded futures.
//!
//! [`Outcome`]: crate::outcome::Outcome
//! [`RunStats`]: crate::stats::RunStats
pub mod paced;
pub use paced::PacedExecutor;

use std::sync::Arc;

use async_trait::async_trait;

use crate::{backend::QueryBackend, error::ConfigError, stats::RunStats, workload::WeightedPool};

/// Lifecycle of a single run. `Finished` is reached only after every
/// dispatched query has completed and been recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Submitting,
    Draining,
    Finished,
}

/// The runtime hook that executes a load run.
///
/// Implementations own concurrency, pacing, and drain semantics. Invalid
/// run parameters must be rejected before any work is scheduled; per-query
/// failures must never surface here — they are recorded in the returned
/// [`RunStats`].
#[async_trait]
pub trait Executor: Send + Sync {
    async fn run<B>(&self, pool: &WeightedPool, backend: Arc<B>) -> Result<RunStats, ConfigError>
    where
        B: QueryBackend + 'static;
}
