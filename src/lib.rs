//! Qload — a small load-testing harness for remote query backends.
//!
//! Qload submits a randomized, weighted mix of queries against a backend at a
//! controlled concurrency for a fixed duration, then reports latency and
//! throughput statistics. It is intentionally minimal: you provide the
//! backend client and the query text, and compose the building blocks into a
//! [`Scenario`].
//!
//! # Architecture
//!
//! The main building blocks are:
//!
//! - [`WeightedPool`]: an immutable set of workload templates supporting
//!   weight-proportional random draws.
//! - [`QueryBackend`]: the capability under test — an async call that takes
//!   an opaque query string and returns rows affected or an error.
//! - [`Executor`]: drives the run. The built-in [`PacedExecutor`] paces
//!   dispatches onto a fixed worker pool for a fixed wall-clock duration,
//!   then drains everything still in flight.
//! - [`RunStats`]: the raw accumulator — counters plus latency samples,
//!   fed in completion order by a dedicated aggregator task.
//! - [`Summary`]: derived statistics (average, p95/p99, throughput),
//!   computed once from a finished run.
//! - [`Reporter`]: consumes summaries and sends them somewhere (stdout as
//!   text or JSON, or your own sink).
//!
//! # Design goals
//!
//! - Per-query failures are data, not errors: a failing query becomes a
//!   failed [`Outcome`] and can never abort its siblings or the run.
//! - Fatal problems (empty workload set, zero concurrency, non-positive
//!   duration) abort before any work is scheduled.
//! - The only shared mutable state is the accumulator, isolated behind a
//!   channel — no global counters, no lock contention on the hot path.
//!
//! # Example
//!
//! ```no_run
//! use std::{sync::Arc, time::Duration};
//!
//! use async_trait::async_trait;
//! use qload::{
//!     BoxError, PacedExecutor, QueryBackend, Reporter, Scenario, StdoutReporter, WeightedPool,
//!     WorkloadTemplate,
//! };
//!
//! struct MyBackend;
//!
//! #[async_trait]
//! impl QueryBackend for MyBackend {
//!     async fn execute_remote(&self, payload: &str) -> Result<Option<u64>, BoxError> {
//!         // Hand the payload to the real client here.
//!         Ok(Some(1))
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), BoxError> {
//!     let pool = WeightedPool::build(vec![
//!         WorkloadTemplate::new("SELECT * FROM users WHERE id = 42", 70),
//!         WorkloadTemplate::new("SELECT count(*) FROM events", 30),
//!     ])?;
//!
//!     let stats = Scenario::builder()
//!         .name("mixed read load")
//!         .pool(pool)
//!         .backend(Arc::new(MyBackend))
//!         .executor(
//!             PacedExecutor::builder()
//!                 .concurrency(8)
//!                 .duration(Duration::from_secs(30))
//!                 .build(),
//!         )
//!         .build()
//!         .run()
//!         .await?;
//!
//!     StdoutReporter.report(&stats.finalize()).await?;
//!     Ok(())
//! }
//! ```
//!
//! # Limitations worth knowing
//!
//! - Pacing is a heuristic, not a rate limiter: the dispatch interval of
//!   `1 / concurrency` seconds approximates the target concurrency only when
//!   query latency is near one second. See [`executor`] for details.
//! - There is no per-query timeout. A backend call may block its worker for
//!   as long as the backend pleases; enforce deadlines in your
//!   [`QueryBackend`] implementation if you need them.

/// The backend capability and the measured execution wrapper
pub mod backend;
/// Externally supplied run parameters
pub mod config;
/// Error taxonomy
pub mod error;
/// Orchestrators that define how a run is actually driven
pub mod executor;
/// Results of individual query executions
pub mod outcome;
/// Summaries and reporters
pub mod report;
/// Main module of the harness that glues everything together
pub mod scenario;
/// Raw run accumulation
pub mod stats;
/// Weighted workload selection
pub mod workload;

pub use backend::QueryBackend;
pub use config::{TestConfig, WorkloadSpec};
pub use error::{BoxError, ConfigError, WorkloadError};
pub use executor::{Executor, PacedExecutor, Phase};
pub use outcome::Outcome;
pub use report::{JsonReporter, Reporter, StdoutReporter, Summary};
pub use scenario::Scenario;
pub use stats::RunStats;
pub use workload::{WeightedPool, WorkloadTemplate};
