use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use futures::future::join_all;
use tokio::{
    sync::{mpsc, Mutex},
    task::JoinHandle,
    time::Instant,
};
use typed_builder::TypedBuilder;

use super::{Executor, Phase};
use crate::{
    backend::{self, QueryBackend},
    error::ConfigError,
    outcome::Outcome,
    stats::{aggregator_task, RunStats},
    workload::WeightedPool,
};
use internals::*;

/// Executor that paces dispatches onto a fixed pool of worker tasks for a
/// fixed wall-clock duration.
///
/// - Exactly `concurrency` workers are spawned; they share one job queue, so
///   at most `concurrency` queries are ever in flight.
/// - The submission loop sleeps `1 / concurrency` seconds between dispatches
///   (see the module docs for why this approximates, rather than enforces,
///   the target concurrency).
/// - The job queue holds at most `concurrency` pending payloads; when it is
///   full, dispatch waits for a worker instead of accumulating a backlog.
/// - Once the duration elapses, no new work is accepted but everything
///   already dispatched runs to completion and lands in the final counts.
///
/// A failed query is recorded and never resubmitted.
#[derive(Debug, Clone, TypedBuilder)]
pub struct PacedExecutor {
    /// Number of worker tasks, and the concurrency the pacing aims for.
    pub concurrency: usize,
    /// How long to keep submitting new queries.
    pub duration: Duration,
}

#[async_trait]
impl Executor for PacedExecutor {
    async fn run<B>(&self, pool: &WeightedPool, backend: Arc<B>) -> Result<RunStats, ConfigError>
    where
        B: QueryBackend + 'static,
    {
        if self.concurrency == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        if self.duration.is_zero() {
            return Err(ConfigError::NonPositiveDuration(0.0));
        }

        let (job_tx, job_rx) = mpsc::channel::<String>(self.concurrency);
        let (outcome_tx, outcome_rx) = mpsc::channel::<Outcome>(self.concurrency * 10);

        tracing::info!(phase = ?Phase::Idle, concurrency = self.concurrency, "spawning aggregator and workers");
        let aggregator = tokio::spawn(aggregator_task(outcome_rx));
        let workers = spawn_workers(
            self.concurrency,
            backend,
            Arc::new(Mutex::new(job_rx)),
            outcome_tx,
        );

        tracing::info!(phase = ?Phase::Submitting, duration_s = self.duration.as_secs_f64(), "submission loop started");
        let interval = Duration::from_secs_f64(1.0 / self.concurrency as f64);
        let start = Instant::now();
        let mut submitted: u64 = 0;
        while start.elapsed() < self.duration {
            let payload = pool.draw().to_owned();
            if job_tx.send(payload).await.is_err() {
                // every worker is gone; nothing left to dispatch to
                break;
            }
            submitted += 1;
            tokio::time::sleep(interval).await;
        }
        drop(job_tx);

        tracing::info!(phase = ?Phase::Draining, submitted, "waiting for in-flight queries");
        for worker in join_all(workers).await {
            worker.expect("worker task panicked");
        }
        let mut stats = aggregator.await.expect("aggregator task panicked");
        stats.total_submitted = submitted;
        stats.nominal_duration = self.duration;

        tracing::info!(
            phase = ?Phase::Finished,
            succeeded = stats.total_succeeded,
            failed = stats.total_failed,
            "run finished"
        );
        Ok(stats)
    }
}

mod internals {
    use super::*;

    /// Spawn the fixed worker pool. Each worker takes payloads from the
    /// shared queue until it closes, executes them against the backend, and
    /// forwards outcomes to the aggregator. In-flight queries always run to
    /// completion, so closing the queue drains rather than aborts.
    pub(super) fn spawn_workers<B>(
        workers: usize,
        backend: Arc<B>,
        jobs: Arc<Mutex<mpsc::Receiver<String>>>,
        outcomes: mpsc::Sender<Outcome>,
    ) -> Vec<JoinHandle<()>>
    where
        B: QueryBackend + 'static,
    {
        (0..workers)
            .map(|i| {
                let backend = Arc::clone(&backend);
                let jobs = Arc::clone(&jobs);
                let outcomes = outcomes.clone();
                tokio::spawn(async move {
                    loop {
                        // The guard is dropped before the query runs, so
                        // holding it only serializes the hand-off.
                        let job = jobs.lock().await.recv().await;
                        let Some(payload) = job else { break };

                        let outcome = backend::execute(backend.as_ref(), &payload).await;
                        if outcomes.send(outcome).await.is_err() {
                            break;
                        }
                    }
                    tracing::debug!("worker {i} shutting down");
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant as StdInstant;

    use super::*;
    use crate::{error::BoxError, workload::WorkloadTemplate};

    struct FixedLatencyBackend {
        latency: Duration,
    }

    #[async_trait]
    impl QueryBackend for FixedLatencyBackend {
        async fn execute_remote(&self, _payload: &str) -> Result<Option<u64>, BoxError> {
            tokio::time::sleep(self.latency).await;
            Ok(Some(1))
        }
    }

    struct AlwaysFailingBackend;

    #[async_trait]
    impl QueryBackend for AlwaysFailingBackend {
        async fn execute_remote(&self, _payload: &str) -> Result<Option<u64>, BoxError> {
            Err("rate limit exceeded".into())
        }
    }

    fn init_tracing() {
        use tracing_subscriber::EnvFilter;
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    fn two_way_pool() -> WeightedPool {
        WeightedPool::build(vec![
            WorkloadTemplate::new("SELECT 1", 50),
            WorkloadTemplate::new("SELECT 2", 50),
        ])
        .unwrap()
    }

    #[tokio::test]
    async fn zero_concurrency_is_rejected_before_any_work() {
        init_tracing();
        let executor = PacedExecutor::builder()
            .concurrency(0)
            .duration(Duration::from_secs(1))
            .build();
        let err = executor
            .run(&two_way_pool(), Arc::new(AlwaysFailingBackend))
            .await
            .unwrap_err();
        assert!(matches!(err, ConfigError::ZeroConcurrency));
    }

    #[tokio::test]
    async fn zero_duration_is_rejected_before_any_work() {
        init_tracing();
        let executor = PacedExecutor::builder()
            .concurrency(2)
            .duration(Duration::ZERO)
            .build();
        let err = executor
            .run(&two_way_pool(), Arc::new(AlwaysFailingBackend))
            .await
            .unwrap_err();
        assert!(matches!(err, ConfigError::NonPositiveDuration(_)));
    }

    #[tokio::test]
    async fn paced_run_approximates_the_dispatch_budget() {
        init_tracing();
        let executor = PacedExecutor::builder()
            .concurrency(5)
            .duration(Duration::from_secs(2))
            .build();
        let backend = Arc::new(FixedLatencyBackend {
            latency: Duration::from_millis(100),
        });

        let stats = executor.run(&two_way_pool(), backend).await.unwrap();

        // 2s of pacing at 0.2s per dispatch
        assert!(
            (9..=11).contains(&stats.total_submitted),
            "submitted {} queries, expected ~10",
            stats.total_submitted
        );
        assert_eq!(stats.total_succeeded, stats.total_submitted);
        assert_eq!(stats.total_failed, 0);

        let summary = stats.finalize();
        let expected_qps = stats.total_succeeded as f64 / 2.0;
        assert!((summary.throughput_qps.unwrap() - expected_qps).abs() < 1e-9);
        let avg = summary.avg_latency_s.unwrap();
        assert!(avg >= 0.1 && avg < 0.3, "average latency {avg}s");
    }

    #[tokio::test]
    async fn failing_backend_fails_every_submission() {
        init_tracing();
        let executor = PacedExecutor::builder()
            .concurrency(4)
            .duration(Duration::from_millis(500))
            .build();

        let stats = executor
            .run(&two_way_pool(), Arc::new(AlwaysFailingBackend))
            .await
            .unwrap();

        assert_eq!(stats.total_failed, stats.total_submitted);
        assert_eq!(stats.total_succeeded, 0);
        assert_eq!(
            stats.total_submitted,
            stats.total_succeeded + stats.total_failed
        );

        let summary = stats.finalize();
        assert_eq!(summary.avg_latency_s, None);
        assert_eq!(summary.p95_latency_s, None);
        assert_eq!(summary.p99_latency_s, None);
        assert_eq!(summary.throughput_qps, None);
    }

    #[tokio::test]
    async fn queries_outliving_the_duration_are_drained() {
        init_tracing();
        let executor = PacedExecutor::builder()
            .concurrency(1)
            .duration(Duration::from_millis(200))
            .build();
        let backend = Arc::new(FixedLatencyBackend {
            latency: Duration::from_secs(1),
        });

        let started = StdInstant::now();
        let stats = executor.run(&two_way_pool(), backend).await.unwrap();

        // the single dispatched query outlives the 200ms window but is
        // still waited for and counted
        assert!(started.elapsed() >= Duration::from_millis(900));
        assert_eq!(stats.total_submitted, 1);
        assert_eq!(stats.total_succeeded, 1);
        assert_eq!(
            stats.total_submitted,
            stats.total_succeeded + stats.total_failed
        );
    }
}
