use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::{outcome::Outcome, report::Summary};

/// Raw accumulator for one run.
///
/// `RunStats` stores counts and the per-success latency samples — nothing
/// derived. Averages, percentiles, and throughput belong to [`Summary`],
/// which is computed once from a finished accumulator; keeping the raw
/// samples here means any report can be derived later without losing
/// information.
///
/// During a run the accumulator is owned exclusively by the aggregator task
/// and fed over a channel, so `record` never needs a lock.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunStats {
    pub total_submitted: u64,
    pub total_succeeded: u64,
    pub total_failed: u64,
    /// Latencies of succeeded queries, in completion order. Order carries no
    /// meaning; completion order is unrelated to submission order.
    pub latencies: Vec<Duration>,
    /// The configured test duration, used for throughput. Drain time past the
    /// duration boundary is deliberately not counted.
    pub nominal_duration: Duration,
}

impl RunStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one outcome into the counters; successes also contribute a
    /// latency sample.
    pub fn record(&mut self, outcome: &Outcome) {
        if outcome.is_success() {
            self.total_succeeded += 1;
            self.latencies.push(outcome.duration());
        } else {
            self.total_failed += 1;
        }
    }

    /// Derives the final summary. Only meaningful once the run has drained;
    /// with zero successes the latency and throughput fields are absent
    /// rather than computed from an empty sample set.
    pub fn finalize(&self) -> Summary {
        Summary::from_stats(self)
    }
}

/// Task that drains completed outcomes into a [`RunStats`].
///
/// Outcomes arrive in completion order from any number of workers. The task
/// ends, returning the accumulator, once every sender has been dropped.
pub(crate) async fn aggregator_task(mut rx: mpsc::Receiver<Outcome>) -> RunStats {
    let mut stats = RunStats::new();
    while let Some(outcome) = rx.recv().await {
        match &outcome {
            Outcome::Success { duration, rows_affected } => {
                tracing::debug!(?duration, ?rows_affected, "query succeeded");
            }
            Outcome::Failure { duration, error } => {
                tracing::debug!(?duration, %error, "query failed");
            }
        }
        stats.record(&outcome);
    }
    stats
}
