use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{error::BoxError, stats::RunStats};

/// The processed form of a finished run's [`RunStats`].
///
/// A `Summary` is pure data, free of I/O: counters plus derived statistics.
/// The optional fields are present only when at least one query succeeded —
/// there is no average or percentile of an empty sample set, and serialized
/// summaries simply omit them.
///
/// Percentiles use linear interpolation between the two closest ranks of the
/// sorted sample (`rank = p/100 · (n − 1)`), the same rule numpy applies by
/// default. Throughput divides by the configured duration, not the actual
/// wall time including drain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total_submitted: u64,
    pub total_succeeded: u64,
    pub total_failed: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_latency_s: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p95_latency_s: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p99_latency_s: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub throughput_qps: Option<f64>,
}

impl Summary {
    pub fn from_stats(stats: &RunStats) -> Self {
        let mut summary = Summary {
            total_submitted: stats.total_submitted,
            total_succeeded: stats.total_succeeded,
            total_failed: stats.total_failed,
            avg_latency_s: None,
            p95_latency_s: None,
            p99_latency_s: None,
            throughput_qps: None,
        };
        if stats.total_succeeded == 0 || stats.latencies.is_empty() {
            return summary;
        }

        let mut samples: Vec<f64> = stats.latencies.iter().map(|d| d.as_secs_f64()).collect();
        samples.sort_by(|a, b| a.total_cmp(b));

        summary.avg_latency_s = Some(samples.iter().sum::<f64>() / samples.len() as f64);
        summary.p95_latency_s = Some(percentile(&samples, 95.0));
        summary.p99_latency_s = Some(percentile(&samples, 99.0));
        summary.throughput_qps =
            Some(stats.total_succeeded as f64 / stats.nominal_duration.as_secs_f64());
        summary
    }
}

impl From<RunStats> for Summary {
    fn from(stats: RunStats) -> Self {
        Summary::from_stats(&stats)
    }
}

/// Linear-interpolation percentile over an already sorted, non-empty sample.
pub(crate) fn percentile(sorted: &[f64], p: f64) -> f64 {
    debug_assert!(!sorted.is_empty());
    if sorted.len() == 1 {
        return sorted[0];
    }
    let rank = (p / 100.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (rank - lo as f64)
}

/// The I/O boundary: takes a finished [`Summary`] somewhere useful —
/// stdout, a file, a metrics service. Summaries stay pure; reporters do the
/// side effects.
#[async_trait]
pub trait Reporter: Send + Sync {
    async fn report(&self, summary: &Summary) -> Result<(), BoxError>;
}

/// Prints a human-readable summary to stdout.
pub struct StdoutReporter;

#[async_trait]
impl Reporter for StdoutReporter {
    async fn report(&self, summary: &Summary) -> Result<(), BoxError> {
        println!("total queries submitted: {}", summary.total_submitted);
        println!("successful queries:      {}", summary.total_succeeded);
        println!("failed queries:          {}", summary.total_failed);
        if let (Some(avg), Some(p95), Some(p99), Some(qps)) = (
            summary.avg_latency_s,
            summary.p95_latency_s,
            summary.p99_latency_s,
            summary.throughput_qps,
        ) {
            println!("average query duration:  {avg:.2}s");
            println!("p95 query duration:      {p95:.2}s");
            println!("p99 query duration:      {p99:.2}s");
            println!("average throughput:      {qps:.2} queries/sec");
        }
        Ok(())
    }
}

/// Prints the summary as a single JSON document to stdout.
pub struct JsonReporter;

#[async_trait]
impl Reporter for JsonReporter {
    async fn report(&self, summary: &Summary) -> Result<(), BoxError> {
        println!("{}", serde_json::to_string_pretty(summary)?);
        Ok(())
    }
}
