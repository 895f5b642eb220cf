use thiserror::Error;

/// Opaque error currency for backend failures.
///
/// Backends report failures however they like (timeouts, malformed queries,
/// quota rejections, transport faults); the harness only needs a
/// human-readable message, so anything that is an error will do.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Fatal problems with the workload set, surfaced before any work is
/// scheduled.
#[derive(Debug, Error)]
pub enum WorkloadError {
    #[error("workload set is empty")]
    EmptySet,
    #[error("workload at index {index} has a non-positive weight")]
    NonPositiveWeight { index: usize },
    #[error("invalid weight distribution: {0}")]
    Distribution(String),
}

/// Fatal configuration problems, surfaced before any work is scheduled.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("concurrency must be at least 1")]
    ZeroConcurrency,
    #[error("duration must be positive, got {0}s")]
    NonPositiveDuration(f64),
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error(transparent)]
    Workload(#[from] WorkloadError),
}
