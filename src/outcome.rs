use std::time::Duration;

use serde::{Deserialize, Serialize};

/// The recorded result of a single query execution.
///
/// An `Outcome` is produced once by the query executor and consumed exactly
/// once by the aggregator. The two variants make the bookkeeping rules
/// structural: a success can never carry an error message, and a failure can
/// never carry a row count.
///
/// `rows_affected` is `None` when the backend completed the query but did not
/// report a result size — deliberately distinguishable from `Some(0)`, a
/// query that genuinely touched zero rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Outcome {
    Success {
        duration: Duration,
        rows_affected: Option<u64>,
    },
    Failure {
        duration: Duration,
        error: String,
    },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }

    /// Wall-clock time the query took, recorded for failures as well.
    pub fn duration(&self) -> Duration {
        match self {
            Outcome::Success { duration, .. } | Outcome::Failure { duration, .. } => *duration,
        }
    }

    pub fn rows_affected(&self) -> Option<u64> {
        match self {
            Outcome::Success { rows_affected, .. } => *rows_affected,
            Outcome::Failure { .. } => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Outcome::Success { .. } => None,
            Outcome::Failure { error, .. } => Some(error),
        }
    }
}
