use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, WorkloadError};

/// One workload entry in the configuration document.
///
/// `source` is an opaque reference (typically a file path) the caller
/// resolves to query text; the harness never reads it itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkloadSpec {
    pub source: String,
    pub weight: u32,
}

/// Externally supplied run parameters, read-only for the life of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestConfig {
    /// Opaque identity of the system under test (project id, DSN, cluster
    /// name — whatever the backend implementation wants).
    pub target: String,
    pub concurrency: usize,
    pub duration_seconds: f64,
    pub workloads: Vec<WorkloadSpec>,
}

impl TestConfig {
    /// Parses a YAML configuration document. Parsing does not validate; call
    /// [`validate`](Self::validate) before using the result.
    pub fn from_yaml_str(doc: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(doc)?)
    }

    /// Rejects parameter combinations that must abort before any work is
    /// scheduled.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.concurrency == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        if !(self.duration_seconds > 0.0) {
            return Err(ConfigError::NonPositiveDuration(self.duration_seconds));
        }
        if self.workloads.is_empty() {
            return Err(WorkloadError::EmptySet.into());
        }
        for (index, workload) in self.workloads.iter().enumerate() {
            if workload.weight == 0 {
                return Err(WorkloadError::NonPositiveWeight { index }.into());
            }
        }
        Ok(())
    }

    /// The configured duration as a [`Duration`]. Only meaningful after
    /// [`validate`](Self::validate) has passed.
    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.duration_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"
target: analytics-prod
concurrency: 16
duration_seconds: 60.0
workloads:
  - source: queries/point_lookup.sql
    weight: 70
  - source: queries/wide_join.sql
    weight: 30
"#;

    #[test]
    fn parses_a_full_document() {
        let config = TestConfig::from_yaml_str(DOC).unwrap();
        assert_eq!(config.target, "analytics-prod");
        assert_eq!(config.concurrency, 16);
        assert_eq!(config.workloads.len(), 2);
        assert_eq!(config.workloads[1].weight, 30);
        assert_eq!(config.duration(), Duration::from_secs(60));
        config.validate().unwrap();
    }

    #[test]
    fn garbage_documents_are_parse_errors() {
        assert!(matches!(
            TestConfig::from_yaml_str("concurrency: [not a number"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn zero_concurrency_fails_validation() {
        let mut config = TestConfig::from_yaml_str(DOC).unwrap();
        config.concurrency = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ZeroConcurrency)
        ));
    }

    #[test]
    fn non_positive_durations_fail_validation() {
        let mut config = TestConfig::from_yaml_str(DOC).unwrap();
        for bad in [0.0, -1.0, f64::NAN] {
            config.duration_seconds = bad;
            assert!(matches!(
                config.validate(),
                Err(ConfigError::NonPositiveDuration(_))
            ));
        }
    }

    #[test]
    fn workload_problems_fail_validation() {
        let mut config = TestConfig::from_yaml_str(DOC).unwrap();
        config.workloads[0].weight = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Workload(WorkloadError::NonPositiveWeight { index: 0 }))
        ));

        config.workloads.clear();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Workload(WorkloadError::EmptySet))
        ));
    }
}
