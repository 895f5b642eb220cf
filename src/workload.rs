use rand::{
    distributions::{Distribution, WeightedIndex},
    thread_rng,
};

use crate::error::WorkloadError;

/// A reusable query definition with a relative selection weight.
///
/// The payload is opaque to the harness: it is handed to the backend as-is
/// and never parsed or validated here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkloadTemplate {
    pub payload: String,
    pub weight: u32,
}

impl WorkloadTemplate {
    pub fn new(payload: impl Into<String>, weight: u32) -> Self {
        Self {
            payload: payload.into(),
            weight,
        }
    }
}

/// An immutable pool supporting weighted random draws over a template set.
///
/// Built once per run. Each template is drawn with probability
/// `weight / total_weight` — the same distribution as replicating every
/// template `weight` times and picking uniformly, but backed by a
/// cumulative-weight index so large weights cost nothing.
///
/// `draw` is a pure function over the pool and uses the calling thread's own
/// random source, so it can be called from any number of tasks without
/// external synchronization.
#[derive(Debug, Clone)]
pub struct WeightedPool {
    templates: Vec<WorkloadTemplate>,
    index: WeightedIndex<u32>,
}

impl WeightedPool {
    /// Validates the template set and builds the draw index.
    ///
    /// Fails on an empty set or any zero weight; both are fatal before a run
    /// starts.
    pub fn build(templates: Vec<WorkloadTemplate>) -> Result<Self, WorkloadError> {
        if templates.is_empty() {
            return Err(WorkloadError::EmptySet);
        }
        for (index, template) in templates.iter().enumerate() {
            if template.weight == 0 {
                return Err(WorkloadError::NonPositiveWeight { index });
            }
        }
        let index = WeightedIndex::new(templates.iter().map(|t| t.weight))
            .map_err(|e| WorkloadError::Distribution(e.to_string()))?;
        Ok(Self { templates, index })
    }

    /// Draws one payload with probability proportional to its weight.
    pub fn draw(&self) -> &str {
        let picked = self.index.sample(&mut thread_rng());
        &self.templates[picked].payload
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_set_is_rejected() {
        assert!(matches!(
            WeightedPool::build(vec![]),
            Err(WorkloadError::EmptySet)
        ));
    }

    #[test]
    fn zero_weight_is_rejected() {
        let err = WeightedPool::build(vec![
            WorkloadTemplate::new("SELECT 1", 1),
            WorkloadTemplate::new("SELECT 2", 0),
        ])
        .unwrap_err();
        assert!(matches!(err, WorkloadError::NonPositiveWeight { index: 1 }));
    }

    #[test]
    fn single_template_is_always_drawn() {
        let pool = WeightedPool::build(vec![WorkloadTemplate::new("SELECT 1", 3)]).unwrap();
        for _ in 0..100 {
            assert_eq!(pool.draw(), "SELECT 1");
        }
    }

    #[test]
    fn draw_frequency_tracks_weights() {
        let pool = WeightedPool::build(vec![
            WorkloadTemplate::new("heavy", 90),
            WorkloadTemplate::new("light", 10),
        ])
        .unwrap();

        let n = 100_000;
        let heavy = (0..n).filter(|_| pool.draw() == "heavy").count();
        let observed = heavy as f64 / n as f64;
        // ~10 sigma for a binomial with p = 0.9 at this sample size
        assert!(
            (observed - 0.9).abs() < 0.01,
            "heavy drawn with frequency {observed}, expected ~0.9"
        );
    }
}
