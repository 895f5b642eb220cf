use std::sync::Arc;

use typed_builder::TypedBuilder;

use crate::{
    backend::QueryBackend, error::ConfigError, executor::Executor, stats::RunStats,
    workload::WeightedPool,
};

/// Glue that ties a run together: a named workload pool, the backend under
/// test, and the executor that drives them.
#[derive(TypedBuilder)]
pub struct Scenario<B, E>
where
    B: QueryBackend + 'static,
    E: Executor,
{
    #[builder(setter(into))]
    pub name: String,
    pub pool: WeightedPool,
    pub backend: Arc<B>,
    pub executor: E,
}

impl<B, E> Scenario<B, E>
where
    B: QueryBackend + 'static,
    E: Executor,
{
    pub async fn run(&self) -> Result<RunStats, ConfigError> {
        tracing::info!(name = %self.name, workloads = self.pool.len(), "starting scenario");
        self.executor
            .run(&self.pool, Arc::clone(&self.backend))
            .await
    }
}
