use async_trait::async_trait;
use taskbench_core::{
    seed::{self, relational},
    Backend, LookupKind, StatusName, Step, StepOutput,
};

use crate::{config::PgConfig, models::TransactionOutcome, repository::PgStore, Error, Result};

const SCENARIO: &[Step] = &[Step::ComplexQuery, Step::Update, Step::Delete, Step::Transaction];

/// Relational-store runner.
pub struct PostgresBackend {
    config: PgConfig,
    store: Option<PgStore>,
    first_task_id: Option<i32>,
}

impl PostgresBackend {
    pub fn new(config: PgConfig) -> Self {
        Self {
            config,
            store: None,
            first_task_id: None,
        }
    }

    fn store(&mut self) -> Result<&mut PgStore> {
        self.store.as_mut().ok_or(Error::NotConnected)
    }

    async fn seed_all(&mut self) -> Result<()> {
        let store = self.store()?;

        for kind in LookupKind::ALL {
            for name in relational::lookups(kind) {
                store.insert_lookup(kind, name).await?;
            }
        }

        let mut first = None;
        for task in relational::tasks() {
            let id = store.insert_task(&task).await?;
            first.get_or_insert(id);
        }
        tracing::debug!("Seeded relational tasks, first id {:?}", first);

        self.first_task_id = first;
        Ok(())
    }

    async fn step(&mut self, step: Step) -> Result<StepOutput> {
        let first_task_id = self.first_task_id;
        let store = self.store()?;

        let output = match step {
            Step::ComplexQuery => {
                let counts = store.count_by_status().await?;
                let rows = counts
                    .iter()
                    .map(serde_json::to_value)
                    .collect::<std::result::Result<Vec<_>, _>>()
                    .map_err(anyhow::Error::from)?;
                StepOutput::Rows { rows }
            }
            Step::Update => {
                let count = store
                    .promote_status(seed::PROJECT_ID, StatusName::TODO, StatusName::IN_PROGRESS)
                    .await?;
                StepOutput::Affected { count }
            }
            Step::Delete => {
                let count = store
                    .delete_by_status_and_assignee(
                        seed::PROJECT_ID,
                        StatusName::COMPLETED,
                        seed::DELETE_ASSIGNEE,
                    )
                    .await?;
                StepOutput::Affected { count }
            }
            Step::Transaction => {
                let task_id = first_task_id
                    .ok_or_else(|| anyhow::anyhow!("no task was seeded to run the transaction on"))?;
                match store
                    .reassign(task_id, StatusName::COMPLETED, seed::REASSIGN_TO)
                    .await?
                {
                    TransactionOutcome::Committed => StepOutput::Committed,
                    TransactionOutcome::RolledBack(reason) => StepOutput::RolledBack { reason },
                }
            }
        };

        Ok(output)
    }

    /// Truncate everything over a second, short-lived connection
    async fn clear(config: &PgConfig) -> Result<()> {
        let mut cleaner = PgStore::connect(config).await?;
        let truncated = cleaner.truncate_all().await;
        let closed = cleaner.close().await;

        truncated?;
        closed
    }
}

#[async_trait]
impl Backend for PostgresBackend {
    fn name(&self) -> &'static str {
        "PostgreSQL"
    }

    fn scenario(&self) -> &'static [Step] {
        SCENARIO
    }

    async fn connect(&mut self) -> taskbench_core::Result<()> {
        let store = PgStore::connect(&self.config).await?;
        tracing::debug!("Connected to {}:{}/{}", self.config.host, self.config.port, self.config.database);
        self.store = Some(store);
        Ok(())
    }

    async fn seed(&mut self) -> taskbench_core::Result<()> {
        Ok(self.seed_all().await?)
    }

    async fn run_step(&mut self, step: Step) -> taskbench_core::Result<StepOutput> {
        Ok(self.step(step).await?)
    }

    async fn cleanup(&mut self) -> taskbench_core::Result<()> {
        Ok(Self::clear(&self.config).await?)
    }

    fn cleanup_is_independent(&self) -> bool {
        true
    }

    async fn disconnect(&mut self) -> taskbench_core::Result<()> {
        self.first_task_id = None;
        if let Some(store) = self.store.take() {
            store.close().await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> PgConfig {
        PgConfig {
            host: "localhost".to_string(),
            port: 5432,
            user: "postgres".to_string(),
            password: String::new(),
            database: "tasks".to_string(),
        }
    }

    #[test]
    fn test_scenario_order() {
        let backend = PostgresBackend::new(config());
        assert_eq!(backend.name(), "PostgreSQL");
        assert_eq!(
            backend.scenario(),
            &[Step::ComplexQuery, Step::Update, Step::Delete, Step::Transaction]
        );
        assert!(backend.cleanup_is_independent());
    }

    #[tokio::test]
    async fn test_steps_require_connection() {
        let mut backend = PostgresBackend::new(config());

        let err = backend.run_step(Step::Update).await.unwrap_err();
        assert!(matches!(err, taskbench_core::Error::NotConnected));

        // Nothing to release yet
        backend.disconnect().await.unwrap();
    }
}
