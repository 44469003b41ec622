use std::collections::HashMap;

use async_trait::async_trait;
use bson::Bson;
use taskbench_core::{
    seed::{self, document},
    Backend, LookupKind, StatusName, Step, StepOutput,
};

use crate::{
    config::MongoConfig,
    models::{ReferenceMode, TaskDocument},
    repository::MongoStore,
    Error, Result,
};

const SCENARIO: &[Step] = &[Step::ComplexQuery, Step::Update, Step::Delete];

/// Document-store runner.
pub struct MongoBackend {
    config: MongoConfig,
    mode: ReferenceMode,
    store: Option<MongoStore>,
    seeded: HashMap<(LookupKind, String), Bson>,
}

impl MongoBackend {
    pub fn new(config: MongoConfig) -> Self {
        Self {
            config,
            mode: ReferenceMode::default(),
            store: None,
            seeded: HashMap::new(),
        }
    }

    pub fn with_reference_mode(mut self, mode: ReferenceMode) -> Self {
        self.mode = mode;
        self
    }

    fn store(&self) -> Result<&MongoStore> {
        self.store.as_ref().ok_or(Error::NotConnected)
    }

    /// Reference the seeded task carries for one lookup kind
    fn task_reference(&self, kind: LookupKind, name: &str) -> Bson {
        match self.mode {
            ReferenceMode::Placeholder => Bson::Int32(seed::PLACEHOLDER_REF),
            ReferenceMode::Resolved => self.resolved(kind, name),
        }
    }

    /// Status reference written by the update step
    fn updated_status(&self) -> Bson {
        match self.mode {
            ReferenceMode::Placeholder => Bson::Int32(seed::UPDATED_STATUS_REF),
            ReferenceMode::Resolved => self.resolved(LookupKind::Status, StatusName::IN_PROGRESS),
        }
    }

    fn resolved(&self, kind: LookupKind, name: &str) -> Bson {
        self.seeded
            .get(&(kind, name.to_string()))
            .cloned()
            .unwrap_or(Bson::Null)
    }

    async fn seed_all(&mut self) -> Result<()> {
        let mut seeded = HashMap::new();
        {
            let store = self.store()?;
            for kind in LookupKind::ALL {
                let names = document::lookups(kind);
                let ids = store.insert_lookups(kind, names).await?;
                seeded.extend(names.iter().map(|name| (kind, name.to_string())).zip(ids));
            }
        }
        self.seeded = seeded;

        let task = document::task();
        let task_doc = TaskDocument::new(
            &task,
            self.task_reference(LookupKind::Status, &task.status),
            self.task_reference(LookupKind::Priority, &task.priority),
            self.task_reference(LookupKind::Type, &task.task_type),
        );
        let id = self.store()?.insert_task(&task_doc).await?;
        tracing::debug!("Inserted task {} ({:?} references)", id, self.mode);

        Ok(())
    }

    async fn step(&self, step: Step) -> Result<StepOutput> {
        let store = self.store()?;
        let title = document::task().title;

        let output = match step {
            Step::ComplexQuery => {
                let rows = store
                    .joined_tasks()
                    .await?
                    .into_iter()
                    .map(|doc| Bson::Document(doc).into_relaxed_extjson())
                    .collect();
                StepOutput::Rows { rows }
            }
            Step::Update => {
                let count = store
                    .update_status(seed::PROJECT_ID, &title, self.updated_status())
                    .await?;
                StepOutput::Affected { count }
            }
            Step::Delete => {
                let count = store.delete_task(seed::PROJECT_ID, &title).await?;
                StepOutput::Affected { count }
            }
            Step::Transaction => {
                return Err(Error::Other(anyhow::anyhow!(
                    "transactions are not part of the document-store scenario"
                )))
            }
        };

        Ok(output)
    }
}

#[async_trait]
impl Backend for MongoBackend {
    fn name(&self) -> &'static str {
        "MongoDB"
    }

    fn scenario(&self) -> &'static [Step] {
        SCENARIO
    }

    async fn connect(&mut self) -> taskbench_core::Result<()> {
        let store = MongoStore::connect(&self.config).await?;
        tracing::debug!("Connected to {} ({})", self.config.uri, self.config.database);
        self.store = Some(store);
        Ok(())
    }

    async fn seed(&mut self) -> taskbench_core::Result<()> {
        Ok(self.seed_all().await?)
    }

    async fn run_step(&mut self, step: Step) -> taskbench_core::Result<StepOutput> {
        if !SCENARIO.contains(&step) {
            return Err(taskbench_core::Error::UnsupportedStep {
                backend: self.name(),
                step: step.to_string(),
            });
        }
        Ok(self.step(step).await?)
    }

    async fn cleanup(&mut self) -> taskbench_core::Result<()> {
        let cleared = self.store()?.wipe().await?;
        tracing::debug!("Cleared collections: {:?}", cleared);
        Ok(())
    }

    async fn disconnect(&mut self) -> taskbench_core::Result<()> {
        self.seeded.clear();
        if let Some(store) = self.store.take() {
            store.shutdown().await;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::oid::ObjectId;

    #[test]
    fn test_placeholder_references() {
        let backend = MongoBackend::new(MongoConfig::default());

        assert_eq!(backend.task_reference(LookupKind::Priority, "High"), Bson::Int32(1));
        assert_eq!(backend.updated_status(), Bson::Int32(2));
    }

    #[test]
    fn test_resolved_references() {
        let mut backend =
            MongoBackend::new(MongoConfig::default()).with_reference_mode(ReferenceMode::Resolved);
        let high = Bson::ObjectId(ObjectId::new());
        let in_progress = Bson::ObjectId(ObjectId::new());
        backend
            .seeded
            .insert((LookupKind::Priority, "High".to_string()), high.clone());
        backend
            .seeded
            .insert((LookupKind::Status, StatusName::IN_PROGRESS.to_string()), in_progress.clone());

        assert_eq!(backend.task_reference(LookupKind::Priority, "High"), high);
        assert_eq!(backend.task_reference(LookupKind::Type, "Bug"), Bson::Null);
        assert_eq!(backend.updated_status(), in_progress);
    }

    #[tokio::test]
    async fn test_transaction_step_unsupported() {
        let mut backend = MongoBackend::new(MongoConfig::default());

        let err = backend.run_step(Step::Transaction).await.unwrap_err();
        assert!(matches!(err, taskbench_core::Error::UnsupportedStep { .. }));

        let err = backend.run_step(Step::Delete).await.unwrap_err();
        assert!(matches!(err, taskbench_core::Error::NotConnected));
    }
}
