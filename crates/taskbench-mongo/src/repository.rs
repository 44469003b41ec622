use bson::{doc, Bson, Document};
use futures_util::TryStreamExt;
use mongodb::{options::ClientOptions, Client, Collection, Database};
use taskbench_core::LookupKind;

use crate::{config::MongoConfig, models::TaskDocument, pipeline, Error, Result};

pub const TASKS: &str = "tasks";

/// One client handle and the benchmark database.
pub struct MongoStore {
    client: Client,
    db: Database,
}

impl MongoStore {
    /// Connect and ping, so an unreachable server fails here rather than on the first insert
    pub async fn connect(config: &MongoConfig) -> Result<Self> {
        let mut options = ClientOptions::parse(&config.uri)
            .await
            .map_err(|e| Error::Connection(format!("invalid uri {}: {}", config.uri, e)))?;
        options.app_name = Some("taskbench".to_string());

        let client = Client::with_options(options)?;
        let db = client.database(&config.database);
        db.run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| Error::Connection(format!("{}: {}", config.uri, e)))?;

        Ok(Self { client, db })
    }

    pub async fn shutdown(self) {
        self.client.shutdown().await;
    }

    fn tasks(&self) -> Collection<TaskDocument> {
        self.db.collection(TASKS)
    }

    /// Insert the named lookup documents, returning their ids in input order
    pub async fn insert_lookups(&self, kind: LookupKind, names: &[&str]) -> Result<Vec<Bson>> {
        let documents: Vec<Document> = names
            .iter()
            .map(|name| pipeline::lookup_document(kind, name))
            .collect();

        let result = self
            .db
            .collection::<Document>(kind.collection())
            .insert_many(documents, None)
            .await?;

        let mut ids: Vec<(usize, Bson)> = result.inserted_ids.into_iter().collect();
        ids.sort_by_key(|(index, _)| *index);

        Ok(ids.into_iter().map(|(_, id)| id).collect())
    }

    pub async fn insert_task(&self, task: &TaskDocument) -> Result<Bson> {
        let result = self.tasks().insert_one(task, None).await?;
        Ok(result.inserted_id)
    }

    /// Run the join pipeline over every task
    pub async fn joined_tasks(&self) -> Result<Vec<Document>> {
        let cursor = self
            .tasks()
            .aggregate(pipeline::join_pipeline(), None)
            .await?;

        Ok(cursor.try_collect().await?)
    }

    /// Set the status reference of the first task matching project and title.
    /// Returns the number of matched tasks.
    pub async fn update_status(
        &self,
        project_id: i32,
        title: &str,
        status_id: impl Into<Bson>,
    ) -> Result<u64> {
        let result = self
            .tasks()
            .update_one(
                pipeline::task_filter(project_id, title),
                pipeline::set_status(status_id),
                None,
            )
            .await?;

        Ok(result.matched_count)
    }

    /// Delete the first task matching project and title. Zero matches is not an error.
    pub async fn delete_task(&self, project_id: i32, title: &str) -> Result<u64> {
        let result = self
            .tasks()
            .delete_one(pipeline::task_filter(project_id, title), None)
            .await?;

        Ok(result.deleted_count)
    }

    pub async fn count_documents(&self, collection: &str) -> Result<u64> {
        let count = self
            .db
            .collection::<Document>(collection)
            .count_documents(None, None)
            .await?;

        Ok(count)
    }

    /// Delete every document of every collection in the database.
    /// Returns the names of the collections that were cleared.
    pub async fn wipe(&self) -> Result<Vec<String>> {
        let names = self.db.list_collection_names(None).await?;

        for name in &names {
            let result = self
                .db
                .collection::<Document>(name)
                .delete_many(doc! {}, None)
                .await?;
            tracing::debug!("Cleared {} documents from {}", result.deleted_count, name);
        }

        Ok(names)
    }
}
