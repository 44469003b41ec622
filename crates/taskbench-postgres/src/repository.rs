use crate::{
    config::PgConfig,
    models::{StatusCount, TaskRow, TransactionOutcome},
    Error, Result,
};
use sqlx::{Connection, PgConnection, Postgres, Transaction};
use taskbench_core::{LookupKind, NewTask};

/// Every table the benchmark writes to, children first.
pub const TABLES: [&str; 4] = ["tasks", "taskPriorities", "taskTypes", "taskStatuses"];

/// A single scoped connection to the relational store.
pub struct PgStore {
    conn: PgConnection,
}

impl PgStore {
    /// Open one connection
    pub async fn connect(config: &PgConfig) -> Result<Self> {
        let conn = PgConnection::connect_with(&config.connect_options())
            .await
            .map_err(|e| {
                Error::Connection(format!("{}:{}/{}: {}", config.host, config.port, config.database, e))
            })?;

        Ok(Self { conn })
    }

    /// Close the connection, waiting for the server to acknowledge
    pub async fn close(self) -> Result<()> {
        self.conn.close().await?;
        Ok(())
    }

    /// Initialize database schema
    pub async fn init_schema(&mut self) -> Result<()> {
        for kind in LookupKind::ALL {
            let ddl = format!(
                "CREATE TABLE IF NOT EXISTS {} (id SERIAL PRIMARY KEY, {} VARCHAR(50) NOT NULL)",
                kind.collection(),
                kind.name_field()
            );
            sqlx::query(&ddl).execute(&mut self.conn).await?;
        }

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS tasks (
                id SERIAL PRIMARY KEY,
                project_id INTEGER NOT NULL,
                title VARCHAR(255) NOT NULL,
                description TEXT,
                status_id INTEGER REFERENCES taskStatuses(id),
                priority_id INTEGER REFERENCES taskPriorities(id),
                type_id INTEGER REFERENCES taskTypes(id),
                assigned_to INTEGER CHECK (assigned_to > 0)
            )
            "#,
        )
        .execute(&mut self.conn)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_tasks_project_id ON tasks(project_id)")
            .execute(&mut self.conn)
            .await?;

        Ok(())
    }

    // ========================================================================
    // Inserts
    // ========================================================================

    /// Insert one lookup row
    pub async fn insert_lookup(&mut self, kind: LookupKind, name: &str) -> Result<i32> {
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ($1) RETURNING id",
            kind.collection(),
            kind.name_field()
        );
        let id = sqlx::query_scalar::<_, i32>(&sql)
            .bind(name)
            .fetch_one(&mut self.conn)
            .await?;

        Ok(id)
    }

    /// Insert a task, resolving its references by lookup name.
    ///
    /// A name with no matching lookup row leaves that reference NULL.
    pub async fn insert_task(&mut self, task: &NewTask) -> Result<i32> {
        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO tasks (project_id, title, description, status_id, priority_id, type_id, assigned_to)
            VALUES ($1, $2, $3,
                    (SELECT id FROM taskStatuses WHERE status_name = $4),
                    (SELECT id FROM taskPriorities WHERE priority_name = $5),
                    (SELECT id FROM taskTypes WHERE type_name = $6),
                    $7)
            RETURNING id
            "#,
        )
        .bind(task.project_id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(&task.status)
        .bind(&task.priority)
        .bind(&task.task_type)
        .bind(task.assigned_to)
        .fetch_one(&mut self.conn)
        .await?;

        Ok(id)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Number of tasks per status name, for statuses that tasks actually reference
    pub async fn count_by_status(&mut self) -> Result<Vec<StatusCount>> {
        let rows = sqlx::query_as::<_, StatusCount>(
            r#"
            SELECT taskStatuses.status_name, COUNT(tasks.id) AS task_count
            FROM tasks
            JOIN taskStatuses ON tasks.status_id = taskStatuses.id
            GROUP BY taskStatuses.status_name
            ORDER BY taskStatuses.status_name
            "#,
        )
        .fetch_all(&mut self.conn)
        .await?;

        Ok(rows)
    }

    /// Get task by ID
    pub async fn get_task(&mut self, task_id: i32) -> Result<Option<TaskRow>> {
        let row = sqlx::query_as::<_, TaskRow>("SELECT * FROM tasks WHERE id = $1")
            .bind(task_id)
            .fetch_optional(&mut self.conn)
            .await?;

        Ok(row)
    }

    /// Resolve a lookup name to its id
    pub async fn lookup_id(&mut self, kind: LookupKind, name: &str) -> Result<Option<i32>> {
        let sql = format!(
            "SELECT id FROM {} WHERE {} = $1 LIMIT 1",
            kind.collection(),
            kind.name_field()
        );
        let id = sqlx::query_scalar::<_, i32>(&sql)
            .bind(name)
            .fetch_optional(&mut self.conn)
            .await?;

        Ok(id)
    }

    pub async fn row_count(&mut self, table: &str) -> Result<i64> {
        let table = TABLES
            .iter()
            .find(|t| t.eq_ignore_ascii_case(table))
            .ok_or_else(|| Error::UnknownTable(table.to_string()))?;

        let count = sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(&mut self.conn)
            .await?;

        Ok(count)
    }

    // ========================================================================
    // Updates and deletes
    // ========================================================================

    /// Move every task of a project from one status to another
    pub async fn promote_status(&mut self, project_id: i32, from: &str, to: &str) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE tasks SET status_id = (SELECT id FROM taskStatuses WHERE status_name = $2)
            WHERE project_id = $1
              AND status_id = (SELECT id FROM taskStatuses WHERE status_name = $3)
            "#,
        )
        .bind(project_id)
        .bind(to)
        .bind(from)
        .execute(&mut self.conn)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn delete_by_status_and_assignee(
        &mut self,
        project_id: i32,
        status: &str,
        assignee: i32,
    ) -> Result<u64> {
        let result = sqlx::query(
            r#"
            DELETE FROM tasks
            WHERE project_id = $1
              AND status_id = (SELECT id FROM taskStatuses WHERE status_name = $2)
              AND assigned_to = $3
            "#,
        )
        .bind(project_id)
        .bind(status)
        .bind(assignee)
        .execute(&mut self.conn)
        .await?;

        Ok(result.rows_affected())
    }

    /// Delete the tasks of a project with an exact title. Zero matches is not an error.
    pub async fn delete_task(&mut self, project_id: i32, title: &str) -> Result<u64> {
        let result = sqlx::query("DELETE FROM tasks WHERE project_id = $1 AND title = $2")
            .bind(project_id)
            .bind(title)
            .execute(&mut self.conn)
            .await?;

        Ok(result.rows_affected())
    }

    /// Set a task's status and assignee atomically.
    ///
    /// A failure inside the transaction rolls it back and is reported as
    /// [`TransactionOutcome::RolledBack`] rather than as an error. Only a failure
    /// to begin or roll back is returned as `Err`.
    pub async fn reassign(
        &mut self,
        task_id: i32,
        status: &str,
        assignee: i32,
    ) -> Result<TransactionOutcome> {
        let mut tx = self.conn.begin().await?;

        if let Err(e) = apply_reassignment(&mut tx, task_id, status, assignee).await {
            tracing::warn!("Error in transaction, rolling back: {}", e);
            tx.rollback().await?;
            return Ok(TransactionOutcome::RolledBack(e.to_string()));
        }

        match tx.commit().await {
            Ok(()) => Ok(TransactionOutcome::Committed),
            Err(e) => {
                tracing::warn!("Commit failed, transaction rolled back: {}", e);
                Ok(TransactionOutcome::RolledBack(e.to_string()))
            }
        }
    }

    /// Remove all rows from every table and reset their id sequences
    pub async fn truncate_all(&mut self) -> Result<()> {
        for table in TABLES {
            sqlx::query(&format!("TRUNCATE TABLE {} RESTART IDENTITY CASCADE", table))
                .execute(&mut self.conn)
                .await?;
        }

        Ok(())
    }
}

async fn apply_reassignment(
    tx: &mut Transaction<'_, Postgres>,
    task_id: i32,
    status: &str,
    assignee: i32,
) -> std::result::Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE tasks SET status_id = (SELECT id FROM taskStatuses WHERE status_name = $1) WHERE id = $2",
    )
    .bind(status)
    .bind(task_id)
    .execute(&mut **tx)
    .await?;

    sqlx::query("UPDATE tasks SET assigned_to = $1 WHERE id = $2")
        .bind(assignee)
        .bind(task_id)
        .execute(&mut **tx)
        .await?;

    Ok(())
}
