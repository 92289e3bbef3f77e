use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;

use crate::error::StoreError;
use crate::models::{NewTask, Subtask, Task, UpdateTaskRequest};
use crate::store::TaskStore;

const COLUMNS: &str = "id, text, details, completed, priority, category, \
                       due_date, subtasks, time_estimate, is_archived, recurrence";

const CREATE_TASKS_TABLE: &str = "CREATE TABLE IF NOT EXISTS tasks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    text TEXT NOT NULL,
    completed INTEGER NOT NULL DEFAULT 0
)";

/// Columns added after the original id/text/completed table shipped.
/// SQLite has no ADD COLUMN IF NOT EXISTS, so migrate() probes
/// `PRAGMA table_info` and only adds what is missing.
const ADDED_COLUMNS: &[(&str, &str)] = &[
    ("details", "TEXT NOT NULL DEFAULT ''"),
    ("priority", "TEXT NOT NULL DEFAULT 'Low'"),
    ("category", "TEXT NOT NULL DEFAULT 'Général'"),
    ("due_date", "TEXT NOT NULL DEFAULT ''"),
    ("subtasks", "TEXT NOT NULL DEFAULT '[]'"),
    ("time_estimate", "INTEGER NOT NULL DEFAULT 0"),
    ("is_archived", "INTEGER NOT NULL DEFAULT 0"),
    ("recurrence", "TEXT"),
];

/// SQLite variant of the task store. Booleans are integers and `subtasks`
/// is a JSON-encoded text column; the handler-visible contract is
/// identical to the PostgreSQL variant.
#[derive(Debug, Clone)]
pub struct SqliteTaskStore {
    pool: SqlitePool,
}

impl SqliteTaskStore {
    /// `path` is a file path, or `:memory:` for tests.
    pub async fn new(path: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .busy_timeout(Duration::from_secs(5));

        let pool = if path.contains(":memory:") {
            // A pooled in-memory database must stay on a single pinned
            // connection, otherwise each checkout sees an empty database.
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?
        } else {
            SqlitePoolOptions::new()
                .max_connections(5)
                .connect_with(options.journal_mode(SqliteJournalMode::Wal))
                .await?
        };
        Ok(Self { pool })
    }

    /// Apply the additive schema migrations. Idempotent.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::query(CREATE_TASKS_TABLE).execute(&self.pool).await?;

        let rows = sqlx::query("PRAGMA table_info(tasks)")
            .fetch_all(&self.pool)
            .await?;
        let existing: HashSet<String> = rows
            .iter()
            .map(|row| row.try_get("name"))
            .collect::<Result<_, _>>()?;

        for (name, declaration) in ADDED_COLUMNS {
            if !existing.contains(*name) {
                sqlx::query(&format!("ALTER TABLE tasks ADD COLUMN {name} {declaration}"))
                    .execute(&self.pool)
                    .await?;
            }
        }
        Ok(())
    }

    /// Direct pool access, for tests that need to shape the schema by hand.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn encode_subtasks(subtasks: &[Subtask]) -> Result<String, StoreError> {
    serde_json::to_string(subtasks).map_err(|e| StoreError::Database(e.to_string()))
}

fn row_to_task(row: &SqliteRow) -> Result<Task, StoreError> {
    let raw: String = row.try_get("subtasks")?;
    let subtasks = serde_json::from_str(&raw)
        .map_err(|e| StoreError::Database(format!("corrupt subtasks column: {e}")))?;
    Ok(Task {
        id: row.try_get("id")?,
        text: row.try_get("text")?,
        details: row.try_get("details")?,
        completed: row.try_get("completed")?,
        priority: row.try_get("priority")?,
        category: row.try_get("category")?,
        due_date: row.try_get("due_date")?,
        subtasks,
        time_estimate: row.try_get("time_estimate")?,
        is_archived: row.try_get("is_archived")?,
        recurrence: row.try_get("recurrence")?,
    })
}

#[async_trait]
impl TaskStore for SqliteTaskStore {
    async fn list(&self) -> Result<Vec<Task>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM tasks ORDER BY id ASC"
        ))
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(row_to_task).collect()
    }

    async fn create(&self, task: NewTask) -> Result<Task, StoreError> {
        let subtasks = encode_subtasks(&task.subtasks)?;
        let row = sqlx::query(&format!(
            "INSERT INTO tasks \
             (text, details, completed, priority, category, due_date, \
              subtasks, time_estimate, is_archived, recurrence) \
             VALUES (?, ?, 0, ?, ?, ?, ?, ?, 0, ?) \
             RETURNING {COLUMNS}"
        ))
        .bind(&task.text)
        .bind(&task.details)
        .bind(&task.priority)
        .bind(&task.category)
        .bind(&task.due_date)
        .bind(&subtasks)
        .bind(task.time_estimate)
        .bind(&task.recurrence)
        .fetch_one(&self.pool)
        .await?;
        row_to_task(&row)
    }

    async fn update(
        &self,
        id: i32,
        changes: UpdateTaskRequest,
    ) -> Result<Option<Task>, StoreError> {
        let subtasks = match &changes.subtasks {
            Some(list) => Some(encode_subtasks(list)?),
            None => None,
        };
        let row = sqlx::query(&format!(
            "UPDATE tasks SET \
                text = COALESCE(?, text), \
                details = COALESCE(?, details), \
                completed = COALESCE(?, completed), \
                priority = COALESCE(?, priority), \
                category = COALESCE(?, category), \
                due_date = COALESCE(?, due_date), \
                subtasks = COALESCE(?, subtasks), \
                time_estimate = COALESCE(?, time_estimate), \
                is_archived = COALESCE(?, is_archived), \
                recurrence = COALESCE(?, recurrence) \
             WHERE id = ? \
             RETURNING {COLUMNS}"
        ))
        .bind(&changes.text)
        .bind(&changes.details)
        .bind(changes.completed)
        .bind(&changes.priority)
        .bind(&changes.category)
        .bind(&changes.due_date)
        .bind(&subtasks)
        .bind(changes.time_estimate)
        .bind(changes.is_archived)
        .bind(&changes.recurrence)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(row_to_task).transpose()
    }

    async fn delete(&self, id: i32) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
