use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::types::Json;
use sqlx::Row;

use crate::error::StoreError;
use crate::models::{NewTask, Subtask, Task, UpdateTaskRequest};
use crate::store::TaskStore;

const COLUMNS: &str = "id, text, details, completed, priority, category, \
                       due_date, subtasks, time_estimate, is_archived, recurrence";

/// The tasks table as originally deployed held only id/text/completed;
/// every later field arrived as an additive migration. Re-running the full
/// list is a no-op, the schema only ever grows.
const MIGRATIONS: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS tasks (
        id SERIAL PRIMARY KEY,
        text TEXT NOT NULL,
        completed BOOLEAN NOT NULL DEFAULT FALSE
    )",
    "ALTER TABLE tasks ADD COLUMN IF NOT EXISTS details TEXT NOT NULL DEFAULT ''",
    "ALTER TABLE tasks ADD COLUMN IF NOT EXISTS priority TEXT NOT NULL DEFAULT 'Low'",
    "ALTER TABLE tasks ADD COLUMN IF NOT EXISTS category TEXT NOT NULL DEFAULT 'Général'",
    "ALTER TABLE tasks ADD COLUMN IF NOT EXISTS due_date TEXT NOT NULL DEFAULT ''",
    "ALTER TABLE tasks ADD COLUMN IF NOT EXISTS subtasks JSONB NOT NULL DEFAULT '[]'",
    "ALTER TABLE tasks ADD COLUMN IF NOT EXISTS time_estimate INTEGER NOT NULL DEFAULT 0",
    "ALTER TABLE tasks ADD COLUMN IF NOT EXISTS is_archived BOOLEAN NOT NULL DEFAULT FALSE",
    "ALTER TABLE tasks ADD COLUMN IF NOT EXISTS recurrence TEXT",
];

/// PostgreSQL variant of the task store. Booleans are native and
/// `subtasks` lives in a JSONB column.
#[derive(Debug, Clone)]
pub struct PgTaskStore {
    pool: PgPool,
}

impl PgTaskStore {
    pub async fn new(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    /// Apply the additive schema migrations. Idempotent.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        for statement in MIGRATIONS {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }
}

fn row_to_task(row: &PgRow) -> Result<Task, StoreError> {
    let Json(subtasks): Json<Vec<Subtask>> = row.try_get("subtasks")?;
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
impl TaskStore for PgTaskStore {
    async fn list(&self) -> Result<Vec<Task>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM tasks ORDER BY id ASC"
        ))
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(row_to_task).collect()
    }

    async fn create(&self, task: NewTask) -> Result<Task, StoreError> {
        let row = sqlx::query(&format!(
            "INSERT INTO tasks \
             (text, details, completed, priority, category, due_date, \
              subtasks, time_estimate, is_archived, recurrence) \
             VALUES ($1, $2, FALSE, $3, $4, $5, $6, $7, FALSE, $8) \
             RETURNING {COLUMNS}"
        ))
        .bind(&task.text)
        .bind(&task.details)
        .bind(&task.priority)
        .bind(&task.category)
        .bind(&task.due_date)
        .bind(Json(&task.subtasks))
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
        let row = sqlx::query(&format!(
            "UPDATE tasks SET \
                text = COALESCE($1, text), \
                details = COALESCE($2, details), \
                completed = COALESCE($3, completed), \
                priority = COALESCE($4, priority), \
                category = COALESCE($5, category), \
                due_date = COALESCE($6, due_date), \
                subtasks = COALESCE($7, subtasks), \
                time_estimate = COALESCE($8, time_estimate), \
                is_archived = COALESCE($9, is_archived), \
                recurrence = COALESCE($10, recurrence) \
             WHERE id = $11 \
             RETURNING {COLUMNS}"
        ))
        .bind(&changes.text)
        .bind(&changes.details)
        .bind(changes.completed)
        .bind(&changes.priority)
        .bind(&changes.category)
        .bind(&changes.due_date)
        .bind(changes.subtasks.as_ref().map(Json))
        .bind(changes.time_estimate)
        .bind(changes.is_archived)
        .bind(&changes.recurrence)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(row_to_task).transpose()
    }

    async fn delete(&self, id: i32) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
