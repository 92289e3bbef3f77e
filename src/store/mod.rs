mod postgres;
mod sqlite;

pub use postgres::PgTaskStore;
pub use sqlite::SqliteTaskStore;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::{info, warn};

use crate::config::{Config, DbEngine};
use crate::error::StoreError;
use crate::models::{NewTask, Task, UpdateTaskRequest};

/// Storage backend for tasks. Both SQL variants implement the same
/// contract and the handlers never see which engine is behind it.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// All tasks, ascending id.
    async fn list(&self) -> Result<Vec<Task>, StoreError>;

    /// Insert with defaults already applied; `completed` and `is_archived`
    /// always start false. Returns the row with its server-assigned id.
    async fn create(&self, task: NewTask) -> Result<Task, StoreError>;

    /// Field-level merge: absent fields keep their stored value. `None`
    /// when no row has the given id.
    async fn update(
        &self,
        id: i32,
        changes: UpdateTaskRequest,
    ) -> Result<Option<Task>, StoreError>;

    /// Unconditional delete, a no-op when the id does not exist.
    async fn delete(&self, id: i32) -> Result<(), StoreError>;
}

const CONNECT_ATTEMPTS: u32 = 10;
const CONNECT_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Connect to the configured engine and bring the tasks schema up to date,
/// before the server accepts any traffic. Unreachable stores are retried on
/// a fixed delay; exhausting the budget is a fatal startup failure and the
/// caller is expected to exit.
pub async fn init(config: &Config) -> Result<Arc<dyn TaskStore>, StoreError> {
    let mut attempt = 1;
    loop {
        match try_init(config).await {
            Ok(store) => {
                info!("Database ready ({})", config.engine);
                return Ok(store);
            }
            Err(e) if attempt < CONNECT_ATTEMPTS => {
                warn!(
                    "Database not ready (attempt {}/{}): {}. Retrying in {}s",
                    attempt,
                    CONNECT_ATTEMPTS,
                    e,
                    CONNECT_RETRY_DELAY.as_secs()
                );
                tokio::time::sleep(CONNECT_RETRY_DELAY).await;
                attempt += 1;
            }
            Err(e) => return Err(StoreError::Unavailable(e.to_string())),
        }
    }
}

async fn try_init(config: &Config) -> Result<Arc<dyn TaskStore>, StoreError> {
    match config.engine {
        DbEngine::Postgres => {
            let store = PgTaskStore::new(&config.postgres_url()).await?;
            store.migrate().await?;
            Ok(Arc::new(store))
        }
        DbEngine::Sqlite => {
            let store = SqliteTaskStore::new(&config.sqlite_path).await?;
            store.migrate().await?;
            Ok(Arc::new(store))
        }
    }
}
