use thiserror::Error;

/// Failures surfaced by the task store.
///
/// `Database` carries the underlying engine message verbatim; handlers put
/// it straight into the 500 response body. A missing row on update is not
/// an error, the store signals it with `Option::None`.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    Database(String),

    /// The store could not be reached or initialized at startup.
    #[error("database unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::Database(e.to_string())
    }
}
