//! Typed classification of storage failures.

use thiserror::Error;

/// Errors surfaced by the storage layer.
///
/// Callers match on the variant instead of inspecting driver error codes.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A unique index rejected the write.
    #[error("unique constraint violated: {message}")]
    Constraint { message: String },

    /// The database could not be opened or the pool is unusable.
    #[error("database connection failed: {0}")]
    Connection(#[source] sqlx::Error),

    /// Any other failure while executing a statement.
    #[error("database query failed: {0}")]
    Query(#[source] sqlx::Error),
}

impl StoreError {
    pub fn is_constraint(&self) -> bool {
        matches!(self, StoreError::Constraint { .. })
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                StoreError::Constraint {
                    message: db_err.message().to_string(),
                }
            }
            sqlx::Error::Io(_)
            | sqlx::Error::Configuration(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => StoreError::Connection(err),
            _ => StoreError::Query(err),
        }
    }
}
