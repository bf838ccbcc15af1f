//! Materializer error types
//!
//! Apply errors always follow a rollback: the backend is never left in a
//! partially-applied state. Nothing here is retried automatically; retry
//! policy belongs to the caller.

use std::time::Duration;
use thiserror::Error;

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Errors raised by a definition backend
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// Transaction control (begin/commit/rollback) failed
    #[error("transaction failure: {0}")]
    Transaction(String),

    /// A definition statement failed to execute
    #[error("statement execution failed: {0}")]
    Execution(String),

    /// The backend could not report a table's shape
    #[error("introspection failed: {0}")]
    Introspection(String),
}

/// Errors raised by `apply`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApplyError {
    /// A table already exists with a shape the model does not match
    #[error("table '{table}' already exists with an incompatible shape: {detail}")]
    SchemaConflict { table: String, detail: String },

    /// The caller-supplied timeout elapsed; the transaction was rolled back
    #[error("apply timed out after {elapsed:?}")]
    Timeout { elapsed: Duration },

    /// The backend failed; the transaction was rolled back
    #[error(transparent)]
    Backend(#[from] BackendError),
}
