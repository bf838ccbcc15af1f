//! Definition backend seam
//!
//! The materializer drives storage through this trait only. A backend
//! executes definition statements inside an explicit transaction and can
//! report the shape of an existing table for idempotence and conflict
//! checks.

use crate::db::{Index, Table, TableSignature};
use crate::materialize::errors::BackendResult;

/// A storage backend capable of applying table definitions.
///
/// Implementations must make `rollback` discard everything since `begin`,
/// and `table_signature` must observe uncommitted work within the current
/// transaction (apply consults it before each create).
pub trait Backend {
    /// Open a transaction. Apply issues exactly one per call.
    fn begin(&mut self) -> BackendResult<()>;

    /// Commit the open transaction.
    fn commit(&mut self) -> BackendResult<()>;

    /// Roll back the open transaction.
    fn rollback(&mut self) -> BackendResult<()>;

    /// Create a table with its columns and primary key.
    fn create_table(&mut self, table: &Table) -> BackendResult<()>;

    /// Create one index (the `Index` names its table).
    fn create_index(&mut self, index: &Index) -> BackendResult<()>;

    /// Report the shape of an existing table, or `None` when absent.
    fn table_signature(&mut self, name: &str) -> BackendResult<Option<TableSignature>>;
}
