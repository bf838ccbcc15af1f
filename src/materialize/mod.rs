//! Materializer subsystem
//!
//! Applies a generated database model to a storage backend:
//! - one transaction per apply, commit or rollback on every exit path
//! - idempotent re-apply via live table-shape introspection
//! - shape conflicts fail instead of altering live structure
//! - no automatic retries; retry policy belongs to the caller

mod apply;
mod backend;
mod errors;
mod memory;
mod sql;

pub use apply::{apply, AppliedResult, ApplyOptions};
pub use backend::Backend;
pub use errors::{ApplyError, BackendError, BackendResult};
pub use memory::MemoryBackend;
pub use sql::{render_create_index, render_create_table, render_model};
