//! Database model subsystem
//!
//! Turns a validated schema into the concrete table model a backend can
//! apply: identifier-normalized names, a fixed column layout, and scheduled
//! indexes.

mod generator;
mod ident;
mod model;

pub use generator::generate;
pub use ident::{normalize, IdentAllocator, MAX_IDENTIFIER_LEN};
pub use model::{
    Column, ColumnSignature, ColumnType, DatabaseModel, Index, IndexKind, Table, TableSignature,
};
