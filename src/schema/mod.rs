//! Schema subsystem for geomodel
//!
//! Raw definition text flows through here on its way to storage:
//! parser → unvalidated `Schema` graph → validator → `ValidatedSchema`.
//!
//! # Design Principles
//!
//! - Parsing is structural only; cross-entity invariants live in the validator
//! - Validation aggregates every defect in one run
//! - A `ValidatedSchema` is the only input the generator accepts
//! - Graphs are immutable once validated

mod errors;
mod model;
mod parser;
mod validator;

pub use errors::{SchemaError, SchemaResult};
pub use model::{
    Entity, Field, GeometryField, Revision, Schema, GEOMETRY_COLUMN, IDENTITY_COLUMN,
};
pub use parser::{parse, parse_file};
pub use validator::{validate, Diagnostic, Severity, ValidatedSchema};
