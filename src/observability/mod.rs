//! Observability for geomodel
//!
//! The core pipeline is pure and returns diagnostics/results; logging is an
//! explicit, caller-side concern. The CLI is the only in-tree consumer.

mod logger;

pub use logger::{Logger, Severity};
