//! geomodel - a strict, deterministic geospatial schema-modeling engine
//!
//! Pipeline: raw definition → parse → `Schema` → validate →
//! `ValidatedSchema` → generate → `DatabaseModel` → apply → backend.

pub mod cli;
pub mod db;
pub mod i18n;
pub mod materialize;
pub mod observability;
pub mod schema;
pub mod types;
