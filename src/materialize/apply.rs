//! Transactional apply
//!
//! Applies a database model to a backend as one atomic unit: the whole
//! model lands or none of it does. Every exit path releases the
//! transaction — commit on success, rollback on any failure, including a
//! caller-supplied timeout.
//!
//! Re-applying an unchanged model is a no-op: tables whose live signature
//! matches the model are skipped. A table that exists with a different
//! shape is a conflict; apply never alters live structure.

use std::time::{Duration, Instant};

use crate::db::DatabaseModel;
use crate::materialize::backend::Backend;
use crate::materialize::errors::ApplyError;

/// Caller-controlled apply behavior.
#[derive(Debug, Clone, Default)]
pub struct ApplyOptions {
    /// Abort (and roll back) once this much wall time has elapsed.
    /// Checked between statements; a statement in flight runs to completion.
    pub timeout: Option<Duration>,
}

/// Outcome of one apply operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedResult {
    /// Tables created by this apply, in model order.
    pub created: Vec<String>,
    /// Tables that already existed with a matching shape and were skipped.
    pub confirmed: Vec<String>,
}

/// Apply a database model inside a single transaction.
pub fn apply<B: Backend>(
    model: &DatabaseModel,
    backend: &mut B,
    options: &ApplyOptions,
) -> Result<AppliedResult, ApplyError> {
    backend.begin()?;
    match run(model, backend, options) {
        Ok(result) => {
            backend.commit()?;
            Ok(result)
        }
        Err(e) => {
            // Rollback must not mask the original failure.
            let _ = backend.rollback();
            Err(e)
        }
    }
}

fn run<B: Backend>(
    model: &DatabaseModel,
    backend: &mut B,
    options: &ApplyOptions,
) -> Result<AppliedResult, ApplyError> {
    let started = Instant::now();
    let mut result = AppliedResult {
        created: Vec::new(),
        confirmed: Vec::new(),
    };

    for table in &model.tables {
        check_deadline(started, options)?;

        match backend.table_signature(&table.name)? {
            Some(live) => {
                if live == table.signature() {
                    result.confirmed.push(table.name.clone());
                    continue;
                }
                return Err(ApplyError::SchemaConflict {
                    table: table.name.clone(),
                    detail: describe_mismatch(&live, &table.signature()),
                });
            }
            None => {
                backend.create_table(table)?;
                for index in &table.indexes {
                    check_deadline(started, options)?;
                    backend.create_index(index)?;
                }
                result.created.push(table.name.clone());
            }
        }
    }

    Ok(result)
}

fn check_deadline(started: Instant, options: &ApplyOptions) -> Result<(), ApplyError> {
    if let Some(timeout) = options.timeout {
        let elapsed = started.elapsed();
        if elapsed >= timeout {
            return Err(ApplyError::Timeout { elapsed });
        }
    }
    Ok(())
}

fn describe_mismatch(
    live: &crate::db::TableSignature,
    expected: &crate::db::TableSignature,
) -> String {
    if live.columns.len() != expected.columns.len() {
        return format!(
            "live table has {} columns, model expects {}",
            live.columns.len(),
            expected.columns.len()
        );
    }
    for (l, e) in live.columns.iter().zip(&expected.columns) {
        if l != e {
            return format!(
                "column '{}' is '{}' (nullable: {}), model expects '{}' as '{}' (nullable: {})",
                l.name, l.ty, l.nullable, e.name, e.ty, e.nullable
            );
        }
    }
    if live.primary_key != expected.primary_key {
        return format!(
            "primary key is '{}', model expects '{}'",
            live.primary_key, expected.primary_key
        );
    }
    "index set differs".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::generate;
    use crate::materialize::memory::MemoryBackend;
    use crate::schema::{parse, validate};
    use crate::types::SridRegistry;

    fn road_model() -> DatabaseModel {
        let text = r#"{
            "name": "transport", "defaultLocale": "en",
            "entities": [{
                "name": "Road", "labels": {"en": "Road"},
                "fields": [
                    {"name": "name", "type": "text", "labels": {"en": "Name"}},
                    {"name": "lanes", "type": "integer", "labels": {"en": "Lanes"}}
                ],
                "geometry": {"kind": "linestring", "dimension": 2, "srid": 4326}
            }]
        }"#;
        let validated = validate(parse(text).unwrap(), &SridRegistry::default()).unwrap();
        generate(&validated)
    }

    #[test]
    fn test_apply_creates_tables_and_indexes() {
        let model = road_model();
        let mut backend = MemoryBackend::new();
        let result = apply(&model, &mut backend, &ApplyOptions::default()).unwrap();
        assert_eq!(result.created, ["road"]);
        assert!(result.confirmed.is_empty());
        assert_eq!(backend.table_names(), ["road"]);
        assert_eq!(backend.script().len(), 2);
    }

    #[test]
    fn test_second_apply_is_noop() {
        let model = road_model();
        let mut backend = MemoryBackend::new();
        apply(&model, &mut backend, &ApplyOptions::default()).unwrap();
        let second = apply(&model, &mut backend, &ApplyOptions::default()).unwrap();
        assert!(second.created.is_empty());
        assert_eq!(second.confirmed, ["road"]);
        // No duplicate objects.
        assert_eq!(backend.script().len(), 2);
    }

    #[test]
    fn test_conflicting_shape_rejected() {
        let model = road_model();
        let mut backend = MemoryBackend::new();
        apply(&model, &mut backend, &ApplyOptions::default()).unwrap();

        let mut altered = model.clone();
        altered.tables[0].columns[1].nullable = true;
        let err = apply(&altered, &mut backend, &ApplyOptions::default()).unwrap_err();
        assert!(matches!(err, ApplyError::SchemaConflict { ref table, .. } if table == "road"));
        // Live structure untouched.
        assert_eq!(backend.table_names(), ["road"]);
    }

    #[test]
    fn test_partial_failure_rolls_back_everything() {
        let model = road_model();
        let mut backend = MemoryBackend::new();
        // Fail on the index statement, after the table was created.
        backend.fail_after_statements(2);
        let err = apply(&model, &mut backend, &ApplyOptions::default()).unwrap_err();
        assert!(matches!(err, ApplyError::Backend(_)));
        assert!(backend.table_names().is_empty());
        assert!(backend.script().is_empty());
    }

    #[test]
    fn test_zero_timeout_rolls_back() {
        let model = road_model();
        let mut backend = MemoryBackend::new();
        let options = ApplyOptions {
            timeout: Some(Duration::ZERO),
        };
        let err = apply(&model, &mut backend, &options).unwrap_err();
        assert!(matches!(err, ApplyError::Timeout { .. }));
        assert!(backend.table_names().is_empty());
    }

    #[test]
    fn test_round_trip_signature_equality() {
        let model = road_model();
        let mut backend = MemoryBackend::new();
        apply(&model, &mut backend, &ApplyOptions::default()).unwrap();

        // Introspecting the backend yields exactly the model's shape.
        backend.begin().unwrap();
        let live = backend.table_signature("road").unwrap().unwrap();
        backend.commit().unwrap();
        assert_eq!(live, model.tables[0].signature());
    }
}
