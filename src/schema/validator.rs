//! Schema validator
//!
//! Runs every validation pass to completion and aggregates all findings
//! into one diagnostic list, so a single fix-and-rerun cycle can address
//! many issues. Validation never stops at the first defect.
//!
//! Passes:
//! 1. Name uniqueness (entities in schema, fields in entity), case-insensitive
//! 2. Geometry cardinality (at most one geometry field per entity)
//! 3. SRID resolvability against the reference registry
//! 4. Label completeness (default locale present on every label set)
//! 5. Default-value type compatibility
//!
//! A schema with zero error-severity diagnostics becomes a
//! `ValidatedSchema`, the only input the generator accepts.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::schema::model::{Entity, Schema, IDENTITY_COLUMN};
use crate::types::SridRegistry;

/// Diagnostic severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Blocks validation
    Error,
    /// Reported but does not block
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
        }
    }
}

/// One validation finding, addressed by a dotted entity/field path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub path: String,
    pub message: String,
}

impl Diagnostic {
    fn error(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            path: path.into(),
            message: message.into(),
        }
    }

    fn warning(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.severity, self.path, self.message)
    }
}

/// A schema that has passed every validation pass.
///
/// Constructed only by `validate`; immutable by privacy. This is the
/// type-level guarantee that the generator never sees unvalidated input.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedSchema {
    schema: Schema,
    warnings: Vec<Diagnostic>,
}

impl ValidatedSchema {
    /// The underlying schema graph.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Warning-severity diagnostics that did not block validation.
    pub fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }
}

/// Validate a schema graph against the type-system and naming invariants.
///
/// All passes run to completion. The schema is rejected when any
/// error-severity diagnostic was produced; warnings alone do not reject
/// and ride along on the `ValidatedSchema`.
pub fn validate(
    schema: Schema,
    registry: &SridRegistry,
) -> Result<ValidatedSchema, Vec<Diagnostic>> {
    let mut diagnostics = Vec::new();

    check_entity_names(&schema, &mut diagnostics);
    for entity in &schema.entities {
        check_field_names(entity, &mut diagnostics);
        check_geometry_cardinality(entity, &mut diagnostics);
        check_srids(entity, registry, &mut diagnostics);
        check_labels(&schema, entity, &mut diagnostics);
        check_defaults(entity, &mut diagnostics);
    }

    if diagnostics.iter().any(|d| d.severity == Severity::Error) {
        Err(diagnostics)
    } else {
        Ok(ValidatedSchema {
            schema,
            warnings: diagnostics,
        })
    }
}

/// Pass 1a: entity names unique within the schema, case-insensitive.
fn check_entity_names(schema: &Schema, diagnostics: &mut Vec<Diagnostic>) {
    let mut seen: HashMap<String, &str> = HashMap::new();
    for entity in &schema.entities {
        let folded = entity.name.to_lowercase();
        if let Some(first) = seen.get(&folded) {
            diagnostics.push(Diagnostic::error(
                &entity.name,
                format!(
                    "entity name collides with '{}' (names are compared case-insensitively)",
                    first
                ),
            ));
        } else {
            seen.insert(folded, &entity.name);
        }
    }
}

/// Pass 1b: field names unique within the entity, case-insensitive; the
/// geometry column name and the reserved identity column count as taken.
fn check_field_names(entity: &Entity, diagnostics: &mut Vec<Diagnostic>) {
    let mut seen: HashMap<String, String> = HashMap::new();
    seen.insert(IDENTITY_COLUMN.to_string(), format!("reserved identity column '{}'", IDENTITY_COLUMN));
    for geometry in &entity.geometries {
        seen.entry(geometry.name.to_lowercase())
            .or_insert_with(|| format!("geometry column '{}'", geometry.name));
    }

    for field in &entity.fields {
        let folded = field.name.to_lowercase();
        let path = format!("{}.{}", entity.name, field.name);
        if let Some(taken_by) = seen.get(&folded) {
            diagnostics.push(Diagnostic::error(
                path,
                format!("field name collides with {}", taken_by),
            ));
        } else {
            seen.insert(folded, format!("field '{}'", field.name));
        }
    }
}

/// Pass 2: at most one geometry field per entity.
fn check_geometry_cardinality(entity: &Entity, diagnostics: &mut Vec<Diagnostic>) {
    for extra in entity.geometries.iter().skip(1) {
        diagnostics.push(Diagnostic::error(
            format!("{}.geometry", entity.name),
            format!(
                "entity declares more than one geometry field ('{}'); at most one is supported",
                extra.name
            ),
        ));
    }
}

/// Pass 3: every declared SRID resolves in the reference registry.
fn check_srids(entity: &Entity, registry: &SridRegistry, diagnostics: &mut Vec<Diagnostic>) {
    for geometry in &entity.geometries {
        if let Err(e) = registry.resolve(geometry.srid) {
            diagnostics.push(Diagnostic::error(
                format!("{}.geometry", entity.name),
                e.to_string(),
            ));
        }
    }
}

/// Pass 4: every label set includes the schema's default locale.
fn check_labels(schema: &Schema, entity: &Entity, diagnostics: &mut Vec<Diagnostic>) {
    let default = schema.default_locale.tag();
    if !entity.labels.has_default() {
        diagnostics.push(Diagnostic::error(
            &entity.name,
            format!("labels are missing the default locale '{}'", default),
        ));
    }
    for field in &entity.fields {
        if !field.labels.has_default() {
            diagnostics.push(Diagnostic::error(
                format!("{}.{}", entity.name, field.name),
                format!("labels are missing the default locale '{}'", default),
            ));
        }
    }
}

/// Pass 5: default values type-check against the declared field type.
fn check_defaults(entity: &Entity, diagnostics: &mut Vec<Diagnostic>) {
    for field in &entity.fields {
        let path = format!("{}.{}", entity.name, field.name);
        if let Some(default) = &field.default {
            if !field.ty.accepts_value(default) {
                diagnostics.push(Diagnostic::error(
                    path.clone(),
                    format!(
                        "default value {} is not assignable to type {}",
                        default, field.ty
                    ),
                ));
            }
        }
        // Backends exclude NULLs from unique indexes; flag the combination.
        if field.unique && field.nullable {
            diagnostics.push(Diagnostic::warning(
                path,
                "unique field is nullable; NULLs will not participate in the unique index",
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::parser::parse;

    fn registry() -> SridRegistry {
        SridRegistry::default()
    }

    fn validate_text(text: &str) -> Result<ValidatedSchema, Vec<Diagnostic>> {
        validate(parse(text).unwrap(), &registry())
    }

    const ROAD_SCHEMA: &str = r#"{
        "name": "transport",
        "defaultLocale": "en",
        "entities": [
            {
                "name": "Road",
                "labels": {"en": "Road"},
                "fields": [
                    {"name": "name", "type": "text", "labels": {"en": "Name"}},
                    {"name": "lanes", "type": "integer", "labels": {"en": "Lanes"}}
                ],
                "geometry": {"kind": "linestring", "dimension": 2, "srid": 4326}
            }
        ]
    }"#;

    #[test]
    fn test_road_schema_is_clean() {
        let validated = validate_text(ROAD_SCHEMA).unwrap();
        assert_eq!(validated.schema().entities.len(), 1);
    }

    #[test]
    fn test_unknown_srid_diagnostic() {
        let text = ROAD_SCHEMA.replace("4326", "999999");
        let diagnostics = validate_text(&text).unwrap_err();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].path, "Road.geometry");
        assert!(diagnostics[0].message.contains("unknown SRID 999999"));
    }

    #[test]
    fn test_case_insensitive_entity_collision() {
        let text = r#"{
            "name": "m", "defaultLocale": "en",
            "entities": [
                {"name": "Parcel", "labels": {"en": "Parcel"}, "fields": []},
                {"name": "parcel", "labels": {"en": "parcel"}, "fields": []}
            ]
        }"#;
        let diagnostics = validate_text(text).unwrap_err();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].path, "parcel");
        assert!(diagnostics[0].message.contains("case-insensitively"));
    }

    #[test]
    fn test_field_collision_with_geometry_column() {
        let text = r#"{
            "name": "m", "defaultLocale": "en",
            "entities": [{
                "name": "E", "labels": {"en": "E"},
                "fields": [{"name": "GEOM", "type": "text", "labels": {"en": "g"}}],
                "geometry": {"kind": "point", "srid": 4326}
            }]
        }"#;
        let diagnostics = validate_text(text).unwrap_err();
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains("geometry column"));
    }

    #[test]
    fn test_reserved_identity_column_flagged() {
        let text = r#"{
            "name": "m", "defaultLocale": "en",
            "entities": [{
                "name": "E", "labels": {"en": "E"},
                "fields": [{"name": "id", "type": "integer", "labels": {"en": "id"}}]
            }]
        }"#;
        let diagnostics = validate_text(text).unwrap_err();
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains("identity"));
    }

    #[test]
    fn test_multiple_geometries_rejected() {
        let text = r#"{
            "name": "m", "defaultLocale": "en",
            "entities": [{
                "name": "E", "labels": {"en": "E"}, "fields": [],
                "geometry": [
                    {"kind": "point", "srid": 4326},
                    {"name": "outline", "kind": "polygon", "srid": 4326}
                ]
            }]
        }"#;
        let diagnostics = validate_text(text).unwrap_err();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].path, "E.geometry");
        assert!(diagnostics[0].message.contains("more than one geometry"));
    }

    #[test]
    fn test_missing_default_locale_label() {
        let text = r#"{
            "name": "m", "defaultLocale": "en",
            "entities": [{
                "name": "E", "labels": {"fr": "É"},
                "fields": [{"name": "f", "type": "text", "labels": {"en": "f"}}]
            }]
        }"#;
        let diagnostics = validate_text(text).unwrap_err();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].path, "E");
        assert!(diagnostics[0].message.contains("default locale 'en'"));
    }

    #[test]
    fn test_default_value_mismatch() {
        let text = r#"{
            "name": "m", "defaultLocale": "en",
            "entities": [{
                "name": "E", "labels": {"en": "E"},
                "fields": [{"name": "lanes", "type": "integer", "default": 1.5,
                            "labels": {"en": "lanes"}}]
            }]
        }"#;
        let diagnostics = validate_text(text).unwrap_err();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].path, "E.lanes");
        assert!(diagnostics[0].message.contains("not assignable"));
    }

    #[test]
    fn test_three_independent_defects_yield_three_diagnostics() {
        let text = r#"{
            "name": "m", "defaultLocale": "en",
            "entities": [
                {"name": "Parcel", "labels": {"en": "Parcel"}, "fields": []},
                {"name": "parcel", "labels": {"en": "parcel"}, "fields": []},
                {"name": "Road", "labels": {"fr": "Route"}, "fields": [],
                 "geometry": {"kind": "linestring", "srid": 999999}}
            ]
        }"#;
        let diagnostics = validate_text(text).unwrap_err();
        assert_eq!(diagnostics.len(), 3);
        let paths: Vec<_> = diagnostics.iter().map(|d| d.path.as_str()).collect();
        assert!(paths.contains(&"parcel"));
        assert!(paths.contains(&"Road.geometry"));
        assert!(paths.contains(&"Road"));
    }

    #[test]
    fn test_unique_nullable_is_warning_only() {
        let text = r#"{
            "name": "m", "defaultLocale": "en",
            "entities": [{
                "name": "E", "labels": {"en": "E"},
                "fields": [{"name": "code", "type": "text", "unique": true,
                            "nullable": true, "labels": {"en": "code"}}]
            }]
        }"#;
        // Warnings alone do not reject the schema.
        let validated = validate_text(text).unwrap();
        assert_eq!(validated.warnings().len(), 1);
        assert_eq!(validated.warnings()[0].severity, Severity::Warning);
        assert_eq!(validated.warnings()[0].path, "E.code");
    }

    #[test]
    fn test_validation_is_deterministic() {
        let text = ROAD_SCHEMA.replace("4326", "999999");
        let first = validate_text(&text).unwrap_err();
        for _ in 0..10 {
            assert_eq!(validate_text(&text).unwrap_err(), first);
        }
    }
}
