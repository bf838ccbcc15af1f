//! Schema definition parser
//!
//! Consumes a JSON schema document and builds the unvalidated schema graph.
//! Only structural decoding happens here: required keys, value shapes, and
//! type-token resolution. Cross-entity invariants belong to the validator.
//!
//! Parsing is pure and deterministic: the same text always yields a
//! structurally identical graph, with field order preserved from the
//! document.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde_json::{Map, Value};

use crate::i18n::{LabelSet, Locale};
use crate::schema::errors::{SchemaError, SchemaResult};
use crate::schema::model::{Entity, Field, GeometryField, Revision, Schema, GEOMETRY_COLUMN};
use crate::types::{Dimension, GeometryKind, ScalarType, DEFAULT_SRID};

/// Parse a schema definition document.
pub fn parse(text: &str) -> SchemaResult<Schema> {
    let root: Value = serde_json::from_str(text).map_err(|e| SchemaError::InvalidDocument {
        detail: e.to_string(),
    })?;
    let root = as_object(&root, "$")?;

    let name = require_str(root, "$", "name")?.to_string();
    let default_locale = parse_locale(require_str(root, "$", "defaultLocale")?, "$.defaultLocale")?;
    let default_srid = match root.get("defaultSrid") {
        Some(v) => as_srid(v, "$.defaultSrid")?,
        None => DEFAULT_SRID,
    };
    let revision = match root.get("revision") {
        Some(v) => Some(parse_revision(v)?),
        None => None,
    };

    let entities_value = root
        .get("entities")
        .ok_or_else(|| SchemaError::malformed("$", "missing required key 'entities'"))?;
    let entities_array = entities_value
        .as_array()
        .ok_or_else(|| SchemaError::malformed("$.entities", "expected an array"))?;

    let mut entities = Vec::with_capacity(entities_array.len());
    for (i, entity_value) in entities_array.iter().enumerate() {
        let location = format!("entities[{}]", i);
        entities.push(parse_entity(
            entity_value,
            &location,
            &default_locale,
            default_srid,
        )?);
    }

    Ok(Schema {
        name,
        default_locale,
        default_srid,
        revision,
        entities,
    })
}

/// Parse a schema definition from a file on disk.
pub fn parse_file(path: &Path) -> SchemaResult<Schema> {
    let text = fs::read_to_string(path).map_err(|e| SchemaError::Unreadable {
        path: path.display().to_string(),
        detail: e.to_string(),
    })?;
    parse(&text)
}

fn parse_entity(
    value: &Value,
    location: &str,
    default_locale: &Locale,
    default_srid: u32,
) -> SchemaResult<Entity> {
    let obj = as_object(value, location)?;
    let name = require_str(obj, location, "name")?.to_string();

    let labels = match obj.get("labels") {
        Some(v) => parse_labels(v, &format!("{}.labels", location), default_locale)?,
        None => LabelSet::new(default_locale.clone(), BTreeMap::new()),
    };

    let fields_value = obj
        .get("fields")
        .ok_or_else(|| SchemaError::malformed(location, "missing required key 'fields'"))?;
    let fields_array = fields_value
        .as_array()
        .ok_or_else(|| SchemaError::malformed(format!("{}.fields", location), "expected an array"))?;

    let mut fields = Vec::with_capacity(fields_array.len());
    for (i, field_value) in fields_array.iter().enumerate() {
        let field_location = format!("{}.fields[{}]", location, i);
        fields.push(parse_field(field_value, &field_location, default_locale)?);
    }

    // `geometry` may be a single descriptor or an array of them. More than
    // one is a validation-time failure, not a parse error, so all defects
    // surface in one diagnostics run.
    let geometries = match obj.get("geometry") {
        Some(Value::Array(items)) => {
            let mut out = Vec::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                out.push(parse_geometry(
                    item,
                    &format!("{}.geometry[{}]", location, i),
                    default_srid,
                )?);
            }
            out
        }
        Some(v) => vec![parse_geometry(
            v,
            &format!("{}.geometry", location),
            default_srid,
        )?],
        None => Vec::new(),
    };

    Ok(Entity {
        name,
        labels,
        fields,
        geometries,
    })
}

fn parse_field(value: &Value, location: &str, default_locale: &Locale) -> SchemaResult<Field> {
    let obj = as_object(value, location)?;
    let name = require_str(obj, location, "name")?.to_string();

    let token = require_str(obj, location, "type")?;
    let ty = ScalarType::resolve(token)
        .map_err(|e| SchemaError::malformed(format!("{}.type", location), e.to_string()))?;

    let nullable = optional_bool(obj, location, "nullable")?.unwrap_or(false);
    let unique = optional_bool(obj, location, "unique")?.unwrap_or(false);

    // A JSON null default means "no default", matching absence.
    let default = obj
        .get("default")
        .filter(|v| !v.is_null())
        .cloned();

    let labels = match obj.get("labels") {
        Some(v) => parse_labels(v, &format!("{}.labels", location), default_locale)?,
        None => LabelSet::new(default_locale.clone(), BTreeMap::new()),
    };

    Ok(Field {
        name,
        ty,
        nullable,
        unique,
        default,
        labels,
    })
}

fn parse_geometry(value: &Value, location: &str, default_srid: u32) -> SchemaResult<GeometryField> {
    let obj = as_object(value, location)?;

    let kind_token = require_str(obj, location, "kind")?;
    let kind = GeometryKind::resolve(kind_token)
        .map_err(|e| SchemaError::malformed(format!("{}.kind", location), e.to_string()))?;

    let dimension = match obj.get("dimension") {
        Some(v) => {
            let n = v.as_i64().ok_or_else(|| {
                SchemaError::malformed(format!("{}.dimension", location), "expected an integer")
            })?;
            Dimension::resolve(n).map_err(|e| {
                SchemaError::malformed(format!("{}.dimension", location), e.to_string())
            })?
        }
        None => Dimension::Two,
    };

    // SRID inheritance: explicit value, else the schema-wide default.
    let srid = match obj.get("srid") {
        Some(v) => as_srid(v, &format!("{}.srid", location))?,
        None => default_srid,
    };

    let name = match obj.get("name") {
        Some(v) => v
            .as_str()
            .ok_or_else(|| {
                SchemaError::malformed(format!("{}.name", location), "expected a string")
            })?
            .to_string(),
        None => GEOMETRY_COLUMN.to_string(),
    };

    Ok(GeometryField {
        name,
        kind,
        dimension,
        srid,
    })
}

fn parse_labels(
    value: &Value,
    location: &str,
    default_locale: &Locale,
) -> SchemaResult<LabelSet> {
    let obj = as_object(value, location)?;
    let mut labels = BTreeMap::new();
    for (tag, label_value) in obj {
        let locale = parse_locale(tag, &format!("{}.{}", location, tag))?;
        let label = label_value.as_str().ok_or_else(|| {
            SchemaError::malformed(format!("{}.{}", location, tag), "expected a string")
        })?;
        labels.insert(locale, label.to_string());
    }
    Ok(LabelSet::new(default_locale.clone(), labels))
}

fn parse_revision(value: &Value) -> SchemaResult<Revision> {
    let location = "$.revision";
    let obj = as_object(value, location)?;
    let sequence = obj
        .get("sequence")
        .and_then(Value::as_f64)
        .ok_or_else(|| SchemaError::malformed(format!("{}.sequence", location), "expected a number"))?;
    Ok(Revision {
        title: require_str(obj, location, "title")?.to_string(),
        sequence,
        author_name: require_str(obj, location, "authorName")?.to_string(),
        author_email: require_str(obj, location, "authorEmail")?.to_string(),
    })
}

fn parse_locale(tag: &str, location: &str) -> SchemaResult<Locale> {
    Locale::parse(tag).map_err(|e| SchemaError::malformed(location, e.to_string()))
}

fn as_object<'a>(value: &'a Value, location: &str) -> SchemaResult<&'a Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| SchemaError::malformed(location, "expected an object"))
}

fn as_srid(value: &Value, location: &str) -> SchemaResult<u32> {
    value
        .as_u64()
        .filter(|&n| n > 0 && n <= u64::from(u32::MAX))
        .map(|n| n as u32)
        .ok_or_else(|| SchemaError::malformed(location, "expected a positive integer SRID"))
}

fn require_str<'a>(
    obj: &'a Map<String, Value>,
    location: &str,
    key: &str,
) -> SchemaResult<&'a str> {
    let value = obj.get(key).ok_or_else(|| {
        SchemaError::malformed(location, format!("missing required key '{}'", key))
    })?;
    value.as_str().ok_or_else(|| {
        SchemaError::malformed(format!("{}.{}", location, key), "expected a string")
    })
}

fn optional_bool(
    obj: &Map<String, Value>,
    location: &str,
    key: &str,
) -> SchemaResult<Option<bool>> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => v.as_bool().map(Some).ok_or_else(|| {
            SchemaError::malformed(format!("{}.{}", location, key), "expected a boolean")
        }),
    }
}
