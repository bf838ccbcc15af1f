//! Database model generator
//!
//! Maps a validated schema to the concrete table model. Total and
//! deterministic: given a `ValidatedSchema` it cannot fail, and generating
//! twice yields an identical model.
//!
//! Fixed column layout contract:
//! - synthetic identity primary key first
//! - scalar columns in field declaration order
//! - geometry column (if any) last, with a scheduled GIST index

use serde_json::Value;

use crate::db::ident::IdentAllocator;
use crate::db::model::{Column, ColumnType, DatabaseModel, Index, IndexKind, Table};
use crate::schema::{Entity, Field, ValidatedSchema, IDENTITY_COLUMN};
use crate::types::ScalarType;

/// Generate the database model for a validated schema.
pub fn generate(validated: &ValidatedSchema) -> DatabaseModel {
    let schema = validated.schema();
    let mut table_names = IdentAllocator::new();
    let tables = schema
        .entities
        .iter()
        .map(|entity| generate_table(entity, &mut table_names))
        .collect();
    DatabaseModel { tables }
}

fn generate_table(entity: &Entity, table_names: &mut IdentAllocator) -> Table {
    let table_name = table_names.allocate(&entity.name);
    let mut column_names = IdentAllocator::new();

    let identity = column_names.allocate(IDENTITY_COLUMN);
    let mut columns = vec![Column {
        name: identity.clone(),
        ty: ColumnType::Identity,
        nullable: false,
        default: None,
    }];

    let mut indexes = Vec::new();
    for field in &entity.fields {
        let name = column_names.allocate(&field.name);
        if field.unique {
            indexes.push(Index {
                name: format!("idx_{}_{}_unique", table_name, name),
                table: table_name.clone(),
                column: name.clone(),
                kind: IndexKind::UniqueBTree,
            });
        }
        columns.push(Column {
            name,
            ty: column_type(field.ty),
            nullable: field.nullable,
            default: field.default.as_ref().map(|v| render_default(field, v)),
        });
    }

    if let Some(geometry) = entity.geometry() {
        let name = column_names.allocate(&geometry.name);
        indexes.push(Index {
            name: format!("idx_{}_{}_gist", table_name, name),
            table: table_name.clone(),
            column: name.clone(),
            kind: IndexKind::Gist,
        });
        columns.push(Column {
            name,
            ty: ColumnType::Geometry {
                kind: geometry.kind,
                dimension: geometry.dimension,
                srid: geometry.srid,
            },
            nullable: true,
            default: None,
        });
    }

    Table {
        name: table_name,
        columns,
        primary_key: identity,
        indexes,
    }
}

/// The fixed scalar lookup table.
fn column_type(ty: ScalarType) -> ColumnType {
    match ty {
        ScalarType::Integer => ColumnType::BigInt,
        ScalarType::Float => ColumnType::DoublePrecision,
        ScalarType::Text => ColumnType::Text,
        ScalarType::Boolean => ColumnType::Boolean,
        ScalarType::DateTime => ColumnType::TimestampTz,
    }
}

/// Render a (already type-checked) default value as a SQL literal.
fn render_default(field: &Field, value: &Value) -> String {
    match (field.ty, value) {
        (ScalarType::Text | ScalarType::DateTime, Value::String(s)) => {
            format!("'{}'", s.replace('\'', "''"))
        }
        _ => value.to_string(),
    }
}
