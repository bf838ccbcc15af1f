//! PostGIS DDL rendering
//!
//! Renders the backend-agnostic model into PostgreSQL/PostGIS definition
//! statements. Identifiers are already normalized by the generator, so they
//! are emitted bare.

use crate::db::{DatabaseModel, Index, IndexKind, Table};
use std::fmt::Write;

/// Render the CREATE TABLE statement for one table.
pub fn render_create_table(table: &Table) -> String {
    let mut sql = String::with_capacity(256);
    let _ = writeln!(sql, "CREATE TABLE {} (", table.name);
    for column in &table.columns {
        let _ = write!(sql, "    {} {}", column.name, column.ty);
        if !column.nullable {
            sql.push_str(" NOT NULL");
        }
        if let Some(default) = &column.default {
            let _ = write!(sql, " DEFAULT {}", default);
        }
        sql.push_str(",\n");
    }
    let _ = writeln!(sql, "    PRIMARY KEY ({})", table.primary_key);
    sql.push(')');
    sql
}

/// Render the CREATE INDEX statement for one index.
pub fn render_create_index(index: &Index) -> String {
    match index.kind {
        IndexKind::Gist => format!(
            "CREATE INDEX {} ON {} USING GIST ({})",
            index.name, index.table, index.column
        ),
        IndexKind::UniqueBTree => format!(
            "CREATE UNIQUE INDEX {} ON {} ({})",
            index.name, index.table, index.column
        ),
    }
}

/// Render the full definition script for a model, table by table.
pub fn render_model(model: &DatabaseModel) -> Vec<String> {
    let mut statements = Vec::new();
    for table in &model.tables {
        statements.push(render_create_table(table));
        for index in &table.indexes {
            statements.push(render_create_index(index));
        }
    }
    statements
}
