//! The generated database model
//!
//! A backend-agnostic table/column/index representation. Owned by the
//! materializer for the duration of one apply operation; never cached
//! across schema versions.

use crate::types::{Dimension, GeometryKind};
use serde::Serialize;
use std::fmt;

/// Concrete column types the fixed scalar lookup table maps onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ColumnType {
    /// Synthetic auto-incrementing identity
    Identity,
    BigInt,
    DoublePrecision,
    Text,
    Boolean,
    TimestampTz,
    Geometry {
        kind: GeometryKind,
        dimension: Dimension,
        srid: u32,
    },
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identity => write!(f, "bigint generated always as identity"),
            Self::BigInt => write!(f, "bigint"),
            Self::DoublePrecision => write!(f, "double precision"),
            Self::Text => write!(f, "text"),
            Self::Boolean => write!(f, "boolean"),
            Self::TimestampTz => write!(f, "timestamptz"),
            Self::Geometry {
                kind,
                dimension,
                srid,
            } => {
                let z = match dimension {
                    Dimension::Two => "",
                    Dimension::Three => "Z",
                };
                write!(f, "geometry({}{},{})", kind.wkt_name(), z, srid)
            }
        }
    }
}

/// One concrete column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub name: String,
    pub ty: ColumnType,
    pub nullable: bool,
    /// Rendered SQL default literal, if any.
    pub default: Option<String>,
}

/// Index access methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum IndexKind {
    /// Spatial index for geometry columns
    Gist,
    /// Unique b-tree index
    UniqueBTree,
}

/// One index over a single column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Index {
    pub name: String,
    pub table: String,
    pub column: String,
    pub kind: IndexKind,
}

/// One concrete table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    pub name: String,
    /// Ordered: identity first, scalar columns in declaration order,
    /// geometry last. Downstream tooling may depend on this layout.
    pub columns: Vec<Column>,
    pub primary_key: String,
    pub indexes: Vec<Index>,
}

impl Table {
    /// The shape summary used for idempotence and conflict checks.
    pub fn signature(&self) -> TableSignature {
        TableSignature {
            columns: self
                .columns
                .iter()
                .map(|c| ColumnSignature {
                    name: c.name.clone(),
                    ty: c.ty.to_string(),
                    nullable: c.nullable,
                })
                .collect(),
            primary_key: self.primary_key.clone(),
            indexes: {
                let mut idx: Vec<_> = self
                    .indexes
                    .iter()
                    .map(|i| (i.column.clone(), i.kind))
                    .collect();
                idx.sort();
                idx
            },
        }
    }
}

/// Shape of one live column, as reported by backend introspection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSignature {
    pub name: String,
    pub ty: String,
    pub nullable: bool,
}

/// Shape of one live table. Two tables with equal signatures are
/// interchangeable for apply purposes (defaults and index names are not
/// part of the shape).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSignature {
    pub columns: Vec<ColumnSignature>,
    pub primary_key: String,
    pub indexes: Vec<(String, IndexKind)>,
}

/// The generated artifact: one table per entity, in entity order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatabaseModel {
    pub tables: Vec<Table>,
}

impl DatabaseModel {
    /// Look up a table by its normalized name.
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geometry_column_type_rendering() {
        let ty = ColumnType::Geometry {
            kind: GeometryKind::LineString,
            dimension: Dimension::Two,
            srid: 4326,
        };
        assert_eq!(ty.to_string(), "geometry(LineString,4326)");

        let ty3d = ColumnType::Geometry {
            kind: GeometryKind::Point,
            dimension: Dimension::Three,
            srid: 3857,
        };
        assert_eq!(ty3d.to_string(), "geometry(PointZ,3857)");
    }

    #[test]
    fn test_signature_ignores_index_order() {
        let table = |indexes: Vec<Index>| Table {
            name: "t".into(),
            columns: vec![],
            primary_key: "id".into(),
            indexes,
        };
        let gist = Index {
            name: "g".into(),
            table: "t".into(),
            column: "geom".into(),
            kind: IndexKind::Gist,
        };
        let unique = Index {
            name: "u".into(),
            table: "t".into(),
            column: "code".into(),
            kind: IndexKind::UniqueBTree,
        };
        let a = table(vec![gist.clone(), unique.clone()]);
        let b = table(vec![unique, gist]);
        assert_eq!(a.signature(), b.signature());
    }
}
