//! The in-memory schema graph
//!
//! A `Schema` is built once per parse and is immutable after validation
//! succeeds. Field order is preserved from the source document because it
//! drives column order downstream.

use crate::i18n::{LabelSet, Locale};
use crate::types::{Dimension, GeometryKind, ScalarType, Type};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Default name for the generated geometry column
pub const GEOMETRY_COLUMN: &str = "geom";

/// Name of the synthetic identity column every table receives
pub const IDENTITY_COLUMN: &str = "id";

/// Revision metadata carried on a schema document.
///
/// Informational only: surfaced by tooling, never materialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Revision {
    pub title: String,
    pub sequence: f64,
    pub author_name: String,
    pub author_email: String,
}

/// A named collection of entities plus schema-wide policy.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    pub name: String,
    pub default_locale: Locale,
    pub default_srid: u32,
    pub revision: Option<Revision>,
    pub entities: Vec<Entity>,
}

impl Schema {
    /// Look up an entity by exact name.
    pub fn entity(&self, name: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.name == name)
    }
}

/// One feature class, mapping to one storage table.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub name: String,
    pub labels: LabelSet,
    /// Ordered scalar fields; order is semantically significant.
    pub fields: Vec<Field>,
    /// Geometry fields as declared. At most one survives validation;
    /// the parser keeps whatever the document says so the validator can
    /// report the cardinality violation itself.
    pub geometries: Vec<GeometryField>,
}

impl Entity {
    /// Look up a field by exact name.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// The entity's single geometry field, if any.
    pub fn geometry(&self) -> Option<&GeometryField> {
        self.geometries.first()
    }
}

/// A scalar attribute of an entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub ty: ScalarType,
    pub nullable: bool,
    pub unique: bool,
    /// Declared default value; must type-check against `ty`.
    pub default: Option<Value>,
    pub labels: LabelSet,
}

impl Field {
    /// The canonical type of this field.
    pub fn declared_type(&self) -> Type {
        Type::Scalar(self.ty)
    }
}

/// The spatial attribute of an entity.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryField {
    pub name: String,
    pub kind: GeometryKind,
    pub dimension: Dimension,
    pub srid: u32,
}

impl GeometryField {
    /// The canonical type of this geometry field.
    pub fn declared_type(&self) -> Type {
        Type::Geometry {
            kind: self.kind,
            dimension: self.dimension,
            srid: self.srid,
        }
    }
}
