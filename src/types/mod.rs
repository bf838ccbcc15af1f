//! Type system for geomodel
//!
//! A closed set of scalar and geometry types with strict compatibility
//! rules:
//! - Type tags must match exactly for default-value assignment
//! - No implicit widening (Integer never coerces to Float)
//! - Geometry types additionally require identical kind, dimension and SRID
//!
//! Type tokens are resolved once, at parse time. Nothing downstream ever
//! re-interprets a token.

mod srid;

pub use srid::{SridRegistry, DEFAULT_SRID};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Result type for type-system resolution
pub type TypeResult<T> = Result<T, TypeError>;

/// Type resolution and compatibility errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    /// Declared type token does not name a known type
    #[error("unknown type token '{token}'")]
    UnknownType { token: String },

    /// Declared geometry kind token does not name a known kind
    #[error("unknown geometry kind '{token}'")]
    UnknownGeometryKind { token: String },

    /// Dimension outside the supported 2D/3D range
    #[error("unsupported dimension {dimension} (expected 2 or 3)")]
    UnsupportedDimension { dimension: i64 },

    /// SRID is not present in the reference registry
    #[error("unknown SRID {srid}: not present in the reference registry")]
    UnknownSrid { srid: u32 },
}

/// Supported scalar types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarType {
    /// 64-bit signed integer
    Integer,
    /// 64-bit floating point
    Float,
    /// UTF-8 text
    Text,
    /// Boolean
    Boolean,
    /// Timezone-aware moment in time
    DateTime,
}

impl ScalarType {
    /// Resolve a declared type token into a scalar type.
    ///
    /// Accepts the canonical token plus the common aliases the schema
    /// format allows (`int`, `string`, `bool`, `timestamp`).
    pub fn resolve(token: &str) -> TypeResult<Self> {
        match token.to_ascii_lowercase().as_str() {
            "integer" | "int" => Ok(Self::Integer),
            "float" | "double" => Ok(Self::Float),
            "text" | "string" => Ok(Self::Text),
            "boolean" | "bool" => Ok(Self::Boolean),
            "datetime" | "timestamp" => Ok(Self::DateTime),
            _ => Err(TypeError::UnknownType {
                token: token.to_string(),
            }),
        }
    }

    /// Returns the canonical token for error messages
    pub fn token(&self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Text => "text",
            Self::Boolean => "boolean",
            Self::DateTime => "datetime",
        }
    }

    /// Check whether a JSON default value matches this type exactly.
    ///
    /// Strict by design: an integral JSON number is not accepted for
    /// Float's sake only — Float takes any number, Integer takes only
    /// integral numbers, and nothing else cross-assigns.
    pub fn accepts_value(&self, value: &Value) -> bool {
        match self {
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::Float => value.is_number(),
            Self::Text => value.is_string(),
            Self::Boolean => value.is_boolean(),
            Self::DateTime => value
                .as_str()
                .is_some_and(|s| chrono::DateTime::parse_from_rfc3339(s).is_ok()),
        }
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

/// Supported geometry kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeometryKind {
    Point,
    LineString,
    Polygon,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
}

impl GeometryKind {
    /// Resolve a declared geometry kind token.
    pub fn resolve(token: &str) -> TypeResult<Self> {
        match token.to_ascii_lowercase().as_str() {
            "point" => Ok(Self::Point),
            "linestring" | "polyline" => Ok(Self::LineString),
            "polygon" => Ok(Self::Polygon),
            "multipoint" => Ok(Self::MultiPoint),
            "multilinestring" => Ok(Self::MultiLineString),
            "multipolygon" => Ok(Self::MultiPolygon),
            _ => Err(TypeError::UnknownGeometryKind {
                token: token.to_string(),
            }),
        }
    }

    /// Returns the canonical WKT-style name
    pub fn wkt_name(&self) -> &'static str {
        match self {
            Self::Point => "Point",
            Self::LineString => "LineString",
            Self::Polygon => "Polygon",
            Self::MultiPoint => "MultiPoint",
            Self::MultiLineString => "MultiLineString",
            Self::MultiPolygon => "MultiPolygon",
        }
    }
}

impl fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.wkt_name())
    }
}

/// Coordinate dimensionality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Dimension {
    /// X/Y
    Two,
    /// X/Y/Z
    Three,
}

impl Dimension {
    /// Resolve a declared dimension number (2 or 3).
    pub fn resolve(dimension: i64) -> TypeResult<Self> {
        match dimension {
            2 => Ok(Self::Two),
            3 => Ok(Self::Three),
            other => Err(TypeError::UnsupportedDimension { dimension: other }),
        }
    }

    /// Returns the coordinate count
    pub fn coordinates(&self) -> u8 {
        match self {
            Self::Two => 2,
            Self::Three => 3,
        }
    }
}

/// A canonical, value-comparable type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Type {
    /// Scalar attribute type
    Scalar(ScalarType),
    /// Spatial attribute type with full coordinate-reference identity
    Geometry {
        kind: GeometryKind,
        dimension: Dimension,
        srid: u32,
    },
}

impl Type {
    /// Exact-match compatibility for default-value assignment.
    ///
    /// Scalars are compatible iff their tags are equal; geometries iff
    /// kind, dimension and SRID are all equal. There is no widening.
    pub fn compatible_with(&self, other: &Type) -> bool {
        self == other
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(s) => write!(f, "{}", s),
            Self::Geometry {
                kind,
                dimension,
                srid,
            } => write!(f, "{}({}d, srid={})", kind, dimension.coordinates(), srid),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalar_token_resolution() {
        assert_eq!(ScalarType::resolve("integer").unwrap(), ScalarType::Integer);
        assert_eq!(ScalarType::resolve("INT").unwrap(), ScalarType::Integer);
        assert_eq!(ScalarType::resolve("string").unwrap(), ScalarType::Text);
        assert_eq!(ScalarType::resolve("timestamp").unwrap(), ScalarType::DateTime);
    }

    #[test]
    fn test_unknown_token_fails() {
        let err = ScalarType::resolve("geography").unwrap_err();
        assert_eq!(
            err,
            TypeError::UnknownType {
                token: "geography".into()
            }
        );
    }

    #[test]
    fn test_geometry_kind_resolution() {
        assert_eq!(
            GeometryKind::resolve("linestring").unwrap(),
            GeometryKind::LineString
        );
        // Legacy alias from older model documents
        assert_eq!(
            GeometryKind::resolve("polyline").unwrap(),
            GeometryKind::LineString
        );
        assert!(GeometryKind::resolve("circle").is_err());
    }

    #[test]
    fn test_dimension_resolution() {
        assert_eq!(Dimension::resolve(2).unwrap(), Dimension::Two);
        assert_eq!(Dimension::resolve(3).unwrap(), Dimension::Three);
        assert!(Dimension::resolve(4).is_err());
        assert!(Dimension::resolve(0).is_err());
    }

    #[test]
    fn test_no_integer_to_float_widening() {
        let int = Type::Scalar(ScalarType::Integer);
        let float = Type::Scalar(ScalarType::Float);
        assert!(!int.compatible_with(&float));
        assert!(!float.compatible_with(&int));
        assert!(int.compatible_with(&int));
    }

    #[test]
    fn test_geometry_compatibility_requires_full_identity() {
        let a = Type::Geometry {
            kind: GeometryKind::Point,
            dimension: Dimension::Two,
            srid: 4326,
        };
        let b = Type::Geometry {
            kind: GeometryKind::Point,
            dimension: Dimension::Two,
            srid: 3857,
        };
        assert!(!a.compatible_with(&b));
        assert!(a.compatible_with(&a.clone()));
    }

    #[test]
    fn test_default_value_checking_is_strict() {
        assert!(ScalarType::Integer.accepts_value(&json!(42)));
        assert!(!ScalarType::Integer.accepts_value(&json!(42.5)));
        assert!(ScalarType::Float.accepts_value(&json!(42)));
        assert!(ScalarType::Float.accepts_value(&json!(42.5)));
        assert!(!ScalarType::Text.accepts_value(&json!(42)));
        assert!(ScalarType::Boolean.accepts_value(&json!(true)));
        assert!(ScalarType::DateTime.accepts_value(&json!("2017-05-01T12:00:00Z")));
        assert!(!ScalarType::DateTime.accepts_value(&json!("yesterday")));
    }
}
