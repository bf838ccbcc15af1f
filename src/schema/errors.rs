//! Schema parse-time error types
//!
//! Parse errors are fatal to the call: no partial schema graph is ever
//! returned. Each structural error carries a dotted location path into the
//! source document so diagnostics are actionable.

use thiserror::Error;

/// Result type for schema parsing
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Structural schema-definition errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// The definition document violates the expected structure
    #[error("malformed schema at {location}: {detail}")]
    Malformed { location: String, detail: String },

    /// The definition document is not parseable JSON
    #[error("invalid schema document: {detail}")]
    InvalidDocument { detail: String },

    /// The definition file could not be read
    #[error("cannot read schema file '{path}': {detail}")]
    Unreadable { path: String, detail: String },
}

impl SchemaError {
    /// Structural error at a dotted document path.
    pub fn malformed(location: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Malformed {
            location: location.into(),
            detail: detail.into(),
        }
    }

    /// Returns the document location for malformed-structure errors.
    pub fn location(&self) -> Option<&str> {
        match self {
            Self::Malformed { location, .. } => Some(location),
            _ => None,
        }
    }
}
