//! CLI-specific error types

use std::fmt;

/// CLI error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Schema definition could not be parsed
    SchemaError,
    /// Validation produced error-severity diagnostics
    ValidationFailed,
    /// Apply against the backend failed
    ApplyFailed,
    /// Bad command-line input
    UsageError,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::SchemaError => "GEO_CLI_SCHEMA_ERROR",
            Self::ValidationFailed => "GEO_CLI_VALIDATION_FAILED",
            Self::ApplyFailed => "GEO_CLI_APPLY_FAILED",
            Self::UsageError => "GEO_CLI_USAGE_ERROR",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn schema_error(msg: impl fmt::Display) -> Self {
        Self::new(CliErrorCode::SchemaError, msg.to_string())
    }

    pub fn validation_failed(error_count: usize) -> Self {
        Self::new(
            CliErrorCode::ValidationFailed,
            format!("validation failed with {} error(s)", error_count),
        )
    }

    pub fn apply_failed(msg: impl fmt::Display) -> Self {
        Self::new(CliErrorCode::ApplyFailed, msg.to_string())
    }

    pub fn usage_error(msg: impl fmt::Display) -> Self {
        Self::new(CliErrorCode::UsageError, msg.to_string())
    }

    pub fn code(&self) -> CliErrorCode {
        self.code
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;
