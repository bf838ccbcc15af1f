//! CLI command implementations
//!
//! Thin consumers of the three core interfaces: parse, validate, apply.
//! All engine logic stays in the library; commands only render results.

use std::path::Path;

use crate::db::generate;
use crate::i18n::Locale;
use crate::materialize::{apply, render_model, ApplyOptions, MemoryBackend};
use crate::observability::{Logger, Severity as LogSeverity};
use crate::schema::{parse_file, validate, Severity, ValidatedSchema};
use crate::types::SridRegistry;

use super::args::Command;
use super::errors::{CliError, CliResult};

/// Dispatch a parsed command.
pub fn run_command(command: Command) -> CliResult<()> {
    match command {
        Command::Validate { schema, locale } => validate_command(&schema, &locale),
        Command::Plan { schema } => plan_command(&schema),
        Command::Apply { schema } => apply_command(&schema),
    }
}

fn load_validated(path: &Path) -> CliResult<ValidatedSchema> {
    let schema = parse_file(path).map_err(CliError::schema_error)?;
    let registry = SridRegistry::default();
    match validate(schema, &registry) {
        Ok(validated) => {
            for warning in validated.warnings() {
                println!("{}", warning);
            }
            Ok(validated)
        }
        Err(diagnostics) => {
            for diagnostic in &diagnostics {
                println!("{}", diagnostic);
            }
            let errors = diagnostics
                .iter()
                .filter(|d| d.severity == Severity::Error)
                .count();
            Err(CliError::validation_failed(errors))
        }
    }
}

/// `geomodel validate`
pub fn validate_command(path: &Path, locale: &str) -> CliResult<()> {
    let locale = Locale::parse(locale).map_err(CliError::usage_error)?;
    let validated = load_validated(path)?;
    let schema = validated.schema();

    for entity in &schema.entities {
        // Label sets passed validation, so resolution cannot fail here.
        let label = entity
            .labels
            .resolve(&locale)
            .unwrap_or(entity.name.as_str());
        println!("{}: {}", entity.name, label);
    }

    Logger::log(
        LogSeverity::Info,
        "validate_ok",
        &[
            ("schema", schema.name.as_str()),
            ("entities", &schema.entities.len().to_string()),
        ],
    );
    Ok(())
}

/// `geomodel plan`
pub fn plan_command(path: &Path) -> CliResult<()> {
    let validated = load_validated(path)?;
    let model = generate(&validated);
    for statement in render_model(&model) {
        println!("{};", statement);
    }
    Ok(())
}

/// `geomodel apply`
pub fn apply_command(path: &Path) -> CliResult<()> {
    let validated = load_validated(path)?;
    let model = generate(&validated);

    let mut backend = MemoryBackend::new();
    let result = apply(&model, &mut backend, &ApplyOptions::default()).map_err(|e| {
        Logger::log_stderr(LogSeverity::Error, "apply_fail", &[("detail", &e.to_string())]);
        CliError::apply_failed(e)
    })?;

    Logger::log(
        LogSeverity::Info,
        "apply_commit",
        &[
            ("created", &result.created.len().to_string()),
            ("confirmed", &result.confirmed.len().to_string()),
        ],
    );
    for table in &result.created {
        println!("created {}", table);
    }
    for table in &result.confirmed {
        println!("confirmed {}", table);
    }
    Ok(())
}
