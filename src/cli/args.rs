//! CLI argument definitions using clap
//!
//! Commands:
//! - geomodel validate --schema <path> [--locale <tag>]
//! - geomodel plan --schema <path>
//! - geomodel apply --schema <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// geomodel - a strict, deterministic geospatial schema-modeling engine
#[derive(Parser, Debug)]
#[command(name = "geomodel")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Parse and validate a schema definition, printing all diagnostics
    Validate {
        /// Path to the schema definition document
        #[arg(long)]
        schema: PathBuf,

        /// Locale used to render entity display labels
        #[arg(long, default_value = "en")]
        locale: String,
    },

    /// Print the DDL script a validated schema generates
    Plan {
        /// Path to the schema definition document
        #[arg(long)]
        schema: PathBuf,
    },

    /// Apply the generated model to the built-in in-memory backend
    Apply {
        /// Path to the schema definition document
        #[arg(long)]
        schema: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
