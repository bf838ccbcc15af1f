//! geomodel CLI entry point
//!
//! Minimal entrypoint: parse arguments, dispatch to the CLI module, print
//! the error, exit non-zero on failure. All logic lives in the library.

use geomodel::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
