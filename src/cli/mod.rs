//! Subcommand entry points. Each `run` loads config, calls into the library
//! and prints a short summary to stdout.

pub mod analyze;
pub mod create;
pub mod extract;
pub mod synthesize;
