//! # Medix CLI
//!
//! Command-line front end for the Medix practitioner directory.
//!
//! - Clap-based argument parsing with derive macros
//! - Handler-based command processing
//! - Layered configuration (defaults, `config.toml`, `MEDIX_*` environment)

pub mod cli;
pub mod config;
pub mod error;
pub mod output;

pub use cli::*;
pub use error::*;
