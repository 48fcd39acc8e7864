//! # Medix Common
//!
//! Shared building blocks for the Medix crates:
//! - Unified logging initialisation for binaries
//! - Layered configuration loading (defaults, TOML file, environment)

pub mod config;
pub mod logging;

pub use config::{ConfigLoader, ConfigurationError};
