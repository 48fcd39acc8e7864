//! Layered configuration loading
//!
//! Every configuration type is assembled the same way: serialized defaults,
//! then an optional TOML file, then prefixed environment variables.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{de::DeserializeOwned, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// The configuration could not be parsed or extracted
    #[error("Failed to parse configuration: {details}")]
    ParseError { details: String },

    /// A value is syntactically valid but not acceptable
    #[error("Invalid value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },

    /// The configuration could not be serialized
    #[error("Failed to serialize configuration: {details}")]
    SerializeError { details: String },
}

/// Loader shared by all configuration structs.
///
/// Implementors only provide the environment prefix; defaults come from
/// `Default` and the TOML layer from the given path.
pub trait ConfigLoader: Serialize + DeserializeOwned + Default {
    /// Environment prefix, e.g. `MEDIX_`. Nested keys are separated by `__`.
    const ENV_PREFIX: &'static str;

    /// Build the figment for an optional file path.
    fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed(Self::ENV_PREFIX).split("__"))
    }

    /// Load configuration; a missing file falls back to defaults plus environment.
    fn load(path: Option<&Path>) -> Result<Self, ConfigurationError> {
        Self::figment(path)
            .extract()
            .map_err(|e| ConfigurationError::ParseError {
                details: e.to_string(),
            })
    }

    /// Render this configuration as TOML.
    fn to_toml(&self) -> Result<String, ConfigurationError> {
        toml::to_string_pretty(self).map_err(|e| ConfigurationError::SerializeError {
            details: e.to_string(),
        })
    }
}

/// Expand a leading `~` in a path.
pub fn expand_path(path: &Path) -> PathBuf {
    match path.to_str() {
        Some(raw) => PathBuf::from(shellexpand::tilde(raw).as_ref()),
        None => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::io::Write;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Sample {
        name: String,
        retries: u32,
    }

    impl Default for Sample {
        fn default() -> Self {
            Self {
                name: "default".to_string(),
                retries: 1,
            }
        }
    }

    impl ConfigLoader for Sample {
        const ENV_PREFIX: &'static str = "MEDIX_COMMON_TEST_SAMPLE_";
    }

    #[test]
    fn test_defaults_without_file() {
        let sample = Sample::load(None).unwrap();
        assert_eq!(sample, Sample::default());
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let sample = Sample::load(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(sample.retries, 1);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "retries = 3").unwrap();

        let sample = Sample::load(Some(file.path())).unwrap();
        assert_eq!(sample.name, "default");
        assert_eq!(sample.retries, 3);
    }

    #[test]
    fn test_bad_file_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "retries = \"many\"").unwrap();

        let err = Sample::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigurationError::ParseError { .. }));
    }

    #[test]
    fn test_expand_path_without_tilde() {
        let path = Path::new("/etc/medix/config.toml");
        assert_eq!(expand_path(path), path.to_path_buf());
    }
}
