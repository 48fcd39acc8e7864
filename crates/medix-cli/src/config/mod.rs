//! Configuration management for the Medix CLI

use crate::error::{CliError, Result};
use etcetera::{choose_base_strategy, BaseStrategy};
use medix_common::config::{expand_path, ConfigLoader};
use medix_sdk::{
    auth::{get_sdk_data_dir, refresh::DEFAULT_REFRESH_PATH, TOKENS_KEY},
    client::{DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_MAX_REFRESH_RETRIES, DEFAULT_TIMEOUT_SECS},
    ClientBuilder, FileTokenStore, MedixClient, SignOutHandler, DEFAULT_API_URL,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// CLI configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct CliConfig {
    /// API configuration
    #[serde(default)]
    pub api: ApiConfig,

    /// Session refresh configuration
    #[serde(default)]
    pub auth: AuthSettings,

    /// Token storage configuration
    #[serde(default)]
    pub storage: StorageConfig,
}

/// API configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiConfig {
    /// Base URL for the Medix API
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Connect timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_connect_timeout() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_SECS
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

/// Session refresh settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthSettings {
    /// Refresh endpoint path relative to the base URL
    #[serde(default = "default_refresh_path")]
    pub refresh_path: String,

    /// Refresh-and-retry rounds per request
    #[serde(default = "default_max_refresh_retries")]
    pub max_refresh_retries: u32,
}

fn default_refresh_path() -> String {
    DEFAULT_REFRESH_PATH.to_string()
}

fn default_max_refresh_retries() -> u32 {
    DEFAULT_MAX_REFRESH_RETRIES
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            refresh_path: default_refresh_path(),
            max_refresh_retries: default_max_refresh_retries(),
        }
    }
}

/// Token storage settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StorageConfig {
    /// Directory holding the token file; platform data directory when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,

    /// Name of the token blob
    #[serde(default = "default_token_key")]
    pub token_key: String,
}

fn default_token_key() -> String {
    TOKENS_KEY.to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            token_key: default_token_key(),
        }
    }
}

impl ConfigLoader for CliConfig {
    const ENV_PREFIX: &'static str = "MEDIX_";
}

impl CliConfig {
    /// Load configuration from `path`, or from the default location
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => expand_path(path),
            None => Self::default_path()?,
        };
        debug!("Loading configuration from: {}", path.display());

        let mut config = <Self as ConfigLoader>::load(Some(&path))?;
        config.validate()?;

        if let Some(dir) = &config.storage.data_dir {
            config.storage.data_dir = Some(expand_path(dir));
        }

        debug!("Successfully loaded configuration");
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        for (key, value) in [
            ("api.timeout_secs", self.api.timeout_secs),
            ("api.connect_timeout_secs", self.api.connect_timeout_secs),
        ] {
            if value == 0 {
                return Err(medix_common::ConfigurationError::InvalidValue {
                    key: key.to_string(),
                    reason: "must be greater than 0".to_string(),
                }
                .into());
            }
        }
        if self.storage.token_key.trim().is_empty() {
            return Err(medix_common::ConfigurationError::InvalidValue {
                key: "storage.token_key".to_string(),
                reason: "must not be empty".to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Default configuration file (e.g. ~/.config/medix/config.toml)
    pub fn default_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Get configuration directory
    pub fn config_dir() -> Result<PathBuf> {
        let strategy = choose_base_strategy().map_err(|e| {
            CliError::internal(format!("Failed to determine base directories: {}", e))
        })?;
        Ok(strategy.config_dir().join("medix"))
    }

    /// Token store described by this configuration
    pub fn token_store(&self) -> Result<FileTokenStore> {
        let data_dir = match &self.storage.data_dir {
            Some(dir) => dir.clone(),
            None => get_sdk_data_dir()?,
        };
        Ok(FileTokenStore::new(data_dir, &self.storage.token_key))
    }

    /// Build an API client backed by the configured token store
    pub fn build_client(&self, on_sign_out: Option<Arc<dyn SignOutHandler>>) -> Result<MedixClient> {
        let mut builder = ClientBuilder::default()
            .base_url(&self.api.base_url)
            .timeout(Duration::from_secs(self.api.timeout_secs))
            .connect_timeout(Duration::from_secs(self.api.connect_timeout_secs))
            .refresh_path(&self.auth.refresh_path)
            .max_refresh_retries(self.auth.max_refresh_retries)
            .token_store(Arc::new(self.token_store()?));

        if let Some(handler) = on_sign_out {
            builder = builder.on_sign_out(handler);
        }

        Ok(builder.build()?)
    }

    /// Get configuration value by key
    pub fn get(&self, key: &str) -> Result<String> {
        self.to_map()
            .remove(key)
            .ok_or_else(|| CliError::invalid_argument(format!("Unknown configuration key: {key}")))
    }

    /// All configuration as key-value pairs
    pub fn to_map(&self) -> BTreeMap<String, String> {
        let mut map = BTreeMap::new();

        map.insert("api.base_url".to_string(), self.api.base_url.clone());
        map.insert("api.timeout_secs".to_string(), self.api.timeout_secs.to_string());
        map.insert(
            "api.connect_timeout_secs".to_string(),
            self.api.connect_timeout_secs.to_string(),
        );
        map.insert("auth.refresh_path".to_string(), self.auth.refresh_path.clone());
        map.insert(
            "auth.max_refresh_retries".to_string(),
            self.auth.max_refresh_retries.to_string(),
        );
        map.insert(
            "storage.data_dir".to_string(),
            self.storage
                .data_dir
                .as_ref()
                .map(|d| d.display().to_string())
                .unwrap_or_default(),
        );
        map.insert("storage.token_key".to_string(), self.storage.token_key.clone());

        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = CliConfig::default();
        assert_eq!(config.api.base_url, DEFAULT_API_URL);
        assert_eq!(config.auth.max_refresh_retries, 1);
        assert_eq!(config.storage.token_key, "tokens");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[api]
base_url = "http://localhost:4000"
timeout_secs = 5

[storage]
data_dir = "/tmp/medix-test"
"#
        )
        .unwrap();

        let config = CliConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.api.base_url, "http://localhost:4000");
        assert_eq!(config.api.timeout_secs, 5);
        assert_eq!(config.api.connect_timeout_secs, DEFAULT_CONNECT_TIMEOUT_SECS);
        assert_eq!(config.auth.refresh_path, DEFAULT_REFRESH_PATH);
        assert_eq!(
            config.storage.data_dir,
            Some(PathBuf::from("/tmp/medix-test"))
        );
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[api]\nbase_url = \"http://localhost\"\ntimeout_secs = 0").unwrap();

        let err = CliConfig::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }

    #[test]
    fn test_zero_connect_timeout_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[api]\nbase_url = \"http://localhost\"\nconnect_timeout_secs = 0"
        )
        .unwrap();

        match CliConfig::load(Some(file.path())).unwrap_err() {
            CliError::Config(medix_common::ConfigurationError::InvalidValue { key, .. }) => {
                assert_eq!(key, "api.connect_timeout_secs")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_get_known_and_unknown_keys() {
        let config = CliConfig::default();
        assert_eq!(config.get("auth.max_refresh_retries").unwrap(), "1");
        assert!(matches!(
            config.get("api.nope"),
            Err(CliError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_token_store_uses_configured_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = CliConfig {
            storage: StorageConfig {
                data_dir: Some(dir.path().to_path_buf()),
                token_key: "session".to_string(),
            },
            ..Default::default()
        };

        let store = config.token_store().unwrap();
        assert_eq!(store.path(), dir.path().join("session.json"));
    }
}
