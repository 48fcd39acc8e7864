//! Authentication-related types

use etcetera::{choose_base_strategy, BaseStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Result type for authentication operations
pub type AuthResult<T> = Result<T, AuthError>;

/// Fixed name under which the token pair is persisted
pub const TOKENS_KEY: &str = "tokens";

/// Access and refresh token issued together at sign-in
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    /// Short-lived credential sent as the bearer token
    pub access_token: String,
    /// Longer-lived credential used to obtain a new access token
    pub refresh_token: String,
}

impl TokenPair {
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }

    /// A pair is only usable when both tokens are present
    pub fn is_usable(&self) -> bool {
        !self.access_token.trim().is_empty() && !self.refresh_token.trim().is_empty()
    }

    /// Decode a persisted blob. Unparseable or incomplete blobs count as absent.
    pub fn from_blob(blob: &str) -> Option<Self> {
        serde_json::from_str::<Self>(blob)
            .ok()
            .filter(Self::is_usable)
    }

    pub fn to_blob(&self) -> AuthResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenPair")
            .field("access_token", &redact(&self.access_token))
            .field("refresh_token", &redact(&self.refresh_token))
            .finish()
    }
}

fn redact(token: &str) -> String {
    let prefix: String = token.chars().take(4).collect();
    format!("{prefix}…")
}

/// Authentication errors
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No usable token pair is stored
    #[error("Not authenticated. Run 'medix login' to sign in")]
    NotAuthenticated,

    /// The refresh endpoint declined to issue new tokens
    #[error("Token refresh refused: {0}")]
    RefreshRefused(String),

    /// The refresher reported success but returned an unusable pair
    #[error("Token refresh returned no usable token")]
    UnusableTokens,

    /// Network error while refreshing
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Malformed refresh response
    #[error("Invalid refresh response: {0}")]
    InvalidResponse(String),

    /// Token storage error
    #[error("Token storage error: {0}")]
    StorageError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

/// Default data directory for token storage (e.g. ~/.local/share/medix on Linux)
pub fn get_sdk_data_dir() -> AuthResult<PathBuf> {
    let strategy = choose_base_strategy().map_err(|e| {
        AuthError::ConfigError(format!("Failed to determine base directories: {}", e))
    })?;

    Ok(strategy.data_dir().join("medix"))
}
