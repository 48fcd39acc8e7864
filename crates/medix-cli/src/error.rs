//! Error types for the Medix CLI

use color_eyre::eyre::Report;
use thiserror::Error;

/// CLI error type
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration file issues
    #[error("Configuration error: {0}")]
    Config(#[from] medix_common::ConfigurationError),

    /// API client construction errors
    #[error("API error: {0}")]
    Api(#[from] medix_sdk::ApiError),

    /// Token storage and session errors
    #[error(transparent)]
    Auth(#[from] medix_sdk::AuthError),

    /// The session is gone; the user must sign in again
    #[error("You are not signed in. Run 'medix login' to authenticate")]
    LoginRequired,

    /// A fetch ended in a user-visible failure
    #[error("Ooops! {message}")]
    Fetch { message: String },

    /// Invalid command-line input
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// JSON output failures
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Everything else
    #[error(transparent)]
    Internal(#[from] Report),
}

impl CliError {
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(Report::msg(message.into()))
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
