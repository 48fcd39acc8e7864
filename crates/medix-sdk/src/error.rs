//! Error types for the Medix SDK

use thiserror::Error;

/// Result type for SDK operations
pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors raised while talking to the Medix API
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure from the HTTP client
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// The request did not complete within the configured timeout
    #[error("Request timed out")]
    Timeout,

    /// The response body could not be understood
    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },

    /// The client was configured or called incorrectly
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    /// Anything else
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl ApiError {
    /// Classify a reqwest error, separating timeouts from other faults
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::HttpClient(err)
        }
    }

    /// Stable code for logs
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::HttpClient(_) => "MEDIX_SDK_HTTP",
            Self::Timeout => "MEDIX_SDK_TIMEOUT",
            Self::InvalidResponse { .. } => "MEDIX_SDK_INVALID_RESPONSE",
            Self::InvalidRequest { .. } => "MEDIX_SDK_INVALID_REQUEST",
            Self::Internal { .. } => "MEDIX_SDK_INTERNAL",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(ApiError::Timeout.error_code(), "MEDIX_SDK_TIMEOUT");
        assert_eq!(
            ApiError::InvalidRequest {
                message: "no base url".to_string()
            }
            .error_code(),
            "MEDIX_SDK_INVALID_REQUEST"
        );
    }
}
