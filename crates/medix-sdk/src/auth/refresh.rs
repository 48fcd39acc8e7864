//! Session refresh
//!
//! A [`SessionRefresher`] exchanges an expired token pair for a new one.
//! [`HttpSessionRefresher`] does this against the Medix refresh endpoint.

use super::types::{AuthError, AuthResult, TokenPair};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Default path of the refresh endpoint, relative to the API base URL
pub const DEFAULT_REFRESH_PATH: &str = "/auth/refresh";

/// Produces a new token pair from the current (expired) one
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionRefresher: Send + Sync {
    async fn refresh(&self, tokens: &TokenPair) -> AuthResult<TokenPair>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefreshResponse {
    #[serde(default)]
    result: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
}

/// Refresher that calls `POST {base}{refresh_path}`
#[derive(Debug, Clone)]
pub struct HttpSessionRefresher {
    http_client: reqwest::Client,
    endpoint: String,
}

impl HttpSessionRefresher {
    /// Refresher sharing the API client's HTTP connection pool and timeouts
    pub fn with_client(http_client: reqwest::Client, base_url: &str, refresh_path: &str) -> Self {
        let endpoint = format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            refresh_path.trim_start_matches('/')
        );
        Self {
            http_client,
            endpoint,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl SessionRefresher for HttpSessionRefresher {
    async fn refresh(&self, tokens: &TokenPair) -> AuthResult<TokenPair> {
        debug!("Refreshing session at {}", self.endpoint);

        let response = self
            .http_client
            .post(&self.endpoint)
            .bearer_auth(&tokens.access_token)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&RefreshRequest {
                refresh_token: &tokens.refresh_token,
            })
            .send()
            .await
            .map_err(|e| AuthError::NetworkError(format!("Token refresh request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AuthError::RefreshRefused(format!(
                "status {}: {}",
                status, error_text
            )));
        }

        let body: RefreshResponse = response.json().await.map_err(|e| {
            AuthError::InvalidResponse(format!("Failed to parse refresh response: {}", e))
        })?;

        if body.result.as_deref() == Some("Failure") {
            return Err(AuthError::RefreshRefused(
                body.msg.unwrap_or_else(|| "no reason given".to_string()),
            ));
        }

        // A reply without an access token is as unusable as an empty one
        let access_token = body
            .access_token
            .filter(|t| !t.trim().is_empty())
            .ok_or(AuthError::UnusableTokens)?;

        // Keep the current refresh token when the endpoint does not rotate it
        let refresh_token = body
            .refresh_token
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| tokens.refresh_token.clone());

        info!("Session refresh completed");
        Ok(TokenPair::new(access_token, refresh_token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn refresher(server: &MockServer) -> HttpSessionRefresher {
        HttpSessionRefresher::with_client(reqwest::Client::new(), &server.uri(), DEFAULT_REFRESH_PATH)
    }

    #[test]
    fn test_endpoint_joining() {
        let refresher = HttpSessionRefresher::with_client(
            reqwest::Client::new(),
            "https://api.medix.example/",
            "auth/refresh",
        );
        assert_eq!(refresher.endpoint(), "https://api.medix.example/auth/refresh");
    }

    #[tokio::test]
    async fn test_refresh_success() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth/refresh"))
            .and(header("Authorization", "Bearer old-access"))
            .and(body_json(json!({"refreshToken": "old-refresh"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "accessToken": "new-access",
                "refreshToken": "new-refresh",
            })))
            .expect(1)
            .mount(&server)
            .await;

        let tokens = refresher(&server)
            .refresh(&TokenPair::new("old-access", "old-refresh"))
            .await
            .unwrap();

        assert_eq!(tokens, TokenPair::new("new-access", "new-refresh"));
    }

    #[tokio::test]
    async fn test_refresh_keeps_refresh_token_when_not_rotated() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth/refresh"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"accessToken": "new-access"})),
            )
            .mount(&server)
            .await;

        let tokens = refresher(&server)
            .refresh(&TokenPair::new("old-access", "old-refresh"))
            .await
            .unwrap();

        assert_eq!(tokens, TokenPair::new("new-access", "old-refresh"));
    }

    #[tokio::test]
    async fn test_refresh_rejected_status() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth/refresh"))
            .respond_with(ResponseTemplate::new(401).set_body_string("revoked"))
            .mount(&server)
            .await;

        let err = refresher(&server)
            .refresh(&TokenPair::new("a", "r"))
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::RefreshRefused(_)));
    }

    #[tokio::test]
    async fn test_refresh_failure_envelope() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth/refresh"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "result": "Failure",
                "msg": "Refresh token expired",
            })))
            .mount(&server)
            .await;

        let err = refresher(&server)
            .refresh(&TokenPair::new("a", "r"))
            .await
            .unwrap_err();

        match err {
            AuthError::RefreshRefused(msg) => assert_eq!(msg, "Refresh token expired"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_refresh_without_access_token_is_unusable() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth/refresh"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let err = refresher(&server)
            .refresh(&TokenPair::new("a", "r"))
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::UnusableTokens));
    }

    #[tokio::test]
    async fn test_refresh_empty_access_token_is_unusable() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth/refresh"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"accessToken": ""})))
            .mount(&server)
            .await;

        let err = refresher(&server)
            .refresh(&TokenPair::new("a", "r"))
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::UnusableTokens));
    }
}
