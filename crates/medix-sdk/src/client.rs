//! HTTP client for the Medix API
//!
//! # Authentication
//!
//! Every request carries `Authorization: Bearer {access_token}` taken from the
//! injected [`SessionContext`]. When the service answers `Token expired` the
//! session is refreshed and the request retried, at most
//! `max_refresh_retries` times. `Invalid Access Token` terminates the session
//! unless the rejected token was already replaced in the store.
//!
//! # Usage
//!
//! ```rust,no_run
//! use medix_sdk::{ClientBuilder, MemoryTokenStore, TokenPair};
//! use std::sync::Arc;
//!
//! # async fn example() -> medix_sdk::Result<()> {
//! let store = Arc::new(MemoryTokenStore::with_tokens(TokenPair::new("access", "refresh")));
//! let client = ClientBuilder::default()
//!     .base_url("https://api.medix.example")
//!     .token_store(store)
//!     .build()?;
//!
//! let outcome = client.fetch_doctors().await;
//! # Ok(())
//! # }
//! ```

use crate::{
    auth::{
        refresh::DEFAULT_REFRESH_PATH, AuthError, FileTokenStore, HttpSessionRefresher,
        SessionContext, SessionRefresher, SignOutHandler, TokenPair, TokenStore,
    },
    error::{ApiError, Result},
    types::{Envelope, FetchOutcome, Reply},
};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Default API URL when not specified
pub const DEFAULT_API_URL: &str = "https://api.medix.example";

/// Default timeout in seconds for API requests
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default connect timeout in seconds
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Default number of refresh-and-retry rounds per fetch
pub const DEFAULT_MAX_REFRESH_RETRIES: u32 = 1;

const DOCTORS_PATH: &str = "doctors";

/// HTTP client for the Medix API
#[derive(Debug)]
pub struct MedixClient {
    http_client: reqwest::Client,
    base_url: String,
    session: Arc<SessionContext>,
    max_refresh_retries: u32,
}

impl MedixClient {
    /// Create a client around an existing session
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        session: Arc<SessionContext>,
    ) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ApiError::HttpClient)?;

        Ok(Self::from_parts(
            http_client,
            base_url.into(),
            session,
            DEFAULT_MAX_REFRESH_RETRIES,
        ))
    }

    fn from_parts(
        http_client: reqwest::Client,
        base_url: String,
        session: Arc<SessionContext>,
        max_refresh_retries: u32,
    ) -> Self {
        Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
            max_refresh_retries,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<SessionContext> {
        &self.session
    }

    /// Retrieve the doctors listing.
    ///
    /// Never returns an error: every fault degrades to a [`FetchOutcome`].
    /// `Requesting` is entered at most `1 + max_refresh_retries` times.
    pub async fn fetch_doctors(&self) -> FetchOutcome {
        let mut refreshes = 0;

        loop {
            let tokens = match self.session.current_tokens().await {
                Ok(Some(tokens)) => tokens,
                Ok(None) => {
                    debug!("No stored tokens, not authenticated");
                    return FetchOutcome::AuthInvalid;
                }
                Err(e) => {
                    warn!("Failed to read stored tokens: {}", e);
                    return FetchOutcome::transient();
                }
            };

            let envelope = match self.get_envelope(DOCTORS_PATH, &tokens).await {
                Ok(envelope) => envelope,
                Err(e) => {
                    warn!(code = e.error_code(), "Doctors request failed: {}", e);
                    return FetchOutcome::transient();
                }
            };

            match envelope.into_reply() {
                Reply::Success(doctors) => {
                    debug!("Fetched {} doctors", doctors.len());
                    return FetchOutcome::Success(doctors);
                }
                Reply::TokenExpired => {
                    if refreshes >= self.max_refresh_retries {
                        warn!(
                            "Access token still expired after {} refresh attempt(s)",
                            refreshes
                        );
                        return FetchOutcome::AuthExpired;
                    }
                    refreshes += 1;

                    debug!("Access token expired, refreshing session");
                    match self.session.refresh(&tokens).await {
                        Ok(_) => continue,
                        Err(e) => return Self::refresh_outcome(e),
                    }
                }
                Reply::InvalidToken => {
                    info!("Access token rejected, signing out");
                    if self.session.sign_out_if_current(&tokens).await
                        || refreshes >= self.max_refresh_retries
                    {
                        return FetchOutcome::AuthInvalid;
                    }
                    // Another caller rotated or cleared the session meanwhile
                    refreshes += 1;
                    continue;
                }
                Reply::Failure(msg) => {
                    warn!("Doctors request reported failure: {}", msg);
                    return FetchOutcome::TransientFailure(msg);
                }
            }
        }
    }

    fn refresh_outcome(err: AuthError) -> FetchOutcome {
        match err {
            AuthError::UnusableTokens
            | AuthError::StorageError(_)
            | AuthError::IoError(_)
            | AuthError::SerdeError(_) => {
                warn!("Session refresh could not complete: {}", err);
                FetchOutcome::transient()
            }
            AuthError::NotAuthenticated => {
                debug!("Session ended while refreshing");
                FetchOutcome::AuthInvalid
            }
            other => {
                warn!("Session refresh failed: {}", other);
                FetchOutcome::AuthExpired
            }
        }
    }

    /// Authenticated GET returning the parsed response envelope.
    ///
    /// The body is parsed whatever the status code; the service reports
    /// authentication failures inside it.
    async fn get_envelope(&self, path: &str, tokens: &TokenPair) -> Result<Envelope> {
        let url = format!("{}/{}", self.base_url, path);
        debug!("GET {}", url);

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&tokens.access_token)
            .header(CONTENT_TYPE, "application/json; charset=UTF-8")
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(ApiError::from_transport)?;

        let status = response.status();
        let body = response.bytes().await.map_err(ApiError::from_transport)?;

        serde_json::from_slice(&body).map_err(|e| ApiError::InvalidResponse {
            message: format!("status {status}: {e}"),
        })
    }
}

/// Builder for constructing a MedixClient with custom configuration
#[derive(Default)]
pub struct ClientBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    refresh_path: Option<String>,
    max_refresh_retries: Option<u32>,
    token_store: Option<Arc<dyn TokenStore>>,
    refresher: Option<Arc<dyn SessionRefresher>>,
    sign_out_handler: Option<Arc<dyn SignOutHandler>>,
    session: Option<Arc<SessionContext>>,
    use_file_store: bool,
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base URL for the API
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the connection timeout
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Path of the refresh endpoint used by the default refresher
    pub fn refresh_path(mut self, path: impl Into<String>) -> Self {
        self.refresh_path = Some(path.into());
        self
    }

    /// Cap on refresh-and-retry rounds per fetch
    pub fn max_refresh_retries(mut self, retries: u32) -> Self {
        self.max_refresh_retries = Some(retries);
        self
    }

    /// Use the given token store
    pub fn token_store(mut self, store: Arc<dyn TokenStore>) -> Self {
        self.token_store = Some(store);
        self.use_file_store = false;
        self
    }

    /// Use the file token store in the platform data directory
    pub fn with_file_store(mut self) -> Self {
        self.use_file_store = true;
        self.token_store = None;
        self
    }

    /// Replace the HTTP refresher
    pub fn refresher(mut self, refresher: Arc<dyn SessionRefresher>) -> Self {
        self.refresher = Some(refresher);
        self
    }

    /// Notify `handler` whenever the session is terminated
    pub fn on_sign_out(mut self, handler: Arc<dyn SignOutHandler>) -> Self {
        self.sign_out_handler = Some(handler);
        self
    }

    /// Share an already assembled session; store, refresher and handler settings are ignored
    pub fn session(mut self, session: Arc<SessionContext>) -> Self {
        self.session = Some(session);
        self
    }

    /// Build the client
    pub fn build(self) -> Result<MedixClient> {
        let base_url = self.base_url.unwrap_or_else(|| DEFAULT_API_URL.to_string());
        url::Url::parse(&base_url).map_err(|e| ApiError::InvalidRequest {
            message: format!("Invalid base URL '{base_url}': {e}"),
        })?;

        let timeout = self
            .timeout
            .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        let connect_timeout = self
            .connect_timeout
            .unwrap_or(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS));

        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .build()
            .map_err(ApiError::HttpClient)?;

        let session = match self.session {
            Some(session) => session,
            None => {
                let store: Arc<dyn TokenStore> = match (self.token_store, self.use_file_store) {
                    (Some(store), _) => store,
                    (None, true) => {
                        Arc::new(FileTokenStore::default_location().map_err(|e| {
                            ApiError::Internal {
                                message: format!("Failed to create file token store: {}", e),
                            }
                        })?)
                    }
                    (None, false) => {
                        return Err(ApiError::InvalidRequest {
                            message: "Either use token_store(), with_file_store() or session()"
                                .into(),
                        })
                    }
                };

                let refresher: Arc<dyn SessionRefresher> = match self.refresher {
                    Some(refresher) => refresher,
                    None => Arc::new(HttpSessionRefresher::with_client(
                        http_client.clone(),
                        &base_url,
                        self.refresh_path.as_deref().unwrap_or(DEFAULT_REFRESH_PATH),
                    )),
                };

                let mut session = SessionContext::new(store, refresher);
                if let Some(handler) = self.sign_out_handler {
                    session = session.with_sign_out_handler(handler);
                }
                Arc::new(session)
            }
        };

        Ok(MedixClient::from_parts(
            http_client,
            base_url,
            session,
            self.max_refresh_retries
                .unwrap_or(DEFAULT_MAX_REFRESH_RETRIES),
        ))
    }
}
