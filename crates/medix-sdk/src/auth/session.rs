//! Session context injected into the client
//!
//! Bundles the token store, the refresher and the sign-out notification so the
//! fetcher never reaches for process globals.

use super::refresh::SessionRefresher;
use super::token_store::TokenStore;
use super::types::{AuthError, AuthResult, TokenPair};
use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

/// Notified after the session has been terminated
pub trait SignOutHandler: Send + Sync {
    fn signed_out(&self);
}

impl<F> SignOutHandler for F
where
    F: Fn() + Send + Sync,
{
    fn signed_out(&self) {
        self()
    }
}

/// Shared session state for one signed-in user
pub struct SessionContext {
    store: Arc<dyn TokenStore>,
    refresher: Arc<dyn SessionRefresher>,
    sign_out_handler: Option<Arc<dyn SignOutHandler>>,
    // Single writer for refresh; concurrent callers re-read the store under it
    refresh_lock: Mutex<()>,
}

impl fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionContext")
            .field("has_sign_out_handler", &self.sign_out_handler.is_some())
            .finish_non_exhaustive()
    }
}

impl SessionContext {
    pub fn new(store: Arc<dyn TokenStore>, refresher: Arc<dyn SessionRefresher>) -> Self {
        Self {
            store,
            refresher,
            sign_out_handler: None,
            refresh_lock: Mutex::new(()),
        }
    }

    pub fn with_sign_out_handler(mut self, handler: Arc<dyn SignOutHandler>) -> Self {
        self.sign_out_handler = Some(handler);
        self
    }

    /// Current stored pair, if any
    pub async fn current_tokens(&self) -> AuthResult<Option<TokenPair>> {
        self.store.load().await
    }

    /// Persist a pair obtained at sign-in
    pub async fn sign_in(&self, tokens: &TokenPair) -> AuthResult<()> {
        if !tokens.is_usable() {
            return Err(AuthError::UnusableTokens);
        }
        let _guard = self.refresh_lock.lock().await;
        self.store.save(tokens).await?;
        info!("Session started");
        Ok(())
    }

    /// Exchange `expired` for a fresh pair and persist it.
    ///
    /// Runs under the refresh lock. If the stored access token no longer matches
    /// `expired`, another caller already refreshed and the stored pair is
    /// returned without contacting the refresher.
    pub async fn refresh(&self, expired: &TokenPair) -> AuthResult<TokenPair> {
        let _guard = self.refresh_lock.lock().await;

        match self.store.load().await? {
            Some(current) if current.access_token != expired.access_token => {
                debug!("Tokens were refreshed concurrently, reusing stored pair");
                return Ok(current);
            }
            Some(_) => {}
            None => return Err(AuthError::NotAuthenticated),
        }

        let fresh = self.refresher.refresh(expired).await?;
        if !fresh.is_usable() {
            return Err(AuthError::UnusableTokens);
        }

        self.store.save(&fresh).await?;
        info!("Access token refreshed");
        Ok(fresh)
    }

    /// Terminate the session: clear stored tokens and notify the handler.
    ///
    /// A storage failure is logged; the session counts as terminated regardless.
    pub async fn sign_out(&self) {
        {
            let _guard = self.refresh_lock.lock().await;
            if let Err(e) = self.store.clear().await {
                error!("Failed to clear stored tokens during sign-out: {}", e);
            }
        }
        self.terminated();
    }

    /// Terminate the session only if `rejected` is still the stored pair.
    ///
    /// Returns `false` without touching the store when the stored access token
    /// was already replaced or cleared by another caller.
    pub async fn sign_out_if_current(&self, rejected: &TokenPair) -> bool {
        {
            let _guard = self.refresh_lock.lock().await;
            match self.store.load().await {
                Ok(Some(current)) if current.access_token != rejected.access_token => {
                    debug!("Rejected token was already replaced, keeping session");
                    return false;
                }
                Ok(None) => {
                    debug!("Session already cleared");
                    return false;
                }
                Ok(Some(_)) => {}
                Err(e) => warn!("Failed to read stored tokens before sign-out: {}", e),
            }
            if let Err(e) = self.store.clear().await {
                error!("Failed to clear stored tokens during sign-out: {}", e);
            }
        }
        self.terminated();
        true
    }

    fn terminated(&self) {
        info!("Session terminated");
        if let Some(handler) = &self.sign_out_handler {
            handler.signed_out();
        }
    }
}
