//! View-state mapping for a doctors listing screen
//!
//! A rendering layer only needs to know which of a handful of states to draw.
//! [`DoctorsScreen`] drives one load cycle and discards the result if the
//! screen is torn down while the fetch is still in flight.

use crate::client::MedixClient;
use crate::types::{Doctor, FetchOutcome};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Shown when the listing is empty
pub const EMPTY_LISTING_MESSAGE: &str = "Can't find doctors to show.";

/// Shown when the session could not be renewed
pub const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired. Please sign in again.";

/// What the screen should render
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    Loading,
    Doctors(Vec<Doctor>),
    Empty,
    Login,
    Error(String),
}

impl From<FetchOutcome> for ViewState {
    fn from(outcome: FetchOutcome) -> Self {
        match outcome {
            FetchOutcome::Success(doctors) if doctors.is_empty() => Self::Empty,
            FetchOutcome::Success(doctors) => Self::Doctors(doctors),
            FetchOutcome::AuthInvalid => Self::Login,
            FetchOutcome::AuthExpired => Self::Error(SESSION_EXPIRED_MESSAGE.to_string()),
            FetchOutcome::TransientFailure(msg) => Self::Error(msg),
        }
    }
}

/// One screen instance showing the doctors listing
#[derive(Debug)]
pub struct DoctorsScreen {
    client: Arc<MedixClient>,
    state: ViewState,
    cancel: CancellationToken,
}

impl DoctorsScreen {
    pub fn new(client: Arc<MedixClient>) -> Self {
        Self {
            client,
            state: ViewState::Loading,
            cancel: CancellationToken::new(),
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Token that tears the screen down when cancelled
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Tear the screen down; an in-flight load no longer updates the state
    pub fn teardown(&self) {
        self.cancel.cancel();
    }

    pub fn is_torn_down(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Run one fetch-then-render cycle.
    ///
    /// The fetch runs as its own task so teardown never interrupts token store
    /// writes. Returns `None` when the screen was torn down first.
    pub async fn load(&mut self) -> Option<&ViewState> {
        if self.is_torn_down() {
            return None;
        }

        let client = Arc::clone(&self.client);
        let fetch = tokio::spawn(async move { client.fetch_doctors().await });

        let outcome = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                debug!("Screen torn down, discarding fetch result");
                return None;
            }
            joined = fetch => match joined {
                Ok(outcome) => outcome,
                Err(e) => {
                    warn!("Fetch task failed: {}", e);
                    FetchOutcome::transient()
                }
            },
        };

        if self.is_torn_down() {
            return None;
        }
        self.state = ViewState::from(outcome);
        Some(&self.state)
    }
}
