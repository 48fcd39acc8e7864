//! # Medix SDK
//!
//! Client for the Medix practitioner directory API.
//!
//! The SDK retrieves the list of doctors with a bearer token and transparently
//! recovers from an expired access token: the session is refreshed once and the
//! request retried. An access token the service rejects as invalid terminates
//! the session.
//!
//! All session state (token store, refresher, sign-out notification) lives in a
//! [`SessionContext`] that is injected into the client.
//!
//! ```rust,no_run
//! use medix_sdk::{ClientBuilder, FetchOutcome};
//!
//! # async fn example() -> medix_sdk::Result<()> {
//! let client = ClientBuilder::default()
//!     .base_url("https://api.medix.example")
//!     .with_file_store()
//!     .build()?;
//!
//! match client.fetch_doctors().await {
//!     FetchOutcome::Success(doctors) => println!("{} doctors", doctors.len()),
//!     FetchOutcome::AuthInvalid => println!("please sign in"),
//!     other => println!("{other:?}"),
//! }
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod client;
pub mod error;
pub mod types;
pub mod view;

pub use auth::{
    AuthError, AuthResult, FileTokenStore, HttpSessionRefresher, MemoryTokenStore,
    SessionContext, SessionRefresher, SignOutHandler, TokenPair, TokenStore,
};
pub use client::{ClientBuilder, MedixClient, DEFAULT_API_URL};
pub use error::{ApiError, Result};
pub use types::{Doctor, DoctorStatus, FetchOutcome, GENERIC_FAILURE_MESSAGE};
pub use view::{DoctorsScreen, ViewState};
