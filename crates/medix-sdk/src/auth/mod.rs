//! Authentication module for the Medix SDK
//!
//! This module provides:
//! - The persisted access/refresh token pair
//! - Token storage backends (file and in-memory)
//! - Session refresh against the Medix API
//! - The session context injected into the client

pub mod refresh;
pub mod session;
pub mod token_store;
pub mod types;

pub use refresh::{HttpSessionRefresher, SessionRefresher};
pub use session::{SessionContext, SignOutHandler};
pub use token_store::{FileTokenStore, MemoryTokenStore, TokenStore};
pub use types::{get_sdk_data_dir, AuthError, AuthResult, TokenPair, TOKENS_KEY};
