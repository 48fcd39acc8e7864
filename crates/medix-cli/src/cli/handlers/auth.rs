//! Session command handlers

use crate::config::CliConfig;
use crate::error::{CliError, Result};
use crate::output::{compress_path, json_output, print_info, print_success};
use dialoguer::Password;
use medix_sdk::{TokenPair, TokenStore};
use serde::Serialize;
use tracing::debug;

/// Handle login: persist the tokens issued at sign-in
pub async fn handle_login(
    config: &CliConfig,
    access_token: Option<String>,
    refresh_token: Option<String>,
) -> Result<()> {
    let access_token = match access_token {
        Some(token) => token,
        None => prompt_secret("Access token")?,
    };
    let refresh_token = match refresh_token {
        Some(token) => token,
        None => prompt_secret("Refresh token")?,
    };

    let tokens = TokenPair::new(access_token.trim(), refresh_token.trim());
    if !tokens.is_usable() {
        return Err(CliError::invalid_argument(
            "Both an access token and a refresh token are required",
        ));
    }

    let client = config.build_client(None)?;
    client.session().sign_in(&tokens).await?;

    debug!("Stored tokens at {}", config.token_store()?.path().display());
    print_success("Signed in");
    Ok(())
}

fn prompt_secret(prompt: &str) -> Result<String> {
    Password::new()
        .with_prompt(prompt)
        .interact()
        .map_err(|e| CliError::internal(format!("Failed to read {}: {}", prompt.to_lowercase(), e)))
}

/// Handle logout: terminate the session
pub async fn handle_logout(config: &CliConfig) -> Result<()> {
    let store = config.token_store()?;
    if store.load().await?.is_none() {
        print_info("Not signed in");
        return Ok(());
    }

    let client = config.build_client(None)?;
    client.session().sign_out().await;
    print_success("Signed out");
    Ok(())
}

#[derive(Debug, Serialize)]
struct SessionStatus {
    authenticated: bool,
    token_file: String,
}

/// Handle status: report whether a usable session is stored
pub async fn handle_status(config: &CliConfig, json: bool) -> Result<()> {
    let store = config.token_store()?;
    let status = SessionStatus {
        authenticated: store.load().await?.is_some(),
        token_file: compress_path(store.path()),
    };

    if json {
        return json_output(&status);
    }

    if status.authenticated {
        print_success("Signed in");
    } else {
        print_info("Not signed in. Run 'medix login' to authenticate");
    }
    print_info(&format!("Token file: {}", status.token_file));
    Ok(())
}
