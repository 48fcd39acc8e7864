//! Doctors listing handler

use crate::config::CliConfig;
use crate::error::{CliError, Result};
use crate::output::{json_output, print_info, print_warning, table_output};
use medix_sdk::{view::EMPTY_LISTING_MESSAGE, DoctorsScreen, SignOutHandler, ViewState};
use std::sync::Arc;
use tracing::debug;

/// Fetch the listing and render it
pub async fn handle_doctors(config: &CliConfig, json: bool) -> Result<()> {
    let on_sign_out: Arc<dyn SignOutHandler> =
        Arc::new(|| print_warning("Your session is no longer valid and has been signed out."));
    let client = config.build_client(Some(on_sign_out))?;

    let mut screen = DoctorsScreen::new(Arc::new(client));
    let teardown = screen.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            debug!("Interrupted, tearing down doctors screen");
            teardown.cancel();
        }
    });

    let Some(state) = screen.load().await else {
        print_info("Cancelled");
        return Ok(());
    };

    render(state, json)
}

/// Render a finished view state
pub fn render(state: &ViewState, json: bool) -> Result<()> {
    match state {
        ViewState::Doctors(doctors) if json => json_output(doctors),
        ViewState::Empty if json => json_output(&Vec::<medix_sdk::Doctor>::new()),
        ViewState::Doctors(doctors) => {
            println!("{}", table_output::doctors_table(doctors));
            Ok(())
        }
        ViewState::Empty => {
            print_info(EMPTY_LISTING_MESSAGE);
            Ok(())
        }
        ViewState::Login => Err(CliError::LoginRequired),
        ViewState::Error(message) => Err(CliError::Fetch {
            message: message.clone(),
        }),
        ViewState::Loading => Err(CliError::internal("Doctors listing did not finish loading")),
    }
}
