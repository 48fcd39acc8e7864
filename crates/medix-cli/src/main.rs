//! Main entry point for the Medix CLI

use clap::Parser;
use color_eyre::eyre::{eyre, Result};
use medix_cli::cli::Args;
use medix_common::logging::{self, LogFormat};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    color_eyre::config::HookBuilder::default()
        .display_location_section(false)
        .display_env_section(false)
        .install()?;

    let format = if args.log_json {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };
    logging::init_cli_logging(&args.verbosity, "medix_cli=info,medix_sdk=info", format)
        .map_err(|e| eyre!("Failed to initialize logging: {}", e))?;

    Ok(args.run().await?)
}
