//! Configuration command handlers

use crate::cli::commands::ConfigAction;
use crate::config::CliConfig;
use crate::error::Result;
use crate::output::{compress_path, json_output};
use medix_common::ConfigLoader;
use std::path::Path;

/// Handle `config` subcommands
pub fn handle_config(
    action: ConfigAction,
    config: &CliConfig,
    config_path: &Path,
    json: bool,
) -> Result<()> {
    match action {
        ConfigAction::Show if json => json_output(&config.to_map()),
        ConfigAction::Show => {
            print!("{}", config.to_toml()?);
            Ok(())
        }
        ConfigAction::Path => {
            println!("{}", compress_path(config_path));
            Ok(())
        }
        ConfigAction::Get { key } => {
            println!("{}", config.get(&key)?);
            Ok(())
        }
    }
}
