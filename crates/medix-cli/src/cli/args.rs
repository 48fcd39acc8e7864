use crate::cli::{commands::Commands, handlers};
use crate::config::CliConfig;
use crate::error::Result;
use clap::Parser;
use clap_verbosity_flag::{OffLevel, Verbosity};
use std::path::PathBuf;

/// Medix CLI - medical experts directory
#[derive(Parser, Debug)]
#[command(
    name = "medix",
    author = "Medix Team",
    version,
    about = "Medix CLI - browse medical experts",
    long_about = "Command-line client for the Medix medical experts directory.

QUICK START:
  medix login                       # Store your session tokens
  medix doctors                     # List medical experts
  medix status                      # Check the stored session
  medix logout                      # Sign out

CONFIGURATION:
  medix config show                 # Show configuration
  medix config path                 # Show configuration file path"
)]
pub struct Args {
    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(flatten)]
    pub verbosity: Verbosity<OffLevel>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Args {
    /// Execute the CLI command
    pub async fn run(self) -> Result<()> {
        let config_path = match &self.config {
            Some(path) => medix_common::config::expand_path(path),
            None => CliConfig::default_path()?,
        };
        let config = CliConfig::load(Some(&config_path))?;

        match self.command {
            Commands::Doctors => handlers::doctors::handle_doctors(&config, self.json).await,
            Commands::Login {
                access_token,
                refresh_token,
            } => handlers::auth::handle_login(&config, access_token, refresh_token).await,
            Commands::Logout => handlers::auth::handle_logout(&config).await,
            Commands::Status => handlers::auth::handle_status(&config, self.json).await,
            Commands::Config { action } => {
                handlers::config::handle_config(action, &config, &config_path, self.json)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args_are_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_login_flags() {
        let args = Args::parse_from([
            "medix",
            "login",
            "--access-token",
            "a",
            "--refresh-token",
            "r",
        ]);
        match args.command {
            Commands::Login {
                access_token,
                refresh_token,
            } => {
                assert_eq!(access_token.as_deref(), Some("a"));
                assert_eq!(refresh_token.as_deref(), Some("r"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_global_json_flag() {
        let args = Args::parse_from(["medix", "doctors", "--json"]);
        assert!(args.json);
        assert!(matches!(args.command, Commands::Doctors));
    }
}
