use clap::Subcommand;

/// Main CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List medical experts
    Doctors,

    /// Store the tokens issued at sign-in
    Login {
        /// Access token (prompted when omitted)
        #[arg(long, env = "MEDIX_ACCESS_TOKEN", hide_env_values = true)]
        access_token: Option<String>,

        /// Refresh token (prompted when omitted)
        #[arg(long, env = "MEDIX_REFRESH_TOKEN", hide_env_values = true)]
        refresh_token: Option<String>,
    },

    /// Sign out and remove stored tokens
    Logout,

    /// Show whether a session is stored
    Status,

    /// Inspect CLI configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Configuration subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,

    /// Print the configuration file path
    Path,

    /// Print one configuration value
    Get {
        /// Key such as `api.base_url`
        key: String,
    },
}
