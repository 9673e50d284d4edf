//! Command-line argument parsing

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "viber-server",
    about = "Viber echo bot",
    version,
    long_about = "Serves Viber bot callbacks, echoes incoming messages back to \
                  their sender and greets users who open a conversation."
)]
pub struct Args {
    /// Path to a TOML configuration file. Environment variables (VIBER__*)
    /// override its values.
    #[arg(short, long, env = "CONFIG_PATH")]
    pub config: Option<PathBuf>,

    /// HTTP server port, overriding server.port
    #[arg(short, long, env = "PORT")]
    pub port: Option<u16>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(
        short,
        long,
        env = "LOG_LEVEL",
        default_value = "info",
        value_parser = ["trace", "debug", "info", "warn", "error"]
    )]
    pub log_level: String,

    /// Enable JSON log format
    #[arg(long, env = "JSON_LOGS")]
    pub json_logs: bool,

    /// Do not register the webhook URL with the platform on startup
    #[arg(long, env = "SKIP_WEBHOOK_REGISTRATION")]
    pub skip_registration: bool,
}
