//! CLI module for craftwatch
//!
//! Command-line interface definitions and handlers.
//!
//! # Commands
//!
//! - `watch` - Live dashboard, redrawn continuously
//! - `calendar` - Show scheduled events and their current status
//! - `status` - Show the event handler status
//! - `health` - Probe the game server and RCON
//! - `winners` - Show results of finished events
//! - `events` - List event files or show one
//! - `logs` - Show database logs or a log file
//! - `start` / `stop` - Start or stop the event handler
//! - `config` - Configuration utilities (init)
//! - `completions` - Generate shell completions
//!
//! # Example
//!
//! ```bash
//! # Live dashboard against a remote backend
//! craftwatch watch --url http://mc.example.com:5000 --db-logs
//!
//! # One-shot health check as JSON
//! craftwatch health --json
//! ```

pub mod completions;
pub mod config;
pub mod handler;
pub mod query;
pub mod watch;

pub use completions::handle_completions;
pub use config::handle_config_init;

use crate::client::BackendClient;
use crate::config::CraftwatchConfig;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// craftwatch - Minecraft event dashboard
#[derive(Parser, Debug)]
#[command(
    name = "craftwatch",
    version,
    about = "Terminal dashboard for a Minecraft event-automation backend"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Live dashboard
    Watch(WatchArgs),
    /// Show the event calendar
    Calendar(OutputArgs),
    /// Show the event handler status
    Status(OutputArgs),
    /// Probe dependency health
    Health(OutputArgs),
    /// Show results of finished events
    Winners(OutputArgs),
    /// List event files, or show one
    Events(EventsArgs),
    /// Show logs
    Logs(LogsArgs),
    /// Start the event handler
    Start(ConnectArgs),
    /// Stop the event handler
    Stop(ConnectArgs),
    /// Configuration utilities
    #[command(subcommand)]
    Config(ConfigCommands),
    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Backend connection options shared by every command that talks to it.
#[derive(Args, Debug, Clone)]
pub struct ConnectArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "craftwatch.toml")]
    pub config: PathBuf,

    /// Backend base URL
    #[arg(short, long, env = "CRAFTWATCH_URL")]
    pub url: Option<String>,

    /// Request timeout in seconds
    #[arg(short, long)]
    pub timeout: Option<u64>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "CRAFTWATCH_LOG_LEVEL")]
    pub log_level: Option<String>,
}

#[derive(Args, Debug)]
pub struct OutputArgs {
    #[command(flatten)]
    pub connect: ConnectArgs,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct WatchArgs {
    #[command(flatten)]
    pub connect: ConnectArgs,

    /// Event file to show from the start
    #[arg(short, long)]
    pub event_file: Option<String>,

    /// Log file to show from the start
    #[arg(long, conflicts_with = "db_logs")]
    pub log: Option<String>,

    /// Show recent database logs from the start
    #[arg(long)]
    pub db_logs: bool,

    /// Milliseconds between redraws
    #[arg(long, default_value = "1000")]
    pub refresh_ms: u64,

    /// Print one JSON state line per redraw instead of the frame
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct EventsArgs {
    #[command(flatten)]
    pub connect: ConnectArgs,

    /// Event file to print
    pub name: Option<String>,
}

#[derive(Args, Debug)]
pub struct LogsArgs {
    #[command(flatten)]
    pub connect: ConnectArgs,

    /// Log file to print; recent database logs when omitted
    pub name: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Initialize a new configuration file
    Init(ConfigInitArgs),
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Output file path
    #[arg(short, long, default_value = "craftwatch.toml")]
    pub output: PathBuf,

    /// Overwrite existing file
    #[arg(short, long)]
    pub force: bool,

    /// Backend URL to write into [backend].url
    #[arg(short, long)]
    pub url: Option<String>,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}

/// Load configuration with CLI overrides
pub fn load_config_with_overrides(
    args: &ConnectArgs,
) -> Result<CraftwatchConfig, Box<dyn std::error::Error>> {
    // Load from file if it exists, otherwise use defaults
    let mut config = if args.config.exists() {
        CraftwatchConfig::load(Some(&args.config))?
    } else {
        CraftwatchConfig::default()
    };

    config = config.with_env_overrides();

    // CLI overrides (highest priority)
    if let Some(ref url) = args.url {
        config.backend.url = url.clone();
    }
    if let Some(timeout) = args.timeout {
        config.backend.request_timeout_seconds = timeout;
    }
    if let Some(ref log_level) = args.log_level {
        config.logging.level = log_level.clone();
    }

    config.validate()?;
    Ok(config)
}

/// Load config, start tracing and build a backend client.
pub fn connect(
    args: &ConnectArgs,
) -> Result<(CraftwatchConfig, BackendClient), Box<dyn std::error::Error>> {
    let config = load_config_with_overrides(args)?;
    crate::logging::init_tracing(&config.logging)?;
    tracing::debug!(?config, "Loaded configuration");

    let client = BackendClient::new(&config.backend.url, config.backend.request_timeout())?;
    Ok((config, client))
}
