//! CLI command definitions for the `webtoys-relay` binary.

pub mod build;
pub mod config;
pub mod identity;
pub mod info;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Relay "build an app" requests to the Webtoys SMS bot and wait for the result.
#[derive(Parser)]
#[command(name = "webtoys-relay", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Export spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(flatten)]
    pub config: ConfigArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Configuration sources layered over the TOML file.
#[derive(Args, Debug, Default, Clone)]
pub struct ConfigArgs {
    /// Path to a TOML configuration file.
    #[arg(long = "config", env = "WEBTOYS_RELAY_CONFIG", global = true)]
    pub config_path: Option<PathBuf>,

    /// Base URL of the downstream SMS bot.
    #[arg(long, env = "WEBTOYS_API_URL", global = true)]
    pub webhook_url: Option<String>,

    /// Base URL of the content store.
    #[arg(long, env = "SUPABASE_URL", global = true)]
    pub store_url: Option<String>,

    /// Service key for the content store.
    #[arg(long, env = "SUPABASE_SERVICE_KEY", hide_env_values = true, global = true)]
    pub store_key: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP tool server.
    Serve {
        /// Port to listen on.
        #[arg(long, env = "PORT")]
        port: Option<u16>,

        /// Host to bind to.
        #[arg(long, env = "HOST")]
        host: Option<String>,
    },

    /// Run one build request and print the result.
    Build {
        /// What to build, in plain language.
        description: String,

        /// Caller token used to derive the sender identity.
        #[arg(long)]
        user_id: Option<String>,
    },

    /// Print the synthetic identifier for a caller token.
    Identity {
        /// Caller token (omit for the anonymous identifier).
        token: Option<String>,
    },

    /// Print static server information.
    Info,

    /// Configuration commands.
    Config {
        #[command(subcommand)]
        action: ConfigCommand,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration.
    Show,
}
