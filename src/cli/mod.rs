//! CLI argument definitions for nagios-api.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{ConfigOverrides, LogFormat};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("NAGIOS_API_GIT_COMMIT"),
    ", built ",
    env!("NAGIOS_API_BUILD_TIMESTAMP"),
    ")"
);

/// nagios-api - Submit Nagios external commands over HTTP.
///
/// Run `nagios-api serve` to start the server, or `nagios-api commands` to see
/// what it accepts.
#[derive(Parser, Debug)]
#[command(name = "nagios-api")]
#[command(author, version, long_version = LONG_VERSION, about = "HTTP API for the Nagios external command file", long_about = None)]
pub struct Cli {
    /// Output in human-readable format instead of JSON
    #[arg(short = 'H', long = "human", global = true)]
    pub human_readable: bool,

    /// Config file to load instead of ~/.config/nagios-api/config.kdl
    #[arg(long = "config", global = true, env = "NAGIOS_API_CONFIG")]
    pub config_path: Option<PathBuf>,

    /// Address the HTTP server binds to
    #[arg(long, global = true)]
    pub listen: Option<SocketAddr>,

    /// Nagios command file or named pipe
    #[arg(long, global = true)]
    pub command_file: Option<PathBuf>,

    /// Nagios object cache file
    #[arg(long, global = true)]
    pub object_cache_file: Option<PathBuf>,

    /// Nagios status file
    #[arg(long, global = true)]
    pub status_file: Option<PathBuf>,

    /// Maximum time a single command write may take (1-60000)
    #[arg(long, global = true)]
    pub write_timeout_ms: Option<u64>,

    /// Log output format
    #[arg(long, global = true, value_enum)]
    pub log_format: Option<LogFormat>,

    /// Log filter directive (e.g. "info" or "nagios_api=debug")
    #[arg(long, global = true)]
    pub log_filter: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Values given on the command line, for the config resolver.
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            config_path: self.config_path.clone(),
            listen: self.listen,
            command_file: self.command_file.clone(),
            object_cache_file: self.object_cache_file.clone(),
            status_file: self.status_file.clone(),
            write_timeout_ms: self.write_timeout_ms,
            log_format: self.log_format,
            log_filter: self.log_filter.clone(),
        }
    }
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// List the supported external commands and their fields
    Commands,

    /// Encode one command and write it to the command file
    ///
    /// Runs the same pipeline as the HTTP endpoint, without the server.
    Send {
        /// Command name, e.g. ACKNOWLEDGE_HOST_PROBLEM (case-insensitive)
        name: String,

        /// JSON request body
        #[arg(long, short = 'd')]
        data: Option<String>,
    },

    /// Configuration commands
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the resolved configuration and where each value came from
    Show,
}
