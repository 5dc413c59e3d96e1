//! nagios-api - An HTTP front end for the Nagios external command file.
//!
//! Each supported external command is exposed as a `POST` endpoint taking a
//! JSON body. Requests are validated and encoded into a command line such as
//! `SCHEDULE_HOST_DOWNTIME;web01;1700000000;1700003600;1;0;3600;alice;patching`,
//! then appended to the daemon's command file under a timestamped envelope.

pub mod channel;
pub mod cli;
pub mod clock;
pub mod commands;
pub mod config;
pub mod logging;
pub mod protocol;
pub mod server;

/// Error types for nagios-api operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("{0}")]
    Command(#[from] protocol::CommandError),

    #[error("{0}")]
    Channel(#[from] channel::ChannelError),

    #[error("Logging error: {0}")]
    Logging(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for nagios-api operations.
pub type Result<T> = std::result::Result<T, Error>;
