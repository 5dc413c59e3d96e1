//! Structured logging for the server.
//!
//! Events go to stderr so that CLI output on stdout stays machine readable.

use std::io::{self, IsTerminal};
use std::sync::OnceLock;

use tracing::Subscriber;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::LogFormat;
use crate::{Error, Result};

static INSTALLED: OnceLock<()> = OnceLock::new();

/// Install the global tracing subscriber.
///
/// Only the first call installs anything; later calls return `Ok(())`
/// without touching the global state.
pub fn init(format: LogFormat, filter: &str) -> Result<()> {
    if INSTALLED.get().is_some() {
        return Ok(());
    }
    install_subscriber(format, filter)?;
    let _ = INSTALLED.set(());
    Ok(())
}

fn install_subscriber(format: LogFormat, filter: &str) -> Result<()> {
    let filter = parse_filter(filter)?;

    let builder = |filter: EnvFilter| {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .with_level(true)
            .with_writer(io::stderr)
            .with_ansi(io::stderr().is_terminal())
    };

    let subscriber: Box<dyn Subscriber + Send + Sync> = match format {
        LogFormat::Json => Box::new(builder(filter).json().flatten_event(true).finish()),
        LogFormat::Plaintext => Box::new(builder(filter).finish()),
    };

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| Error::Logging(format!("failed to install subscriber: {}", e)))
}

fn parse_filter(filter: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(filter)
        .map_err(|e| Error::Logging(format!("invalid log filter '{}': {}", filter, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_filter_accepts_directives() {
        assert!(parse_filter("info").is_ok());
        assert!(parse_filter("nagios_api=debug,tower_http=warn").is_ok());
    }

    #[test]
    fn test_parse_filter_rejects_garbage() {
        let err = parse_filter("nagios_api=loud").unwrap_err();
        assert!(err.to_string().contains("invalid log filter"));
    }
}
