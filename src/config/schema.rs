//! KDL schema for config.kdl.
//!
//! ```kdl
//! listen "0.0.0.0:8080"
//! command-file "/usr/local/nagios/var/rw/nagios.cmd"
//! object-cache-file "/usr/local/nagios/var/objects.cache"
//! status-file "/usr/local/nagios/var/status.dat"
//! write-timeout-ms 5000
//! log-format "json"      // or "plaintext"
//! log-filter "nagios_api=debug,info"
//! ```
//!
//! Every node is optional. Unknown nodes are ignored so that files can carry
//! settings for newer versions.

use std::path::PathBuf;

use kdl::{KdlDocument, KdlValue};
use serde::Serialize;

/// Upper bound on `write-timeout-ms`.
pub const MAX_WRITE_TIMEOUT_MS: u64 = 60_000;

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Plaintext,
    /// One JSON object per event
    Json,
}

impl LogFormat {
    /// Parse from string, case-insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "plaintext" | "text" => Some(LogFormat::Plaintext),
            "json" => Some(LogFormat::Json),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Plaintext => "plaintext",
            LogFormat::Json => "json",
        }
    }
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Settings read from config.kdl.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiConfig {
    /// Socket address the HTTP server binds to
    pub listen: Option<String>,

    /// Nagios command file (usually a named pipe)
    pub command_file: Option<PathBuf>,

    /// Nagios object cache file
    pub object_cache_file: Option<PathBuf>,

    /// Nagios status file
    pub status_file: Option<PathBuf>,

    /// Maximum time a single command write may take
    pub write_timeout_ms: Option<u64>,

    pub log_format: Option<LogFormat>,

    /// `tracing` filter directive
    pub log_filter: Option<String>,
}

impl ApiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse config.kdl text.
    ///
    /// Returns an error message naming the offending node if the document is
    /// not valid KDL or a node holds the wrong kind of value.
    pub fn parse(text: &str) -> Result<Self, String> {
        let doc: KdlDocument = text.parse().map_err(|e| format!("invalid KDL: {}", e))?;
        Self::from_kdl(&doc)
    }

    /// Read settings from a KDL document.
    pub fn from_kdl(doc: &KdlDocument) -> Result<Self, String> {
        let config = Self {
            listen: string_node(doc, "listen")?,
            command_file: string_node(doc, "command-file")?.map(PathBuf::from),
            object_cache_file: string_node(doc, "object-cache-file")?.map(PathBuf::from),
            status_file: string_node(doc, "status-file")?.map(PathBuf::from),
            write_timeout_ms: integer_node(doc, "write-timeout-ms")?,
            log_format: string_node(doc, "log-format")?
                .map(|s| {
                    LogFormat::parse(&s).ok_or_else(|| {
                        format!("log-format must be \"plaintext\" or \"json\", got \"{}\"", s)
                    })
                })
                .transpose()?,
            log_filter: string_node(doc, "log-filter")?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the config values.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(timeout) = self.write_timeout_ms {
            validate_write_timeout(timeout)?;
        }
        Ok(())
    }
}

/// Check a write timeout in milliseconds.
pub fn validate_write_timeout(timeout_ms: u64) -> Result<(), String> {
    if timeout_ms == 0 || timeout_ms > MAX_WRITE_TIMEOUT_MS {
        return Err(format!(
            "write-timeout-ms must be 1-{}, got {}",
            MAX_WRITE_TIMEOUT_MS, timeout_ms
        ));
    }
    Ok(())
}

fn first_value<'a>(doc: &'a KdlDocument, name: &str) -> Option<&'a KdlValue> {
    doc.get(name)
        .and_then(|node| node.entries().first())
        .map(|entry| entry.value())
}

fn string_node(doc: &KdlDocument, name: &str) -> Result<Option<String>, String> {
    match first_value(doc, name) {
        None => Ok(None),
        Some(value) => value
            .as_string()
            .map(|s| Some(s.to_string()))
            .ok_or_else(|| format!("{} must be a string", name)),
    }
}

fn integer_node(doc: &KdlDocument, name: &str) -> Result<Option<u64>, String> {
    match first_value(doc, name) {
        None => Ok(None),
        Some(value) => value
            .as_integer()
            .and_then(|i| u64::try_from(i).ok())
            .map(Some)
            .ok_or_else(|| format!("{} must be a non-negative integer", name)),
    }
}
