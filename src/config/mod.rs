//! Configuration for the API server.
//!
//! Settings come from four layers, highest precedence first: CLI flags,
//! `NAGIOS_API_*` environment variables, a KDL config file, built-in
//! defaults. The [`schema`] module defines the file format; the [`resolver`]
//! module merges the layers and records where each value came from.
//!
//! ## config.kdl
//!
//! Located at `--config <path>`, `$NAGIOS_API_CONFIG`, or
//! `~/.config/nagios-api/config.kdl` if that file exists.
//!
//! The object cache and status file paths are carried for operators and
//! reported by `config show`; the server itself only writes to the command
//! file.

pub mod resolver;
pub mod schema;

pub use resolver::{
    ConfigOverrides, Resolved, ResolvedSettings, ValueSource, default_config_path, resolve_config,
    resolve_config_with,
};
pub use schema::{ApiConfig, LogFormat};
