//! Precedence resolution for server settings.
//!
//! ## Precedence (highest to lowest)
//!
//! 1. CLI flags
//! 2. `NAGIOS_API_*` environment variables
//! 3. config.kdl (`--config`, `NAGIOS_API_CONFIG`, or
//!    `~/.config/nagios-api/config.kdl` when present)
//! 4. Built-in defaults

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Serialize;

use super::schema::{ApiConfig, LogFormat, validate_write_timeout};
use crate::{Error, Result};

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "NAGIOS_API_CONFIG";
pub const LISTEN_ENV: &str = "NAGIOS_API_LISTEN";
pub const COMMAND_FILE_ENV: &str = "NAGIOS_API_COMMAND_FILE";
pub const OBJECT_CACHE_FILE_ENV: &str = "NAGIOS_API_OBJECT_CACHE_FILE";
pub const STATUS_FILE_ENV: &str = "NAGIOS_API_STATUS_FILE";
pub const WRITE_TIMEOUT_ENV: &str = "NAGIOS_API_WRITE_TIMEOUT_MS";
pub const LOG_FORMAT_ENV: &str = "NAGIOS_API_LOG_FORMAT";
pub const LOG_FILTER_ENV: &str = "NAGIOS_API_LOG";

pub const DEFAULT_LISTEN: &str = "127.0.0.1:8080";
pub const DEFAULT_COMMAND_FILE: &str = "/usr/local/nagios/var/rw/nagios.cmd";
pub const DEFAULT_OBJECT_CACHE_FILE: &str = "/usr/local/nagios/var/objects.cache";
pub const DEFAULT_STATUS_FILE: &str = "/usr/local/nagios/var/status.dat";
pub const DEFAULT_WRITE_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Tracks where a resolved value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueSource {
    /// Value from CLI flag
    CliFlag,
    /// Value from environment variable
    EnvVar(String),
    /// Value from a config.kdl file
    ConfigFile(PathBuf),
    /// Built-in default value
    Default,
}

impl std::fmt::Display for ValueSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueSource::CliFlag => write!(f, "cli"),
            ValueSource::EnvVar(name) => write!(f, "env:{}", name),
            ValueSource::ConfigFile(path) => write!(f, "file:{}", path.display()),
            ValueSource::Default => write!(f, "default"),
        }
    }
}

impl Serialize for ValueSource {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A resolved value with its source.
#[derive(Debug, Clone, Serialize)]
pub struct Resolved<T> {
    /// The resolved value
    pub value: T,
    /// Where the value came from
    pub source: ValueSource,
}

impl<T> Resolved<T> {
    pub fn new(value: T, source: ValueSource) -> Self {
        Self { value, source }
    }
}

/// Values given on the command line. `None` means "not specified".
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config_path: Option<PathBuf>,
    pub listen: Option<SocketAddr>,
    pub command_file: Option<PathBuf>,
    pub object_cache_file: Option<PathBuf>,
    pub status_file: Option<PathBuf>,
    pub write_timeout_ms: Option<u64>,
    pub log_format: Option<LogFormat>,
    pub log_filter: Option<String>,
}

/// Fully resolved settings with source tracking.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedSettings {
    /// Config file that was loaded, if any
    pub config_file: Option<PathBuf>,
    pub listen: Resolved<SocketAddr>,
    pub command_file: Resolved<PathBuf>,
    pub object_cache_file: Resolved<PathBuf>,
    pub status_file: Resolved<PathBuf>,
    pub write_timeout_ms: Resolved<u64>,
    pub log_format: Resolved<LogFormat>,
    pub log_filter: Resolved<String>,
}

impl ResolvedSettings {
    pub fn listen(&self) -> SocketAddr {
        self.listen.value
    }

    pub fn command_file(&self) -> &Path {
        &self.command_file.value
    }

    pub fn write_timeout(&self) -> Duration {
        Duration::from_millis(self.write_timeout_ms.value)
    }

    pub fn log_format(&self) -> LogFormat {
        self.log_format.value
    }

    pub fn log_filter(&self) -> &str {
        &self.log_filter.value
    }
}

/// Default config file location (`~/.config/nagios-api/config.kdl`).
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("nagios-api").join("config.kdl"))
}

/// Resolve settings from CLI overrides, the process environment, the config
/// file and defaults.
pub fn resolve_config(overrides: &ConfigOverrides) -> Result<ResolvedSettings> {
    resolve_config_with(
        overrides,
        |name| std::env::var(name).ok(),
        default_config_path(),
    )
}

/// Resolve settings with an injected environment and default file location.
///
/// The default file is only read if it exists; an explicitly named file must
/// exist.
pub fn resolve_config_with<F>(
    overrides: &ConfigOverrides,
    env: F,
    default_path: Option<PathBuf>,
) -> Result<ResolvedSettings>
where
    F: Fn(&str) -> Option<String>,
{
    let explicit_path = overrides
        .config_path
        .clone()
        .or_else(|| env(CONFIG_PATH_ENV).map(PathBuf::from));

    let (config_file, file) = match explicit_path {
        Some(path) => {
            let config = load_config_file(&path)?;
            (Some(path), config)
        }
        None => match default_path.filter(|path| path.is_file()) {
            Some(path) => {
                let config = load_config_file(&path)?;
                (Some(path), config)
            }
            None => (None, ApiConfig::new()),
        },
    };

    let layers = Layers {
        env: &env,
        file_path: config_file.as_deref(),
    };

    let listen = layers.pick(
        overrides.listen,
        LISTEN_ENV,
        file.listen
            .as_deref()
            .map(parse_listen)
            .transpose()
            .map_err(Error::Config)?,
        parse_listen,
        || parse_listen(DEFAULT_LISTEN),
    )?;

    let command_file = layers.pick(
        overrides.command_file.clone(),
        COMMAND_FILE_ENV,
        file.command_file.clone(),
        |s| Ok(PathBuf::from(s)),
        || Ok(PathBuf::from(DEFAULT_COMMAND_FILE)),
    )?;

    let object_cache_file = layers.pick(
        overrides.object_cache_file.clone(),
        OBJECT_CACHE_FILE_ENV,
        file.object_cache_file.clone(),
        |s| Ok(PathBuf::from(s)),
        || Ok(PathBuf::from(DEFAULT_OBJECT_CACHE_FILE)),
    )?;

    let status_file = layers.pick(
        overrides.status_file.clone(),
        STATUS_FILE_ENV,
        file.status_file.clone(),
        |s| Ok(PathBuf::from(s)),
        || Ok(PathBuf::from(DEFAULT_STATUS_FILE)),
    )?;

    let write_timeout_ms = layers.pick(
        overrides.write_timeout_ms,
        WRITE_TIMEOUT_ENV,
        file.write_timeout_ms,
        |s| {
            s.trim()
                .parse::<u64>()
                .map_err(|_| {
                    format!(
                        "{} must be a number of milliseconds, got \"{}\"",
                        WRITE_TIMEOUT_ENV, s
                    )
                })
        },
        || Ok(DEFAULT_WRITE_TIMEOUT_MS),
    )?;
    validate_write_timeout(write_timeout_ms.value).map_err(Error::Config)?;

    let log_format = layers.pick(
        overrides.log_format,
        LOG_FORMAT_ENV,
        file.log_format,
        |s| {
            LogFormat::parse(s).ok_or_else(|| {
                format!("{} must be \"plaintext\" or \"json\", got \"{}\"", LOG_FORMAT_ENV, s)
            })
        },
        || Ok(LogFormat::default()),
    )?;

    let log_filter = layers.pick(
        overrides.log_filter.clone(),
        LOG_FILTER_ENV,
        file.log_filter.clone(),
        |s| Ok(s.to_string()),
        || Ok(DEFAULT_LOG_FILTER.to_string()),
    )?;

    Ok(ResolvedSettings {
        config_file,
        listen,
        command_file,
        object_cache_file,
        status_file,
        write_timeout_ms,
        log_format,
        log_filter,
    })
}

/// The environment and file layers shared by every setting.
struct Layers<'a, F> {
    env: &'a F,
    file_path: Option<&'a Path>,
}

impl<F> Layers<'_, F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Pick the highest-precedence value for one setting.
    ///
    /// Empty environment variables are treated as unset.
    fn pick<T>(
        &self,
        cli: Option<T>,
        env_name: &str,
        file: Option<T>,
        parse_env: impl Fn(&str) -> std::result::Result<T, String>,
        default: impl FnOnce() -> std::result::Result<T, String>,
    ) -> Result<Resolved<T>> {
        if let Some(value) = cli {
            return Ok(Resolved::new(value, ValueSource::CliFlag));
        }

        if let Some(raw) = (self.env)(env_name).filter(|raw| !raw.trim().is_empty()) {
            let value = parse_env(&raw).map_err(Error::Config)?;
            return Ok(Resolved::new(value, ValueSource::EnvVar(env_name.to_string())));
        }

        if let (Some(value), Some(path)) = (file, self.file_path) {
            return Ok(Resolved::new(value, ValueSource::ConfigFile(path.to_path_buf())));
        }

        let value = default().map_err(Error::Config)?;
        Ok(Resolved::new(value, ValueSource::Default))
    }
}

fn parse_listen(raw: &str) -> std::result::Result<SocketAddr, String> {
    raw.trim()
        .parse()
        .map_err(|e| format!("invalid listen address \"{}\": {}", raw, e))
}

fn load_config_file(path: &Path) -> Result<ApiConfig> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!("failed to read config file {}: {}", path.display(), e))
    })?;
    ApiConfig::parse(&text)
        .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + use<> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    fn write_config(dir: &TempDir, contents: &str) -> PathBuf {
        let path = dir.path().join("config.kdl");
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_defaults() {
        let settings = resolve_config_with(&ConfigOverrides::default(), no_env, None).unwrap();

        assert_eq!(settings.listen(), "127.0.0.1:8080".parse::<SocketAddr>().unwrap());
        assert_eq!(settings.listen.source, ValueSource::Default);
        assert_eq!(settings.command_file(), Path::new(DEFAULT_COMMAND_FILE));
        assert_eq!(settings.object_cache_file.value, PathBuf::from(DEFAULT_OBJECT_CACHE_FILE));
        assert_eq!(settings.status_file.value, PathBuf::from(DEFAULT_STATUS_FILE));
        assert_eq!(settings.write_timeout(), Duration::from_secs(5));
        assert_eq!(settings.log_format(), LogFormat::Plaintext);
        assert_eq!(settings.log_filter(), "info");
        assert_eq!(settings.config_file, None);
    }

    #[test]
    fn test_precedence_cli_over_env_over_file() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            "listen \"10.0.0.1:9000\"\ncommand-file \"/file/nagios.cmd\"\nstatus-file \"/file/status.dat\"",
        );
        let overrides = ConfigOverrides {
            config_path: Some(path.clone()),
            listen: Some("127.0.0.1:7000".parse().unwrap()),
            ..ConfigOverrides::default()
        };
        let env = env_from(&[
            (LISTEN_ENV, "127.0.0.1:7001"),
            (COMMAND_FILE_ENV, "/env/nagios.cmd"),
        ]);

        let settings = resolve_config_with(&overrides, env, None).unwrap();

        assert_eq!(settings.listen().port(), 7000);
        assert_eq!(settings.listen.source, ValueSource::CliFlag);
        assert_eq!(settings.command_file(), Path::new("/env/nagios.cmd"));
        assert_eq!(
            settings.command_file.source,
            ValueSource::EnvVar(COMMAND_FILE_ENV.to_string())
        );
        assert_eq!(settings.status_file.value, PathBuf::from("/file/status.dat"));
        assert_eq!(settings.status_file.source, ValueSource::ConfigFile(path.clone()));
        assert_eq!(settings.log_filter.source, ValueSource::Default);
        assert_eq!(settings.config_file, Some(path));
    }

    #[test]
    fn test_config_path_from_env() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "write-timeout-ms 750");
        let env = env_from(&[(CONFIG_PATH_ENV, path.to_str().unwrap())]);

        let settings = resolve_config_with(&ConfigOverrides::default(), env, None).unwrap();

        assert_eq!(settings.write_timeout(), Duration::from_millis(750));
        assert_eq!(settings.write_timeout_ms.source, ValueSource::ConfigFile(path));
    }

    #[test]
    fn test_default_path_used_only_when_present() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.kdl");
        let settings =
            resolve_config_with(&ConfigOverrides::default(), no_env, Some(missing)).unwrap();
        assert_eq!(settings.config_file, None);

        let present = write_config(&dir, "log-format \"json\"");
        let settings =
            resolve_config_with(&ConfigOverrides::default(), no_env, Some(present.clone()))
                .unwrap();
        assert_eq!(settings.log_format(), LogFormat::Json);
        assert_eq!(settings.config_file, Some(present));
    }

    #[test]
    fn test_explicit_missing_config_is_error() {
        let dir = TempDir::new().unwrap();
        let overrides = ConfigOverrides {
            config_path: Some(dir.path().join("nope.kdl")),
            ..ConfigOverrides::default()
        };
        let err = resolve_config_with(&overrides, no_env, None).unwrap_err();
        assert!(matches!(err, Error::Config(msg) if msg.contains("failed to read config file")));
    }

    #[test]
    fn test_invalid_config_file_is_error() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "listen \"not an address\"");
        let overrides = ConfigOverrides {
            config_path: Some(path),
            ..ConfigOverrides::default()
        };
        let err = resolve_config_with(&overrides, no_env, None).unwrap_err();
        assert!(matches!(err, Error::Config(msg) if msg.contains("invalid listen address")));
    }

    #[test]
    fn test_invalid_env_values_are_errors() {
        let cases = [
            (WRITE_TIMEOUT_ENV, "soon"),
            (WRITE_TIMEOUT_ENV, "0"),
            (LOG_FORMAT_ENV, "xml"),
            (LISTEN_ENV, "localhost"),
        ];
        for (name, value) in cases {
            let result = resolve_config_with(&ConfigOverrides::default(), env_from(&[(name, value)]), None);
            assert!(matches!(result, Err(Error::Config(_))), "{}={}", name, value);
        }
    }

    #[test]
    fn test_empty_env_is_ignored() {
        let env = env_from(&[(LISTEN_ENV, "  ")]);
        let settings = resolve_config_with(&ConfigOverrides::default(), env, None).unwrap();
        assert_eq!(settings.listen.source, ValueSource::Default);
    }

    #[test]
    fn test_value_source_display() {
        assert_eq!(ValueSource::CliFlag.to_string(), "cli");
        assert_eq!(ValueSource::EnvVar("X".to_string()).to_string(), "env:X");
        assert_eq!(
            ValueSource::ConfigFile(PathBuf::from("/etc/a.kdl")).to_string(),
            "file:/etc/a.kdl"
        );
        assert_eq!(ValueSource::Default.to_string(), "default");
    }
}
