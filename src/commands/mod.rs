//! Command implementations for the nagios-api CLI.
//!
//! Each function returns a result type implementing [`CommandResult`] so the
//! binary can print it as JSON (default) or human-readable text (`-H`).
//! The HTTP server reuses [`list_commands`] for `GET /commands`.

use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;

use crate::channel::{ChannelWriter, CommandFile};
use crate::clock::{Clock, SystemClock};
use crate::config::{ResolvedSettings, ValueSource};
use crate::protocol::{CommandSpec, DefaultValue, FieldKind, catalog, encode_body};
use crate::{Error, Result};

/// Command results that can be serialized to JSON or formatted for humans.
pub trait CommandResult {
    /// Serialize to JSON string.
    fn to_json(&self) -> String;

    /// Format for human-readable output.
    fn to_human(&self) -> String;
}

// === Catalog ===

/// One field of a catalog entry.
#[derive(Debug, Clone, Serialize)]
pub struct FieldInfo {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub kind: FieldKind,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<DefaultValue>,
}

/// One supported external command.
#[derive(Debug, Clone, Serialize)]
pub struct CommandInfo {
    pub name: &'static str,
    pub route: String,
    pub summary: &'static str,
    pub wire: String,
    pub fields: Vec<FieldInfo>,
}

impl From<&CommandSpec> for CommandInfo {
    fn from(spec: &CommandSpec) -> Self {
        Self {
            name: spec.name,
            route: spec.route(),
            summary: spec.summary,
            wire: spec.wire_shape(),
            fields: spec
                .fields
                .iter()
                .map(|field| FieldInfo {
                    name: field.name,
                    aliases: field.aliases,
                    kind: field.kind,
                    required: field.is_required(),
                    default: field.default_value(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CommandCatalog {
    pub count: usize,
    pub commands: Vec<CommandInfo>,
}

impl CommandResult for CommandCatalog {
    fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    fn to_human(&self) -> String {
        let mut lines = vec![format!("{} supported commands:", self.count)];
        for command in &self.commands {
            lines.push(String::new());
            lines.push(format!("POST {}  {}", command.route, command.summary));
            lines.push(format!("  {}", command.wire));
            for field in &command.fields {
                let detail = match (&field.default, field.required) {
                    (_, true) => "required".to_string(),
                    (Some(DefaultValue::Number(n)), false) => format!("default {}", n),
                    (Some(DefaultValue::Text(s)), false) if s.is_empty() => {
                        "optional".to_string()
                    }
                    (Some(DefaultValue::Text(s)), false) => format!("default \"{}\"", s),
                    (None, false) => "optional".to_string(),
                };
                lines.push(format!("    {:<22} {}", field.name, detail));
            }
        }
        lines.join("\n")
    }
}

/// List every supported command.
pub fn list_commands() -> CommandCatalog {
    let commands: Vec<CommandInfo> = catalog::all().iter().map(CommandInfo::from).collect();
    CommandCatalog {
        count: commands.len(),
        commands,
    }
}

// === Send ===

#[derive(Debug, Clone, Serialize)]
pub struct SendResult {
    pub command: &'static str,
    pub line: String,
    pub command_file: PathBuf,
}

impl CommandResult for SendResult {
    fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    fn to_human(&self) -> String {
        format!(
            "Sent {} to {}\n  {}",
            self.command,
            self.command_file.display(),
            self.line
        )
    }
}

/// Encode one command and write it to the configured command file.
///
/// `data` is the JSON body a client would POST; `None` sends an empty
/// object. The write is bounded by the configured write timeout.
pub async fn send(settings: &ResolvedSettings, name: &str, data: Option<&str>) -> Result<SendResult> {
    let spec = catalog::find(name).ok_or_else(|| Error::UnknownCommand(name.to_string()))?;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let body = data.unwrap_or("{}");
    let line = encode_body(spec, body.as_bytes(), clock.now_unix())?;
    let rendered = line.to_string();

    let sink = Arc::new(CommandFile::new(settings.command_file(), clock));
    ChannelWriter::new(sink, settings.write_timeout())
        .write(line)
        .await?;

    Ok(SendResult {
        command: spec.name,
        line: rendered,
        command_file: settings.command_file().to_path_buf(),
    })
}

// === Config ===

#[derive(Debug, Clone, Serialize)]
pub struct ConfigReport {
    #[serde(flatten)]
    pub settings: ResolvedSettings,
}

impl CommandResult for ConfigReport {
    fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    fn to_human(&self) -> String {
        let s = &self.settings;
        let mut lines = Vec::new();
        match &s.config_file {
            Some(path) => lines.push(format!("Config file: {}", path.display())),
            None => lines.push("Config file: (none)".to_string()),
        }
        lines.push(String::new());
        lines.push(row("listen", &s.listen.value.to_string(), &s.listen.source));
        lines.push(row(
            "command-file",
            &s.command_file.value.display().to_string(),
            &s.command_file.source,
        ));
        lines.push(row(
            "object-cache-file",
            &s.object_cache_file.value.display().to_string(),
            &s.object_cache_file.source,
        ));
        lines.push(row(
            "status-file",
            &s.status_file.value.display().to_string(),
            &s.status_file.source,
        ));
        lines.push(row(
            "write-timeout-ms",
            &s.write_timeout_ms.value.to_string(),
            &s.write_timeout_ms.source,
        ));
        lines.push(row(
            "log-format",
            s.log_format.value.as_str(),
            &s.log_format.source,
        ));
        lines.push(row("log-filter", &s.log_filter.value, &s.log_filter.source));
        lines.join("\n")
    }
}

fn row(key: &str, value: &str, source: &ValueSource) -> String {
    format!("  {:<18} {:<40} ({})", key, value, source)
}

/// Report the resolved configuration.
pub fn show_config(settings: &ResolvedSettings) -> ConfigReport {
    ConfigReport {
        settings: settings.clone(),
    }
}
