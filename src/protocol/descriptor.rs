//! Static descriptions of external commands.
//!
//! A [`CommandSpec`] lists the fields of one command in wire order along with
//! how each field is decoded and defaulted. The codec walks this list, so a
//! command's behavior is fully determined by its descriptor.

use serde::Serialize;

/// How a field's JSON value is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// A JSON string, written verbatim.
    Text,
    /// A JSON integer (timestamps, durations, trigger ids).
    Integer,
    /// A small unsigned JSON integer in `0..=255`.
    Flag,
    /// A JSON string or non-negative integer (comment ids).
    Identifier,
}

impl FieldKind {
    /// Description used in decode errors.
    pub fn expected(&self) -> &'static str {
        match self {
            FieldKind::Text => "a string",
            FieldKind::Integer => "an integer",
            FieldKind::Flag => "an integer between 0 and 255",
            FieldKind::Identifier => "a string or a non-negative integer",
        }
    }
}

/// Value substituted when an optional field is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DefaultValue {
    Text(&'static str),
    Number(i64),
}

/// Whether a field must be supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// Absent, null, or blank input is rejected.
    Required,
    /// Absent input takes the default. For numeric fields a zero is
    /// indistinguishable from absence and also takes the default.
    Optional(DefaultValue),
}

/// One field of a command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Canonical JSON key.
    pub name: &'static str,
    /// Other accepted JSON keys.
    pub aliases: &'static [&'static str],
    pub kind: FieldKind,
    pub requirement: Requirement,
}

impl FieldSpec {
    pub const fn required(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            aliases: &[],
            kind,
            requirement: Requirement::Required,
        }
    }

    /// Optional text field defaulting to the empty string.
    pub const fn optional_text(name: &'static str) -> Self {
        Self {
            name,
            aliases: &[],
            kind: FieldKind::Text,
            requirement: Requirement::Optional(DefaultValue::Text("")),
        }
    }

    /// Numeric field where absent or zero input becomes `default`.
    pub const fn defaulted(name: &'static str, kind: FieldKind, default: i64) -> Self {
        Self {
            name,
            aliases: &[],
            kind,
            requirement: Requirement::Optional(DefaultValue::Number(default)),
        }
    }

    pub const fn with_aliases(self, aliases: &'static [&'static str]) -> Self {
        Self { aliases, ..self }
    }

    pub fn is_required(&self) -> bool {
        matches!(self.requirement, Requirement::Required)
    }

    pub fn default_value(&self) -> Option<DefaultValue> {
        match self.requirement {
            Requirement::Required => None,
            Requirement::Optional(value) => Some(value),
        }
    }
}

/// Cross-field checks run after every field has been resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// `earlier` must be strictly less than `later`.
    Before {
        earlier: &'static str,
        later: &'static str,
    },
    /// The named integer field must be greater than zero.
    Positive(&'static str),
}

/// Token appended after the regular fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trailer {
    None,
    /// `[<unix time>]` taken from the clock when the line is encoded.
    CheckTime,
}

/// Full description of one external command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandSpec {
    /// Protocol keyword, e.g. `ACKNOWLEDGE_HOST_PROBLEM`.
    pub name: &'static str,
    /// One-line description shown in listings.
    pub summary: &'static str,
    /// Fields in wire order.
    pub fields: &'static [FieldSpec],
    pub rules: &'static [Rule],
    pub trailer: Trailer,
}

impl CommandSpec {
    /// HTTP route serving this command.
    pub fn route(&self) -> String {
        format!("/{}", self.name.to_ascii_lowercase())
    }

    /// Commands without fields ignore the request body entirely.
    pub fn takes_body(&self) -> bool {
        !self.fields.is_empty()
    }

    /// Human-readable wire template, e.g. `ADD_HOST_COMMENT;<hostname>;...`.
    pub fn wire_shape(&self) -> String {
        let mut shape = self.name.to_string();
        for field in self.fields {
            shape.push_str(&format!(";<{}>", field.name));
        }
        if self.trailer == Trailer::CheckTime {
            shape.push_str(";[<now>]");
        }
        shape
    }
}
