//! Validation, defaulting and serialization of command lines.

use std::fmt;

use serde_json::Value;

use super::descriptor::{CommandSpec, DefaultValue, FieldKind, FieldSpec, Requirement, Rule, Trailer};
use super::errors::{CommandError, DecodeError, ValidationError};
use super::request::CommandRequest;

/// A fully encoded external command, without the timestamp envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    name: &'static str,
    fields: Vec<String>,
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)?;
        for field in &self.fields {
            write!(f, ";{}", field)?;
        }
        Ok(())
    }
}

/// A field after decoding and defaulting.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Resolved {
    Text(String),
    Number(i64),
}

impl Resolved {
    fn into_wire(self) -> String {
        match self {
            Resolved::Text(text) => text,
            Resolved::Number(n) => n.to_string(),
        }
    }
}

/// Encode `request` as the command described by `spec`.
///
/// `now` is the unix time used for a trailing check-time token; it is ignored
/// by commands that do not carry one. Nothing is written anywhere.
pub fn encode(
    spec: &CommandSpec,
    request: &CommandRequest,
    now: i64,
) -> Result<CommandLine, CommandError> {
    let mut values = Vec::with_capacity(spec.fields.len());
    for field in spec.fields {
        values.push(resolve_field(field, request)?);
    }

    for rule in spec.rules {
        check_rule(rule, spec.fields, &values)?;
    }

    let mut fields: Vec<String> = values.into_iter().map(Resolved::into_wire).collect();
    if spec.trailer == Trailer::CheckTime {
        fields.push(format!("[{}]", now));
    }

    Ok(CommandLine {
        name: spec.name,
        fields,
    })
}

fn resolve_field(field: &FieldSpec, request: &CommandRequest) -> Result<Resolved, CommandError> {
    let decoded = request.get(field).map(|value| decode(field, value)).transpose()?;

    let resolved = match (field.requirement, decoded) {
        (Requirement::Required, None) => return Err(ValidationError::MissingField(field.name).into()),
        (Requirement::Required, Some(Resolved::Text(text))) if text.trim().is_empty() => {
            return Err(ValidationError::MissingField(field.name).into());
        }
        (Requirement::Required, Some(value)) => value,
        // Zero is how an omitted numeric field decodes, so it takes the default too.
        (Requirement::Optional(default), None | Some(Resolved::Number(0))) => match default {
            DefaultValue::Text(text) => Resolved::Text(text.to_string()),
            DefaultValue::Number(n) => Resolved::Number(n),
        },
        (Requirement::Optional(_), Some(value)) => value,
    };

    if let Resolved::Text(text) = &resolved {
        if text.contains([';', '\n', '\r']) {
            return Err(ValidationError::Delimiter { field: field.name }.into());
        }
    }

    Ok(resolved)
}

fn decode(field: &FieldSpec, value: &Value) -> Result<Resolved, DecodeError> {
    let mismatch = || DecodeError::FieldType {
        field: field.name,
        expected: field.kind.expected(),
    };

    match field.kind {
        FieldKind::Text => value
            .as_str()
            .map(|s| Resolved::Text(s.to_string()))
            .ok_or_else(mismatch),
        FieldKind::Integer => value.as_i64().map(Resolved::Number).ok_or_else(mismatch),
        FieldKind::Flag => value
            .as_u64()
            .filter(|n| *n <= u64::from(u8::MAX))
            .map(|n| Resolved::Number(n as i64))
            .ok_or_else(mismatch),
        FieldKind::Identifier => match value {
            Value::String(s) => Ok(Resolved::Text(s.clone())),
            Value::Number(n) => n
                .as_u64()
                .map(|id| Resolved::Text(id.to_string()))
                .ok_or_else(mismatch),
            _ => Err(mismatch()),
        },
    }
}

fn check_rule(rule: &Rule, fields: &[FieldSpec], values: &[Resolved]) -> Result<(), ValidationError> {
    let number = |name: &str| {
        fields
            .iter()
            .zip(values)
            .find(|(field, _)| field.name == name)
            .and_then(|(_, value)| match value {
                Resolved::Number(n) => Some(*n),
                Resolved::Text(_) => None,
            })
    };

    match *rule {
        Rule::Before { earlier, later } => match (number(earlier), number(later)) {
            (Some(a), Some(b)) if a < b => Ok(()),
            _ => Err(ValidationError::Order { earlier, later }),
        },
        Rule::Positive(name) => match number(name) {
            Some(n) if n > 0 => Ok(()),
            _ => Err(ValidationError::NotPositive(name)),
        },
    }
}
