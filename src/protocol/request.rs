//! Decoded request bodies.

use std::collections::HashMap;

use serde_json::Value;

use super::descriptor::FieldSpec;
use super::errors::DecodeError;

/// The named fields of one incoming request.
///
/// Keys are matched case-insensitively with underscores ignored, so
/// `service_description`, `ServiceDescription` and `servicedescription` all
/// address the same field. Keys no command asks for are ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandRequest {
    fields: HashMap<String, Value>,
}

impl CommandRequest {
    /// A request with no fields.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Decode a JSON object from a raw request body.
    pub fn from_slice(body: &[u8]) -> Result<Self, DecodeError> {
        let value: Value = serde_json::from_slice(body)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, DecodeError> {
        match value {
            Value::Object(map) => Ok(Self {
                fields: map
                    .into_iter()
                    .map(|(key, value)| (normalize_key(&key), value))
                    .collect(),
            }),
            _ => Err(DecodeError::NotAnObject),
        }
    }

    /// Value supplied for `field` under its name or any alias.
    ///
    /// A JSON `null` reads as absent.
    pub fn get(&self, field: &FieldSpec) -> Option<&Value> {
        std::iter::once(field.name)
            .chain(field.aliases.iter().copied())
            .filter_map(|key| self.fields.get(&normalize_key(key)))
            .find(|value| !value.is_null())
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

fn normalize_key(key: &str) -> String {
    key.chars()
        .filter(|c| *c != '_')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::descriptor::FieldKind;

    const SERVICE: FieldSpec = FieldSpec::required("service_description", FieldKind::Text);
    const ALIASED: FieldSpec =
        FieldSpec::required("service", FieldKind::Text).with_aliases(&["service_description"]);

    #[test]
    fn test_keys_match_case_insensitively() {
        for key in ["service_description", "ServiceDescription", "servicedescription"] {
            let body = format!(r#"{{"{}": "http"}}"#, key);
            let request = CommandRequest::from_slice(body.as_bytes()).unwrap();
            assert_eq!(request.get(&SERVICE), Some(&Value::from("http")), "{}", key);
        }
    }

    #[test]
    fn test_alias_lookup() {
        let request = CommandRequest::from_slice(br#"{"service_description": "ssh"}"#).unwrap();
        assert_eq!(request.get(&ALIASED), Some(&Value::from("ssh")));
    }

    #[test]
    fn test_null_reads_as_absent() {
        let request = CommandRequest::from_slice(br#"{"service": null}"#).unwrap();
        assert_eq!(request.get(&ALIASED), None);
    }

    #[test]
    fn test_malformed_json_is_decode_error() {
        let err = CommandRequest::from_slice(b"{\"hostname\": ").unwrap_err();
        assert!(matches!(err, DecodeError::Json(_)));
    }

    #[test]
    fn test_empty_body_is_decode_error() {
        let err = CommandRequest::from_slice(b"").unwrap_err();
        assert!(matches!(err, DecodeError::Json(_)));
    }

    #[test]
    fn test_non_object_is_rejected() {
        assert_eq!(
            CommandRequest::from_slice(b"[1, 2]").unwrap_err(),
            DecodeError::NotAnObject
        );
        assert_eq!(
            CommandRequest::from_slice(b"\"hostname\"").unwrap_err(),
            DecodeError::NotAnObject
        );
    }

    #[test]
    fn test_empty_request() {
        assert!(CommandRequest::empty().is_empty());
        assert!(!CommandRequest::from_slice(br#"{"a": 1}"#).unwrap().is_empty());
    }
}
