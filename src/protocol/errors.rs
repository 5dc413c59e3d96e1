//! Failures raised while turning a request body into a command line.

/// The request body could not be read as the shape a command expects.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("{0}")]
    Json(String),

    #[error("request body must be a JSON object")]
    NotAnObject,

    #[error("field '{field}' must be {expected}")]
    FieldType {
        field: &'static str,
        expected: &'static str,
    },
}

impl From<serde_json::Error> for DecodeError {
    fn from(err: serde_json::Error) -> Self {
        DecodeError::Json(err.to_string())
    }
}

/// The request decoded cleanly but breaks a rule of the command.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} field is required")]
    MissingField(&'static str),

    #[error("{field} must not contain ';' or line breaks")]
    Delimiter { field: &'static str },

    #[error("{earlier} must be less than {later}")]
    Order {
        earlier: &'static str,
        later: &'static str,
    },

    #[error("{0} must be greater than 0 seconds")]
    NotPositive(&'static str),
}

/// Either failure the codec can produce. Both are the caller's fault.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}
