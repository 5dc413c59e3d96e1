//! HTTP error mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::channel::ChannelError;
use crate::protocol::{CommandError, DecodeError, ValidationError};

/// Body returned when the command could not be written.
pub const WRITE_FAILED_BODY: &str = "Could not execute command";

/// Failure of a command endpoint.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Error: {0}")]
    Decode(DecodeError),

    #[error("Error: {0}")]
    Validation(ValidationError),

    #[error("{}", WRITE_FAILED_BODY)]
    Channel(#[from] ChannelError),
}

impl From<CommandError> for ApiError {
    fn from(err: CommandError) -> Self {
        match err {
            CommandError::Decode(e) => ApiError::Decode(e),
            CommandError::Validation(e) => ApiError::Validation(e),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Decode(_) | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Channel(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Channel errors render as the generic body; paths and I/O detail stay in the log.
        (self.status(), self.to_string()).into_response()
    }
}
