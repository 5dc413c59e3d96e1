//! The Nagios external command protocol.
//!
//! Requests arrive as JSON objects ([`CommandRequest`]), are checked against a
//! static [`CommandSpec`] from the [`catalog`], and come out as a
//! [`CommandLine`] such as `ADD_HOST_COMMENT;web01;1;alice;rebooting`.
//! Encoding is pure; writing the line to the daemon is the job of
//! [`crate::channel`].

pub mod catalog;
mod codec;
mod descriptor;
mod errors;
mod request;

pub use codec::{CommandLine, encode};
pub use descriptor::{CommandSpec, DefaultValue, FieldKind, FieldSpec, Requirement, Rule, Trailer};
pub use errors::{CommandError, DecodeError, ValidationError};
pub use request::CommandRequest;

/// Decode `body` for `spec` and encode it in one step.
///
/// Commands without fields never look at the body, so an empty or malformed
/// body is accepted for them.
pub fn encode_body(spec: &CommandSpec, body: &[u8], now: i64) -> Result<CommandLine, CommandError> {
    let request = if spec.takes_body() {
        CommandRequest::from_slice(body)?
    } else {
        CommandRequest::empty()
    };
    encode(spec, &request, now)
}
