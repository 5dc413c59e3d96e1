//! Delivery of encoded commands to the monitoring daemon.
//!
//! The daemon reads commands from a single file or named pipe. Every line is
//! wrapped in an envelope carrying the time of the write:
//!
//! ```text
//! [1700000000] ADD_HOST_COMMENT;web01;1;alice;rebooting
//! ```
//!
//! Sinks must never let two writers' bytes interleave. [`CommandFile`] holds
//! a mutex for the duration of each write; [`ChannelWriter`] moves the
//! blocking write off the async runtime and hands the sink a deadline.
//!
//! A sink that reports [`ChannelError::TimedOut`] has written nothing, so a
//! client may safely retry.

mod file;
mod memory;

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::protocol::CommandLine;

pub use file::CommandFile;
pub use memory::MemoryChannel;

/// Failure to hand a command to the daemon.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("failed to open command file: {0}")]
    Open(#[source] std::io::Error),

    #[error("failed to write command file: {0}")]
    Write(#[source] std::io::Error),

    #[error("command was not written before the write deadline")]
    TimedOut,

    #[error("command channel unavailable: {0}")]
    Unavailable(String),
}

/// Destination for encoded command lines.
///
/// `submit` blocks until the whole envelope is written or fails. Once
/// `deadline` has passed a sink must not start writing; it returns
/// [`ChannelError::TimedOut`] instead. A write already under way is finished
/// so the channel never holds half a line.
pub trait CommandSink: Send + Sync {
    fn submit(&self, line: &CommandLine, deadline: Instant) -> Result<(), ChannelError>;
}

/// Render the envelope the daemon expects around a command line.
pub fn envelope(timestamp: i64, line: &CommandLine) -> String {
    format!("[{}] {}\n", timestamp, line)
}

/// Async front end over a blocking [`CommandSink`].
#[derive(Clone)]
pub struct ChannelWriter {
    sink: Arc<dyn CommandSink>,
    timeout: Duration,
}

impl ChannelWriter {
    pub fn new(sink: Arc<dyn CommandSink>, timeout: Duration) -> Self {
        Self { sink, timeout }
    }

    /// Write one line, giving the sink `timeout` to start the write.
    ///
    /// The result is whatever the sink decided, so an error always means the
    /// line was not written.
    pub async fn write(&self, line: CommandLine) -> Result<(), ChannelError> {
        let sink = Arc::clone(&self.sink);
        let deadline = Instant::now() + self.timeout;

        tokio::task::spawn_blocking(move || sink.submit(&line, deadline))
            .await
            .map_err(|join_err| ChannelError::Unavailable(join_err.to_string()))?
    }
}
