//! In-process command sink.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use super::{ChannelError, CommandSink, envelope};
use crate::clock::{Clock, SystemClock};
use crate::protocol::CommandLine;

/// Records enveloped commands in memory instead of writing them out.
///
/// Useful for exercising the HTTP layer without a daemon. A failing channel
/// rejects every write but still counts the attempt.
pub struct MemoryChannel {
    clock: Arc<dyn Clock>,
    entries: Mutex<Vec<String>>,
    attempts: AtomicUsize,
    fail: bool,
}

impl MemoryChannel {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            entries: Mutex::new(Vec::new()),
            attempts: AtomicUsize::new(0),
            fail: false,
        }
    }

    /// A channel whose every write fails.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(Arc::new(SystemClock))
        }
    }

    /// Enveloped entries in write order.
    pub fn entries(&self) -> Vec<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Everything written so far, concatenated as it would appear on disk.
    pub fn contents(&self) -> String {
        self.entries().concat()
    }

    /// Number of times `submit` was called, successful or not.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl CommandSink for MemoryChannel {
    fn submit(&self, line: &CommandLine, deadline: Instant) -> Result<(), ChannelError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ChannelError::Unavailable("memory channel is closed".to_string()));
        }
        if Instant::now() >= deadline {
            return Err(ChannelError::TimedOut);
        }

        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.push(envelope(self.clock.now_unix(), line));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::protocol::{CommandRequest, catalog, encode};
    use std::time::Duration;

    fn soon() -> Instant {
        Instant::now() + Duration::from_secs(5)
    }

    fn notifications_off() -> CommandLine {
        encode(
            catalog::find("DISABLE_NOTIFICATIONS").unwrap(),
            &CommandRequest::empty(),
            0,
        )
        .unwrap()
    }

    #[test]
    fn test_records_entries_and_attempts() {
        let channel = MemoryChannel::new(Arc::new(FixedClock(5)));
        channel.submit(&notifications_off(), soon()).unwrap();
        channel.submit(&notifications_off(), soon()).unwrap();

        assert_eq!(channel.attempts(), 2);
        assert_eq!(
            channel.entries(),
            vec![
                "[5] DISABLE_NOTIFICATIONS\n".to_string(),
                "[5] DISABLE_NOTIFICATIONS\n".to_string()
            ]
        );
    }

    #[test]
    fn test_failing_channel_counts_attempts() {
        let channel = MemoryChannel::failing();
        assert!(channel.submit(&notifications_off(), soon()).is_err());
        assert_eq!(channel.attempts(), 1);
        assert!(channel.entries().is_empty());
    }

    #[test]
    fn test_expired_deadline_records_nothing() {
        let channel = MemoryChannel::new(Arc::new(FixedClock(5)));
        let err = channel
            .submit(&notifications_off(), Instant::now())
            .unwrap_err();

        assert!(matches!(err, ChannelError::TimedOut));
        assert_eq!(channel.attempts(), 1);
        assert!(channel.entries().is_empty());
    }
}
