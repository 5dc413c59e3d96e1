//! The daemon's command file or named pipe.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use super::{ChannelError, CommandSink, envelope};
use crate::clock::Clock;
use crate::protocol::CommandLine;

/// Pause between attempts while a full pipe drains.
const RETRY_INTERVAL: Duration = Duration::from_millis(5);

/// Appends enveloped commands to the configured command file.
///
/// The target is opened for each write and never created. A missing file
/// usually means the daemon is not running and surfaces as
/// [`ChannelError::Open`]. The open is non-blocking, so a pipe nobody is
/// reading fails at once (`ENXIO`) instead of parking the writer until the
/// daemon returns.
pub struct CommandFile {
    path: PathBuf,
    clock: Arc<dyn Clock>,
    lock: Mutex<()>,
}

impl CommandFile {
    pub fn new(path: impl Into<PathBuf>, clock: Arc<dyn Clock>) -> Self {
        Self {
            path: path.into(),
            clock,
            lock: Mutex::new(()),
        }
    }

    fn open(&self) -> Result<File, ChannelError> {
        let mut options = OpenOptions::new();
        options.append(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.custom_flags(libc::O_NONBLOCK);
        }
        options.open(&self.path).map_err(ChannelError::Open)
    }
}

impl CommandSink for CommandFile {
    fn submit(&self, line: &CommandLine, deadline: Instant) -> Result<(), ChannelError> {
        // The guard protects no data; a panic mid-write leaves nothing to repair.
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        if Instant::now() >= deadline {
            return Err(ChannelError::TimedOut);
        }

        let mut file = self.open()?;
        let entry = envelope(self.clock.now_unix(), line);
        write_entry(&mut file, entry.as_bytes(), deadline)?;
        file.flush().map_err(ChannelError::Write)?;

        Ok(())
    }
}

/// Write all of `bytes`, waiting out a full pipe until `deadline`.
///
/// Gives up only while nothing has been written; a partial entry is always
/// completed.
fn write_entry(file: &mut File, bytes: &[u8], deadline: Instant) -> Result<(), ChannelError> {
    let mut written = 0;
    while written < bytes.len() {
        match file.write(&bytes[written..]) {
            Ok(0) => return Err(ChannelError::Write(io::ErrorKind::WriteZero.into())),
            Ok(n) => written += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => {
                if written == 0 && Instant::now() >= deadline {
                    return Err(ChannelError::TimedOut);
                }
                std::thread::sleep(RETRY_INTERVAL);
            }
            Err(e) => return Err(ChannelError::Write(e)),
        }
    }
    Ok(())
}
