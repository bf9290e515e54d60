//! Waiting for a newly created file to finish being written.
//!
//! A file dropped by a copy or a download is often announced before its
//! writer is done with it. The waiter polls until the file can be opened for
//! read/write access and has nonzero length, the heuristic for "copy/save
//! finished".

use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

/// How long to keep polling before giving up on a file.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(10_000);

/// Pause between open attempts.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Ways a file can fail to become ready within the timeout window.
///
/// Both variants mean "skip this file, leave it in place". They are kept
/// separate because they describe different observations: `Timeout` carries
/// the last access error, `NeverGrew` means the file opened fine but stayed
/// empty.
#[derive(Debug)]
pub enum ReadinessError {
    /// The file stayed locked or unreadable for the whole window.
    Timeout { path: PathBuf, source: io::Error },
    /// The file opened cleanly every time but never grew past zero bytes.
    NeverGrew { path: PathBuf },
}

impl std::fmt::Display for ReadinessError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Timeout { path, source } => {
                write!(
                    f,
                    "{} not accessible within timeout: {}",
                    path.display(),
                    source
                )
            }
            Self::NeverGrew { path } => {
                write!(f, "{} stayed empty for the whole wait window", path.display())
            }
        }
    }
}

impl std::error::Error for ReadinessError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Timeout { source, .. } => Some(source),
            Self::NeverGrew { .. } => None,
        }
    }
}

/// Blocks until `path` is openable with read/write access and nonzero length.
///
/// A writer still holding the file (or a permission problem) shows up as an
/// open error and is retried every `poll_interval` until `timeout` has
/// elapsed. A successful open with zero length counts as "still writing" and
/// keeps polling too; if the file never grows, the wait ends with
/// [`ReadinessError::NeverGrew`].
pub fn wait_until_ready(
    path: &Path,
    timeout: Duration,
    poll_interval: Duration,
) -> Result<(), ReadinessError> {
    let started = Instant::now();

    loop {
        match OpenOptions::new().read(true).write(true).open(path) {
            Ok(file) => {
                let length = file.metadata().map(|m| m.len()).unwrap_or(0);
                if length > 0 {
                    return Ok(());
                }
                // Zero bytes: the writer may not have flushed its first block.
            }
            Err(source) => {
                if started.elapsed() >= timeout {
                    return Err(ReadinessError::Timeout {
                        path: path.to_path_buf(),
                        source,
                    });
                }
                thread::sleep(poll_interval);
                continue;
            }
        }

        if started.elapsed() >= timeout {
            return Err(ReadinessError::NeverGrew {
                path: path.to_path_buf(),
            });
        }
        thread::sleep(poll_interval);
    }
}
