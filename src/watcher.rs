//! Filesystem watch glue.
//!
//! Subscribes to creation events on the drop directory via notify and
//! forwards them over a channel as [`WatchMessage`]s, so the sorting loop
//! consumes one event at a time on a single thread.

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;

use crate::output::Logger;

/// Message delivered to the sorting loop.
#[derive(Debug)]
pub enum WatchMessage {
    /// A path appeared in the watched directory. `name` is the final path
    /// component; it can be absent for a bare root path.
    Created { path: PathBuf, name: Option<String> },
    /// Stop the loop.
    Shutdown,
}

/// Starts a non-recursive watch on `watch_path`.
///
/// Only creation events are forwarded. The returned watcher must be kept
/// alive for the watch to stay active; dropping it unsubscribes.
pub fn spawn(
    watch_path: &Path,
    tx: Sender<WatchMessage>,
    logger: Logger,
) -> Result<RecommendedWatcher, notify::Error> {
    let handler = move |result: Result<Event, notify::Error>| match result {
        Ok(event) => {
            if matches!(event.kind, EventKind::Create(_)) {
                for path in event.paths {
                    let name = path.file_name().map(|n| n.to_string_lossy().into_owned());
                    // A send failure means the loop is gone; shutdown is underway.
                    let _ = tx.send(WatchMessage::Created { path, name });
                }
            }
        }
        Err(e) => logger.warn(&format!("Watch error: {}", e)),
    };

    let mut watcher = RecommendedWatcher::new(handler, Config::default())?;
    watcher.watch(watch_path, RecursiveMode::NonRecursive)?;
    Ok(watcher)
}
