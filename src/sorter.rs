//! Event adapter driving the sorting pipeline.
//!
//! One `Sorter` owns the classification table, the destination tree and the
//! name filter, and handles each "file created" notification to completion:
//! wait for the file to be ready, classify it, resolve a destination, move.
//! Recoverable conditions (missing name, filtered name, file never ready) are
//! logged and swallowed; resolution and move failures surface to the caller,
//! which owns the terminate-on-error policy.

use chrono::{DateTime, Local};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::FileFilter;
use crate::file_category::CategoryMap;
use crate::file_organizer::{self, DestinationTree, OrganizeError, OrganizeResult};
use crate::output::Logger;
use crate::readiness;

/// What happened to a single file event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortOutcome {
    /// The file was moved to this destination.
    Moved { destination: PathBuf },
    /// The file was left in place (no name, filtered, or never ready).
    Skipped,
}

/// Counters for a startup sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub moved: usize,
    pub skipped: usize,
}

pub struct Sorter {
    categories: CategoryMap,
    tree: DestinationTree,
    filter: FileFilter,
    logger: Logger,
    ready_timeout: Duration,
    ready_poll: Duration,
}

impl Sorter {
    pub fn new(
        categories: CategoryMap,
        tree: DestinationTree,
        filter: FileFilter,
        logger: Logger,
        ready_timeout: Duration,
        ready_poll: Duration,
    ) -> Self {
        Self {
            categories,
            tree,
            filter,
            logger,
            ready_timeout,
            ready_poll,
        }
    }

    /// Handles one "file created" notification end to end.
    ///
    /// The file is left untouched whenever `Ok(Skipped)` is returned; there
    /// is no automatic retry beyond the next filesystem notification.
    pub fn on_file_created(
        &self,
        path: &Path,
        name: Option<&str>,
    ) -> OrganizeResult<SortOutcome> {
        let Some(name) = name.filter(|n| !n.is_empty()) else {
            self.logger.warn("File event without a name, skipping");
            return Ok(SortOutcome::Skipped);
        };

        if path.is_dir() {
            self.logger
                .debug(&format!("{} is a directory, skipping", path.display()));
            return Ok(SortOutcome::Skipped);
        }

        if !self.filter.allows(name) {
            self.logger
                .debug(&format!("{} matches a filter rule, skipping", name));
            return Ok(SortOutcome::Skipped);
        }

        // Wait until the copy/save finishes
        if let Err(e) = readiness::wait_until_ready(path, self.ready_timeout, self.ready_poll) {
            self.logger.warn(&format!(
                "File {} is not ready, skipping: {}",
                path.display(),
                e
            ));
            return Ok(SortOutcome::Skipped);
        }

        let category = self.categories.classify(name);
        let created = creation_time(path);

        let destination = self.tree.resolve(category, path, name, created)?;
        file_organizer::move_file(path, &destination)?;

        self.logger.info(&format!(
            "Moved {} -> {}",
            path.display(),
            destination.display()
        ));
        Ok(SortOutcome::Moved { destination })
    }

    /// Organizes the files already sitting in the drop directory.
    ///
    /// Each file goes through the same pipeline as a live event. The first
    /// resolution or move failure aborts the sweep.
    pub fn sweep(&self, unsorted: &Path) -> OrganizeResult<SweepReport> {
        let entries =
            fs::read_dir(unsorted).map_err(|e| OrganizeError::DirectoryReadFailed {
                path: unsorted.to_path_buf(),
                source: e,
            })?;

        let mut files = Vec::new();
        for entry in entries.flatten() {
            if let Ok(file_type) = entry.file_type()
                && file_type.is_file()
            {
                files.push(entry.path());
            }
        }

        let bar = ProgressBar::new(files.len() as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .expect("Invalid progress bar template")
                .progress_chars("█▓░"),
        );

        let mut report = SweepReport::default();
        for path in files {
            let name = path.file_name().map(|n| n.to_string_lossy().into_owned());
            match self.on_file_created(&path, name.as_deref())? {
                SortOutcome::Moved { .. } => report.moved += 1,
                SortOutcome::Skipped => report.skipped += 1,
            }
            bar.inc(1);
        }
        bar.finish_and_clear();

        self.logger.info(&format!(
            "Sweep complete: {} moved, {} skipped",
            report.moved, report.skipped
        ));
        Ok(report)
    }
}

/// Creation time of a file, falling back to mtime and then to now.
///
/// Some filesystems do not record birth times; the dated subfolder then
/// partitions by the closest thing available.
fn creation_time(path: &Path) -> DateTime<Local> {
    fs::metadata(path)
        .and_then(|meta| meta.created().or_else(|_| meta.modified()))
        .map(DateTime::<Local>::from)
        .unwrap_or_else(|_| Local::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FilterRules;
    use crate::output::LogSink;
    use std::fs;
    use tempfile::TempDir;

    const TEST_TIMEOUT: Duration = Duration::from_millis(300);
    const TEST_POLL: Duration = Duration::from_millis(50);

    fn sorter(dest_root: &Path) -> Sorter {
        let logger = Logger::new(LogSink::Stdout, false);
        Sorter::new(
            CategoryMap::new(),
            DestinationTree::new(dest_root, logger.clone()),
            FilterRules::default().compile().unwrap(),
            logger,
            TEST_TIMEOUT,
            TEST_POLL,
        )
    }

    #[test]
    fn test_missing_name_is_skipped() {
        let dest = TempDir::new().expect("Failed to create temp directory");
        let sorter = sorter(dest.path());

        let outcome = sorter
            .on_file_created(Path::new("/drop/whatever"), None)
            .expect("Should not error");
        assert_eq!(outcome, SortOutcome::Skipped);
    }

    #[test]
    fn test_empty_name_is_skipped() {
        let dest = TempDir::new().expect("Failed to create temp directory");
        let sorter = sorter(dest.path());

        let outcome = sorter
            .on_file_created(Path::new("/drop/whatever"), Some(""))
            .expect("Should not error");
        assert_eq!(outcome, SortOutcome::Skipped);
    }

    #[test]
    fn test_filtered_name_is_skipped_and_left_in_place() {
        let drop = TempDir::new().expect("Failed to create temp directory");
        let dest = TempDir::new().expect("Failed to create temp directory");
        let sorter = sorter(dest.path());

        let path = drop.path().join("movie.mkv.crdownload");
        fs::write(&path, "partial").expect("Failed to write");

        let outcome = sorter
            .on_file_created(&path, Some("movie.mkv.crdownload"))
            .expect("Should not error");
        assert_eq!(outcome, SortOutcome::Skipped);
        assert!(path.exists());
    }

    #[test]
    fn test_unready_file_is_skipped_and_left_in_place() {
        let drop = TempDir::new().expect("Failed to create temp directory");
        let dest = TempDir::new().expect("Failed to create temp directory");
        let sorter = sorter(dest.path());

        let path = drop.path().join("empty.pdf");
        fs::write(&path, b"").expect("Failed to write");

        let outcome = sorter
            .on_file_created(&path, Some("empty.pdf"))
            .expect("Should not error");
        assert_eq!(outcome, SortOutcome::Skipped);
        assert!(path.exists());
    }

    #[test]
    fn test_ready_file_is_moved() {
        let drop = TempDir::new().expect("Failed to create temp directory");
        let dest = TempDir::new().expect("Failed to create temp directory");
        let sorter = sorter(dest.path());

        let path = drop.path().join("song.mp3");
        fs::write(&path, "audio bytes").expect("Failed to write");

        let outcome = sorter
            .on_file_created(&path, Some("song.mp3"))
            .expect("Failed to sort");
        match outcome {
            SortOutcome::Moved { destination } => {
                assert!(!path.exists());
                assert!(destination.exists());
                assert!(destination.starts_with(dest.path().join("Audio")));
            }
            SortOutcome::Skipped => panic!("expected a move"),
        }
    }
}
