/// Destination path resolution and file moving.
///
/// This module computes where a classified file belongs under the sorted
/// root — category folder, then year, then zero-padded month — creates the
/// missing directories on the way, picks a collision-free filename and
/// performs the final non-overwriting move.
use chrono::{DateTime, Datelike, Local};
use std::fs;
use std::path::{Path, PathBuf};

use crate::file_category::Category;
use crate::output::Logger;

/// Errors that can occur while resolving a destination or moving a file.
#[derive(Debug)]
pub enum OrganizeError {
    /// Failed to create a directory along the destination path.
    DirectoryCreationFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The destination existed at the moment of the move.
    DestinationOccupied { destination: PathBuf },
    /// The rename itself failed (cross-device, permissions, …).
    FileMoveFailure {
        source: PathBuf,
        destination: PathBuf,
        source_error: std::io::Error,
    },
    /// The drop directory could not be listed during a sweep.
    DirectoryReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl std::fmt::Display for OrganizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DirectoryCreationFailed { path, source } => {
                write!(
                    f,
                    "Failed to create directory {}: {}",
                    path.display(),
                    source
                )
            }
            Self::DestinationOccupied { destination } => {
                write!(
                    f,
                    "Destination {} already exists, refusing to overwrite",
                    destination.display()
                )
            }
            Self::FileMoveFailure {
                source,
                destination,
                source_error,
            } => {
                write!(
                    f,
                    "Failed to move {} to {}: {}",
                    source.display(),
                    destination.display(),
                    source_error
                )
            }
            Self::DirectoryReadFailed { path, source } => {
                write!(f, "Failed to read directory {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for OrganizeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::DirectoryCreationFailed { source, .. } => Some(source),
            Self::DestinationOccupied { .. } => None,
            Self::FileMoveFailure { source_error, .. } => Some(source_error),
            Self::DirectoryReadFailed { source, .. } => Some(source),
        }
    }
}

/// Result type for destination resolution and moves.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// The sorted destination tree rooted at a single directory.
///
/// Directories are created lazily: resolving a destination guarantees its
/// parent directory exists at return time.
pub struct DestinationTree {
    root: PathBuf,
    logger: Logger,
}

impl DestinationTree {
    pub fn new(root: impl Into<PathBuf>, logger: Logger) -> Self {
        Self {
            root: root.into(),
            logger,
        }
    }

    /// Base directory for a category, created on demand.
    ///
    /// Unknown files are grouped by their literal dotted extension under
    /// `Unknown/`, or under `Unknown/NoExtension` when there is none.
    fn base_dir(&self, category: Category, source_path: &Path) -> OrganizeResult<PathBuf> {
        match category.folder() {
            Some(relative) => {
                let dir = self.root.join(relative);
                self.ensure_directory(&dir)?;
                Ok(dir)
            }
            None => {
                let unknown_root = self.root.join("Unknown");
                self.ensure_directory(&unknown_root)?;

                let subfolder = source_path
                    .extension()
                    .map(|ext| format!(".{}", ext.to_string_lossy()))
                    .unwrap_or_else(|| "NoExtension".to_string());

                let dir = unknown_root.join(subfolder);
                self.ensure_directory(&dir)?;
                Ok(dir)
            }
        }
    }

    /// Computes the collision-free destination for a file.
    ///
    /// The path is `<root>/<category folder>/<year>/<month, two digits>/` plus
    /// the file name, with a ` (n)` suffix inserted before the extension while
    /// the candidate already exists. The existence check is not atomic with
    /// respect to outside writers; the move itself still refuses to overwrite.
    pub fn resolve(
        &self,
        category: Category,
        source_path: &Path,
        file_name: &str,
        created: DateTime<Local>,
    ) -> OrganizeResult<PathBuf> {
        let base = self.base_dir(category, source_path)?;

        let year_dir = base.join(created.year().to_string());
        let month_dir = year_dir.join(format!("{:02}", created.month()));
        self.ensure_directory(&year_dir)?;
        self.ensure_directory(&month_dir)?;

        Ok(self.next_free_path(&month_dir, file_name))
    }

    /// First candidate in `dir` that does not collide with an existing file:
    /// `name.ext`, `name (1).ext`, `name (2).ext`, …
    fn next_free_path(&self, dir: &Path, file_name: &str) -> PathBuf {
        let mut candidate = dir.join(file_name);

        let stem = Path::new(file_name)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| file_name.to_string());
        let extension = Path::new(file_name)
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();

        let mut suffix = 1u32;
        while candidate.exists() {
            self.logger.debug(&format!(
                "File {} already exists, trying suffix ({})",
                candidate.display(),
                suffix
            ));
            candidate = dir.join(format!("{} ({}){}", stem, suffix, extension));
            suffix += 1;
        }
        candidate
    }

    fn ensure_directory(&self, path: &Path) -> OrganizeResult<()> {
        if !path.exists() {
            self.logger
                .debug(&format!("Creating directory: {}", path.display()));
            fs::create_dir_all(path).map_err(|e| OrganizeError::DirectoryCreationFailed {
                path: path.to_path_buf(),
                source: e,
            })?;
        }
        Ok(())
    }
}

/// Moves a file without overwriting.
///
/// `fs::rename` replaces an existing destination on Unix, so occupancy is
/// checked explicitly first. The window between check and rename is open to
/// concurrent writers into the destination tree.
pub fn move_file(source: &Path, destination: &Path) -> OrganizeResult<()> {
    if destination.exists() {
        return Err(OrganizeError::DestinationOccupied {
            destination: destination.to_path_buf(),
        });
    }

    fs::rename(source, destination).map_err(|e| OrganizeError::FileMoveFailure {
        source: source.to_path_buf(),
        destination: destination.to_path_buf(),
        source_error: e,
    })
}
