//! Settings loading and file filtering.
//!
//! All runtime settings live in one TOML file: the two root directories,
//! logging, watch tuning and the filter rules deciding which file names the
//! sorter should leave alone. Configuration is looked up in this order:
//!
//! 1. An explicitly provided path
//! 2. `./dropsort.toml` in the current directory
//! 3. `~/.config/dropsort/config.toml`
//! 4. Built-in defaults
//!
//! # Configuration File Format
//!
//! ```toml
//! [directories]
//! unsorted = "FilesToSort"
//! sorted = "SortedFiles"
//!
//! [logging]
//! target = "stdout"          # stdout | stderr | file
//! file = "Sorting.log"
//! debug = false
//!
//! [watch]
//! ready_timeout_ms = 10000
//! ready_poll_ms = 200
//! sweep_on_start = false
//! halt_on_error = true
//!
//! [filters]
//! ignore_hidden = true
//! filenames = [".DS_Store", "Thumbs.db"]
//! patterns = ["*.crdownload", "*.part", "*.tmp"]
//! extensions = []
//! regex = []
//! ```

use glob::Pattern;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Errors that can occur during configuration loading and filter compilation.
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// Configuration file not found at the explicitly specified path.
    ConfigNotFound(PathBuf),
    /// Invalid TOML syntax or structure.
    ConfigInvalid(String),
    /// Invalid glob pattern in the filter rules.
    InvalidGlobPattern(String),
    /// Invalid regex pattern with the actual error reason.
    InvalidRegexPattern { pattern: String, reason: String },
    /// IO error while reading the configuration file.
    IoError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ConfigNotFound(path) => {
                write!(f, "Configuration file not found: {}", path.display())
            }
            ConfigError::ConfigInvalid(msg) => write!(f, "Invalid configuration: {}", msg),
            ConfigError::InvalidGlobPattern(pattern) => {
                write!(f, "Invalid glob pattern '{}'", pattern)
            }
            ConfigError::InvalidRegexPattern { pattern, reason } => {
                write!(f, "Invalid regex pattern '{}': {}", pattern, reason)
            }
            ConfigError::IoError(msg) => write!(f, "IO error reading configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Complete runtime settings for the watcher process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub directories: Directories,
    #[serde(default)]
    pub logging: Logging,
    #[serde(default)]
    pub watch: Watch,
    #[serde(default)]
    pub filters: FilterRules,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            directories: Directories::default(),
            logging: Logging::default(),
            watch: Watch::default(),
            filters: FilterRules::default(),
        }
    }
}

/// The two root directories the process works with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Directories {
    /// Drop directory watched for new files.
    #[serde(default = "default_unsorted_dir")]
    pub unsorted: PathBuf,
    /// Root of the sorted destination tree.
    #[serde(default = "default_sorted_dir")]
    pub sorted: PathBuf,
}

fn default_unsorted_dir() -> PathBuf {
    PathBuf::from("FilesToSort")
}

fn default_sorted_dir() -> PathBuf {
    PathBuf::from("SortedFiles")
}

impl Default for Directories {
    fn default() -> Self {
        Self {
            unsorted: default_unsorted_dir(),
            sorted: default_sorted_dir(),
        }
    }
}

/// Where log lines go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogTarget {
    Stdout,
    Stderr,
    File,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Logging {
    #[serde(default = "default_log_target")]
    pub target: LogTarget,
    /// Log file path, used when `target = "file"`.
    #[serde(default = "default_log_file")]
    pub file: PathBuf,
    /// Emit debug-level lines.
    #[serde(default)]
    pub debug: bool,
}

fn default_log_target() -> LogTarget {
    LogTarget::Stdout
}

fn default_log_file() -> PathBuf {
    PathBuf::from("Sorting.log")
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            target: default_log_target(),
            file: default_log_file(),
            debug: false,
        }
    }
}

/// Watch-loop tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Watch {
    /// How long to wait for a new file to become readable, in milliseconds.
    #[serde(default = "default_ready_timeout_ms")]
    pub ready_timeout_ms: u64,
    /// Pause between readiness probes, in milliseconds.
    #[serde(default = "default_ready_poll_ms")]
    pub ready_poll_ms: u64,
    /// Organize files already present in the drop directory on startup.
    #[serde(default)]
    pub sweep_on_start: bool,
    /// Exit the process when a move or resolution error is logged.
    #[serde(default = "default_halt_on_error")]
    pub halt_on_error: bool,
}

fn default_ready_timeout_ms() -> u64 {
    10_000
}

fn default_ready_poll_ms() -> u64 {
    200
}

fn default_halt_on_error() -> bool {
    true
}

impl Default for Watch {
    fn default() -> Self {
        Self {
            ready_timeout_ms: default_ready_timeout_ms(),
            ready_poll_ms: default_ready_poll_ms(),
            sweep_on_start: false,
            halt_on_error: default_halt_on_error(),
        }
    }
}

/// Rules for file names the sorter should leave alone.
///
/// The defaults skip hidden files, desktop metadata droppings and the
/// in-progress artifacts browsers and download managers write next to the
/// real file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterRules {
    /// Skip names starting with a dot.
    #[serde(default = "default_ignore_hidden")]
    pub ignore_hidden: bool,
    /// Exact filenames to skip.
    #[serde(default = "default_skip_filenames")]
    pub filenames: Vec<String>,
    /// Glob patterns to skip.
    #[serde(default = "default_skip_patterns")]
    pub patterns: Vec<String>,
    /// Extensions (without dot) to skip.
    #[serde(default)]
    pub extensions: Vec<String>,
    /// Regex patterns to skip, matched against the file name.
    #[serde(default)]
    pub regex: Vec<String>,
}

fn default_ignore_hidden() -> bool {
    true
}

fn default_skip_filenames() -> Vec<String> {
    vec![".DS_Store".to_string(), "Thumbs.db".to_string()]
}

fn default_skip_patterns() -> Vec<String> {
    vec![
        "*.crdownload".to_string(),
        "*.part".to_string(),
        "*.tmp".to_string(),
    ]
}

impl Default for FilterRules {
    fn default() -> Self {
        Self {
            ignore_hidden: default_ignore_hidden(),
            filenames: default_skip_filenames(),
            patterns: default_skip_patterns(),
            extensions: Vec::new(),
            regex: Vec::new(),
        }
    }
}

impl Settings {
    /// Loads settings, falling back through the lookup chain to defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly provided file is missing or
    /// unparseable; the implicit locations only error when present but
    /// invalid.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let local_config = PathBuf::from("dropsort.toml");
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        if let Ok(home) = std::env::var("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("dropsort")
                .join("config.toml");
            if home_config.exists() {
                return Self::load_from_file(&home_config);
            }
        }

        Ok(Self::default())
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

        toml::from_str(&content).map_err(|e| ConfigError::ConfigInvalid(e.to_string()))
    }
}

impl FilterRules {
    /// Pre-compiles the glob and regex patterns for per-event matching.
    ///
    /// # Errors
    ///
    /// Returns an error if any glob or regex pattern is invalid.
    pub fn compile(&self) -> Result<FileFilter, ConfigError> {
        let patterns = self
            .patterns
            .iter()
            .map(|pattern| {
                Pattern::new(pattern).map_err(|_| ConfigError::InvalidGlobPattern(pattern.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let regexes = self
            .regex
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| ConfigError::InvalidRegexPattern {
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(FileFilter {
            ignore_hidden: self.ignore_hidden,
            filenames: self.filenames.iter().cloned().collect(),
            extensions: self
                .extensions
                .iter()
                .map(|ext| ext.to_lowercase())
                .collect(),
            patterns,
            regexes,
        })
    }
}

/// Compiled filter, matched against bare file names.
pub struct FileFilter {
    ignore_hidden: bool,
    filenames: HashSet<String>,
    extensions: HashSet<String>,
    patterns: Vec<Pattern>,
    regexes: Vec<Regex>,
}

impl FileFilter {
    /// Whether a file with this name should be sorted.
    ///
    /// Checks run in order with early exit: hidden prefix, exact filename,
    /// extension, glob patterns, regex patterns.
    pub fn allows(&self, file_name: &str) -> bool {
        if self.ignore_hidden && file_name.starts_with('.') {
            return false;
        }

        if self.filenames.contains(file_name) {
            return false;
        }

        if let Some(ext) = Path::new(file_name).extension() {
            let ext_lower = ext.to_string_lossy().to_lowercase();
            if self.extensions.contains(&ext_lower) {
                return false;
            }
        }

        if self.patterns.iter().any(|pattern| pattern.matches(file_name)) {
            return false;
        }

        if self.regexes.iter().any(|regex| regex.is_match(file_name)) {
            return false;
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.directories.unsorted, PathBuf::from("FilesToSort"));
        assert_eq!(settings.directories.sorted, PathBuf::from("SortedFiles"));
        assert_eq!(settings.logging.target, LogTarget::Stdout);
        assert!(!settings.logging.debug);
        assert_eq!(settings.watch.ready_timeout_ms, 10_000);
        assert_eq!(settings.watch.ready_poll_ms, 200);
        assert!(settings.watch.halt_on_error);
        assert!(!settings.watch.sweep_on_start);
    }

    #[test]
    fn test_load_from_explicit_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let config_path = temp_dir.path().join("dropsort.toml");
        std::fs::write(
            &config_path,
            r#"
[directories]
unsorted = "/drop"
sorted = "/library"

[logging]
target = "file"
file = "watch.log"
debug = true

[watch]
ready_timeout_ms = 2000
halt_on_error = false
"#,
        )
        .expect("Failed to write config");

        let settings = Settings::load(Some(&config_path)).expect("Failed to load settings");
        assert_eq!(settings.directories.unsorted, PathBuf::from("/drop"));
        assert_eq!(settings.directories.sorted, PathBuf::from("/library"));
        assert_eq!(settings.logging.target, LogTarget::File);
        assert_eq!(settings.logging.file, PathBuf::from("watch.log"));
        assert!(settings.logging.debug);
        assert_eq!(settings.watch.ready_timeout_ms, 2000);
        // Unset keys keep their defaults
        assert_eq!(settings.watch.ready_poll_ms, 200);
        assert!(!settings.watch.halt_on_error);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let result = Settings::load(Some(Path::new("/no/such/dropsort.toml")));
        assert!(matches!(result, Err(ConfigError::ConfigNotFound(_))));
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let config_path = temp_dir.path().join("broken.toml");
        std::fs::write(&config_path, "[directories\nunsorted=").expect("Failed to write config");

        let result = Settings::load(Some(&config_path));
        assert!(matches!(result, Err(ConfigError::ConfigInvalid(_))));
    }

    #[test]
    fn test_default_filter_skips_download_artifacts() {
        let filter = FilterRules::default().compile().expect("Failed to compile");
        assert!(!filter.allows("movie.mkv.crdownload"));
        assert!(!filter.allows("archive.part"));
        assert!(!filter.allows("staging.tmp"));
        assert!(filter.allows("movie.mkv"));
    }

    #[test]
    fn test_default_filter_skips_hidden_and_metadata_files() {
        let filter = FilterRules::default().compile().expect("Failed to compile");
        assert!(!filter.allows(".DS_Store"));
        assert!(!filter.allows(".hidden"));
        assert!(!filter.allows("Thumbs.db"));
        assert!(filter.allows("visible.txt"));
    }

    #[test]
    fn test_hidden_files_allowed_when_enabled() {
        let rules = FilterRules {
            ignore_hidden: false,
            filenames: Vec::new(),
            patterns: Vec::new(),
            extensions: Vec::new(),
            regex: Vec::new(),
        };
        let filter = rules.compile().expect("Failed to compile");
        assert!(filter.allows(".hidden"));
    }

    #[test]
    fn test_extension_rule_is_case_insensitive() {
        let rules = FilterRules {
            extensions: vec!["bak".to_string()],
            ..FilterRules::default()
        };
        let filter = rules.compile().expect("Failed to compile");
        assert!(!filter.allows("save.bak"));
        assert!(!filter.allows("save.BAK"));
        assert!(filter.allows("save.txt"));
    }

    #[test]
    fn test_regex_rule() {
        let rules = FilterRules {
            regex: vec![r"^~\$.*".to_string()],
            ..FilterRules::default()
        };
        let filter = rules.compile().expect("Failed to compile");
        assert!(!filter.allows("~$report.docx"));
        assert!(filter.allows("report.docx"));
    }

    #[test]
    fn test_invalid_glob_pattern_fails_compilation() {
        let rules = FilterRules {
            patterns: vec!["[invalid".to_string()],
            ..FilterRules::default()
        };
        assert!(matches!(
            rules.compile(),
            Err(ConfigError::InvalidGlobPattern(_))
        ));
    }

    #[test]
    fn test_invalid_regex_pattern_fails_compilation() {
        let rules = FilterRules {
            regex: vec!["[invalid(".to_string()],
            ..FilterRules::default()
        };
        assert!(matches!(
            rules.compile(),
            Err(ConfigError::InvalidRegexPattern { .. })
        ));
    }
}
