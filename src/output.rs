//! Logging output.
//!
//! One small logger for the whole process: timestamped, level-tagged lines,
//! colored on a console sink and plain in a log file. Debug lines are only
//! emitted when the debug flag is set.

use chrono::Local;
use colored::{ColoredString, Colorize};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

/// Where log lines go.
#[derive(Debug, Clone)]
pub enum LogSink {
    Stdout,
    Stderr,
    /// Append-mode log file; lines are written uncolored.
    File(PathBuf),
}

/// Process-wide logger handed to every component that reports outcomes.
///
/// Cloning is cheap; clones share the same sink configuration. Logging an
/// error does not terminate the process — that decision belongs to the
/// caller.
#[derive(Debug, Clone)]
pub struct Logger {
    sink: LogSink,
    debug_enabled: bool,
}

impl Logger {
    pub fn new(sink: LogSink, debug_enabled: bool) -> Self {
        Self {
            sink,
            debug_enabled,
        }
    }

    /// Informational message (cyan on console).
    pub fn info(&self, message: &str) {
        self.write("LOG", message, |line| line.cyan());
    }

    /// Warning about a skipped file or a recoverable hiccup (yellow).
    pub fn warn(&self, message: &str) {
        self.write("WARN", message, |line| line.yellow());
    }

    /// Diagnostic detail (green); suppressed unless debug output is enabled.
    pub fn debug(&self, message: &str) {
        if !self.debug_enabled {
            return;
        }
        self.write("DEBUG", message, |line| line.green());
    }

    /// Error with its underlying cause (red).
    pub fn error(&self, message: &str, cause: &dyn std::error::Error) {
        self.write("ERROR", &format!("{}: {}", message, cause), |line| {
            line.red()
        });
    }

    fn write(&self, tag: &str, message: &str, paint: fn(&str) -> ColoredString) {
        let line = format!(
            "({}) [{}]: {}",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            tag,
            message
        );
        match &self.sink {
            LogSink::Stdout => println!("{}", paint(&line)),
            LogSink::Stderr => eprintln!("{}", paint(&line)),
            LogSink::File(path) => {
                if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) {
                    let _ = writeln!(file, "{}", line);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_file_sink_appends_plain_lines() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let log_path = temp_dir.path().join("test.log");
        let logger = Logger::new(LogSink::File(log_path.clone()), true);

        logger.info("first");
        logger.warn("second");
        logger.debug("third");

        let contents = fs::read_to_string(&log_path).expect("Failed to read log file");
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("[LOG]: first"));
        assert!(lines[1].contains("[WARN]: second"));
        assert!(lines[2].contains("[DEBUG]: third"));
        // No ANSI escapes in file output
        assert!(!contents.contains('\u{1b}'));
    }

    #[test]
    fn test_debug_suppressed_when_disabled() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let log_path = temp_dir.path().join("quiet.log");
        let logger = Logger::new(LogSink::File(log_path.clone()), false);

        logger.debug("invisible");
        logger.info("visible");

        let contents = fs::read_to_string(&log_path).expect("Failed to read log file");
        assert!(!contents.contains("invisible"));
        assert!(contents.contains("visible"));
    }

    #[test]
    fn test_error_includes_cause() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let log_path = temp_dir.path().join("err.log");
        let logger = Logger::new(LogSink::File(log_path.clone()), false);

        let cause = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "no access");
        logger.error("move failed", &cause);

        let contents = fs::read_to_string(&log_path).expect("Failed to read log file");
        assert!(contents.contains("[ERROR]: move failed: no access"));
    }
}
