//! dropsort - keep a drop folder organized
//!
//! This library watches a directory for newly created files and relocates
//! each into a categorized, date-partitioned destination tree based on its
//! extension, waiting for writers to finish and never overwriting.

pub mod config;
pub mod file_category;
pub mod file_organizer;
pub mod output;
pub mod readiness;
pub mod sorter;
pub mod watcher;

pub use config::{ConfigError, FileFilter, FilterRules, Settings};
pub use file_category::{Category, CategoryMap};
pub use file_organizer::{DestinationTree, OrganizeError, move_file};
pub use output::{LogSink, Logger};
pub use readiness::{ReadinessError, wait_until_ready};
pub use sorter::{SortOutcome, Sorter, SweepReport};
pub use watcher::WatchMessage;
