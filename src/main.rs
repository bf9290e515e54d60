use clap::Parser;
use dropsort::config::{LogTarget, Settings};
use dropsort::file_category::CategoryMap;
use dropsort::file_organizer::DestinationTree;
use dropsort::output::{LogSink, Logger};
use dropsort::sorter::Sorter;
use dropsort::watcher::{self, WatchMessage};
use std::path::PathBuf;
use std::process;
use std::sync::mpsc;
use std::time::Duration;

/// Watch a drop directory and file new arrivals into a categorized,
/// date-partitioned tree.
#[derive(Parser)]
#[command(name = "dropsort", version, about)]
struct Cli {
    /// Drop directory to watch (overrides the configured one).
    unsorted: Option<PathBuf>,

    /// Root of the sorted tree (overrides the configured one).
    sorted: Option<PathBuf>,

    /// Path to a TOML settings file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Emit debug output.
    #[arg(long)]
    debug: bool,

    /// Organize files already present before watching.
    #[arg(long)]
    sweep: bool,
}

fn main() {
    let cli = Cli::parse();

    let settings = match Settings::load(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let sink = match settings.logging.target {
        LogTarget::Stdout => LogSink::Stdout,
        LogTarget::Stderr => LogSink::Stderr,
        LogTarget::File => LogSink::File(settings.logging.file.clone()),
    };
    let logger = Logger::new(sink, settings.logging.debug || cli.debug);

    let unsorted = cli
        .unsorted
        .unwrap_or_else(|| settings.directories.unsorted.clone());
    let sorted = cli
        .sorted
        .unwrap_or_else(|| settings.directories.sorted.clone());
    logger.info(&format!("Unsorted directory: {}", unsorted.display()));
    logger.info(&format!("Sorted directory: {}", sorted.display()));

    if !unsorted.is_dir() {
        let cause = std::io::Error::new(std::io::ErrorKind::NotFound, "directory does not exist");
        logger.error(
            &format!("Directory {} doesn't exist", unsorted.display()),
            &cause,
        );
        process::exit(1);
    }

    if !sorted.exists()
        && let Err(e) = std::fs::create_dir_all(&sorted)
    {
        logger.error(
            &format!("Cannot create sorted root {}", sorted.display()),
            &e,
        );
        process::exit(1);
    }

    let filter = match settings.filters.compile() {
        Ok(filter) => filter,
        Err(e) => {
            logger.error("Invalid filter rules", &e);
            process::exit(1);
        }
    };

    let sorter = Sorter::new(
        CategoryMap::new(),
        DestinationTree::new(&sorted, logger.clone()),
        filter,
        logger.clone(),
        Duration::from_millis(settings.watch.ready_timeout_ms),
        Duration::from_millis(settings.watch.ready_poll_ms),
    );

    let (tx, rx) = mpsc::channel();

    {
        let tx = tx.clone();
        let handler_logger = logger.clone();
        if let Err(e) = ctrlc::set_handler(move || {
            handler_logger.warn("Ctrl+C detected, shutting down...");
            let _ = tx.send(WatchMessage::Shutdown);
        }) {
            logger.warn(&format!("Could not install Ctrl+C handler: {}", e));
        }
    }

    let _watcher = match watcher::spawn(&unsorted, tx, logger.clone()) {
        Ok(watcher) => watcher,
        Err(e) => {
            logger.error(&format!("Cannot watch {}", unsorted.display()), &e);
            process::exit(1);
        }
    };

    if (cli.sweep || settings.watch.sweep_on_start)
        && let Err(e) = sorter.sweep(&unsorted)
    {
        logger.error("Sweep failed", &e);
        if settings.watch.halt_on_error {
            process::exit(1);
        }
    }

    logger.info("Watching for new files. Press Ctrl+C to exit.");

    for message in rx {
        match message {
            WatchMessage::Created { path, name } => {
                if let Err(e) = sorter.on_file_created(&path, name.as_deref()) {
                    logger.error(&format!("Failed to sort {}", path.display()), &e);
                    if settings.watch.halt_on_error {
                        process::exit(1);
                    }
                }
            }
            WatchMessage::Shutdown => break,
        }
    }

    logger.info("Exiting, goodbye!");
}
