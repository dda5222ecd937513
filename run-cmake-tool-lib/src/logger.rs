//! A module to initialize and customize the logger object used in (most) stdout.

use std::sync::atomic::{AtomicBool, Ordering};

// non-std crates
use clap::ArgMatches;
use log::{Level, LevelFilter, Metadata, Record, SetLoggerError};

struct SimpleLogger;

/// Whether GitHub workflow commands (log groups and annotations) are emitted.
static WORKFLOW_COMMANDS: AtomicBool = AtomicBool::new(false);

impl log::Log for SimpleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= Level::Debug
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            if WORKFLOW_COMMANDS.load(Ordering::Relaxed) {
                // surfaces the message as an annotation in the workflow run's summary
                match record.level() {
                    Level::Error => println!("::error::{}", record.args()),
                    Level::Warn => println!("::warning::{}", record.args()),
                    _ => println!("{}: {}", record.level(), record.args()),
                }
            } else {
                println!("{}: {}", record.level(), record.args());
            }
        }
    }

    fn flush(&self) {}
}

/// A private constant to manage the application's logger object.
static LOGGER: SimpleLogger = SimpleLogger;

/// A function to initialize the private `LOGGER`.
///
/// The logging level defaults to [`LevelFilter::Info`].
/// Returns a [`SetLoggerError`] if the `LOGGER` is already initialized.
pub fn init() -> Result<(), SetLoggerError> {
    log::set_logger(&LOGGER).map(|()| log::set_max_level(LevelFilter::Info))
}

/// Enable or disable the GitHub workflow commands emitted by this module.
pub fn enable_workflow_commands(enabled: bool) {
    WORKFLOW_COMMANDS.store(enabled, Ordering::Relaxed);
}

/// This prints a line to indicate the beginning of a related group of log statements.
///
/// Nothing is printed unless workflow commands are enabled.
pub fn start_log_group(name: &str) {
    if WORKFLOW_COMMANDS.load(Ordering::Relaxed) {
        println!("::group::{}", name);
    }
}

/// This prints a line to indicate the ending of a related group of log statements.
pub fn end_log_group() {
    if WORKFLOW_COMMANDS.load(Ordering::Relaxed) {
        println!("::endgroup::");
    }
}

/// The parsed `--verbose` and `--quiet` flags.
///
/// `quiet` takes precedence: a quiet run is never verbose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoggingOptions {
    pub verbose: bool,
    pub quiet: bool,
}

impl LoggingOptions {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        LoggingOptions {
            verbose: verbose && !quiet,
            quiet,
        }
    }

    /// Read the `verbose` and `quiet` flags from parsed CLI arguments.
    pub fn from_matches(args: &ArgMatches) -> Self {
        Self::new(args.get_flag("verbose"), args.get_flag("quiet"))
    }

    /// The maximum log level for these options.
    ///
    /// `step_debug` reflects GitHub's `ACTIONS_STEP_DEBUG` switch and acts like `--verbose`.
    pub fn level_filter(&self, step_debug: bool) -> LevelFilter {
        if self.quiet {
            LevelFilter::Off
        } else if self.verbose || step_debug {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }

    /// The flags that reproduce these options on another command line.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec![];
        if self.verbose {
            args.push("--verbose".to_string());
        }
        if self.quiet {
            args.push("--quiet".to_string());
        }
        args
    }
}

/// Install the logger (if not done already) and apply the given options.
pub fn configure(options: &LoggingOptions, step_debug: bool, in_github_actions: bool) {
    // a second call keeps the logger that is already installed
    init().ok();
    log::set_max_level(options.level_filter(step_debug));
    enable_workflow_commands(in_github_actions && !options.quiet);
}
