//! This module reads the environment that a GitHub Actions runner provides and writes
//! the step's outputs.

use std::env;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;

/// The environment variable naming a directory that holds the CMake tools.
pub const TOOL_DIR_ENV_VAR: &str = "RUN_CMAKE_TOOL_DIR";

/// The parts of the process environment that affect a run.
#[derive(Debug, Default, Clone)]
pub struct ActionEnvironment {
    /// The value of the `ACTIONS_STEP_DEBUG` environment variable.
    pub debug_enabled: bool,

    /// Is the `GITHUB_ACTIONS` environment variable set to `true`?
    pub in_github_actions: bool,

    /// The value of the `GITHUB_OUTPUT` environment variable.
    pub output_path: Option<PathBuf>,

    /// The value of the [`TOOL_DIR_ENV_VAR`] environment variable, if not empty.
    pub tool_dir: Option<PathBuf>,
}

impl ActionEnvironment {
    pub fn new() -> Self {
        ActionEnvironment {
            debug_enabled: match env::var("ACTIONS_STEP_DEBUG") {
                Ok(val) => val == "true",
                Err(_) => false,
            },
            in_github_actions: match env::var("GITHUB_ACTIONS") {
                Ok(val) => val == "true",
                Err(_) => false,
            },
            output_path: env::var("GITHUB_OUTPUT")
                .ok()
                .filter(|val| !val.is_empty())
                .map(PathBuf::from),
            tool_dir: env::var(TOOL_DIR_ENV_VAR)
                .ok()
                .filter(|val| !val.is_empty())
                .map(PathBuf::from),
        }
    }

    /// Appends the run's results to the `GITHUB_OUTPUT` file (if any).
    pub fn write_outputs(&self, exit_code: i32, files_found: usize) -> io::Result<()> {
        if let Some(gh_out) = &self.output_path {
            let mut gh_out_file = OpenOptions::new().append(true).create(true).open(gh_out)?;
            writeln!(
                gh_out_file,
                "exit-code={exit_code}\nfiles-found={files_found}"
            )?;
        }
        log::debug!("{files_found} CMake files found, exit code {exit_code}");
        Ok(())
    }
}
