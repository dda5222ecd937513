//! This module is the backend of both executables: the tool runner and the
//! GitHub Action's entrypoint.
//!
//! Each has 1 function here that takes the full list of command line arguments
//! (including the program name) and returns the process' exit status:
//!
//! - [`run_main()`] for `run-cmake-tool`
//! - [`action_main()`] for `github-action-entrypoint`
//!
//! Both read the process environment once. The `*_in()` variants take an
//! [`ActionEnvironment`] instead.

use std::path::PathBuf;

// non-std crates
use semver::VersionReq;

// project specific modules/crates
use crate::action_env::ActionEnvironment;
use crate::cli::{get_arg_parser, get_entrypoint_parser, TOOL_RUNNER_NAME};
use crate::cmake_tools::{run_cmake_tool, ToolOptions};
use crate::common_fs::{list_cmake_files, DiscoveryOptions};
use crate::error::{RunError, INVALID_INPUT_EXIT_CODE};
use crate::logger::{self, end_log_group, start_log_group, LoggingOptions};
use crate::request::{ToolCommand, ToolRequest};

/// What a completed run produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOutcome {
    /// The exit status of the tool (`0` if it was not needed).
    pub exit_code: i32,

    /// How many CMake files were handed to the tool.
    pub files_found: usize,
}

/// Prints a parsing error (or the requested help text) and returns the exit status
/// that goes with it.
fn report_parse_error(err: &clap::Error) -> i32 {
    if let Err(io_err) = err.print() {
        eprintln!("{io_err}");
    }
    err.exit_code()
}

/// Discovers the CMake files under the requested path and runs the tool over them.
pub fn execute(
    request: &ToolRequest,
    discovery: &DiscoveryOptions,
    options: &ToolOptions,
) -> Result<RunOutcome, RunError> {
    let name = request.command.tool_name();
    log::info!("Starting {name} in directory: {}", request.path.display());

    start_log_group("Get list of CMake files");
    let files = list_cmake_files(&request.path, discovery);
    if let Ok(files) = &files {
        for file in files {
            log::info!("  {}", file.to_string_lossy().replace('\\', "/"));
        }
    }
    end_log_group();
    let files = files.map_err(|source| RunError::Discovery {
        path: request.path.clone(),
        source,
    })?;

    if files.is_empty() {
        log::info!(
            "No CMake files found in {}. Nothing to do.",
            request.path.display()
        );
        return Ok(RunOutcome {
            exit_code: 0,
            files_found: 0,
        });
    }

    match request.command {
        ToolCommand::Format if request.apply => {
            log::info!("Found {} CMake files. Formatting files...", files.len());
        }
        ToolCommand::Format => {
            log::info!(
                "Found {} CMake files. Checking files are formatted...",
                files.len()
            );
            log::info!("No changes will be applied. Use --apply to write changes.");
        }
        ToolCommand::Lint => {
            log::info!(
                "Found {} CMake files. Linting files with log level: {}",
                files.len(),
                request.log_level
            );
        }
    }

    start_log_group(&format!("Running {name}"));
    let exit_code = run_cmake_tool(request, &files, options);
    end_log_group();
    let exit_code = exit_code?;

    match (request.command, exit_code) {
        (ToolCommand::Format, 0) if request.apply => log::info!("All files formatted successfully."),
        (ToolCommand::Format, 0) => log::info!("All files are formatted correctly."),
        (ToolCommand::Format, _) if request.apply => {
            log::error!("Some files could not be formatted ({name} exited with {exit_code}).")
        }
        (ToolCommand::Format, _) => log::error!(
            "Some files are not formatted correctly. Use --apply to write changes."
        ),
        (ToolCommand::Lint, 0) => log::info!("All files are linted successfully."),
        (ToolCommand::Lint, _) => {
            log::error!("{name} reported problems (exit code {exit_code}).")
        }
    }
    Ok(RunOutcome {
        exit_code,
        files_found: files.len(),
    })
}

/// This is the backend entry point for the tool runner.
///
/// `args` is the complete command line, starting with the program's name.
pub fn run_main(args: Vec<String>) -> i32 {
    run_main_in(args, &ActionEnvironment::new())
}

/// Same as [`run_main()`], but with the given `action_env` in place of the process
/// environment.
pub fn run_main_in(args: Vec<String>, action_env: &ActionEnvironment) -> i32 {
    let arg_parser = get_arg_parser();
    let args = match arg_parser.try_get_matches_from(args) {
        Ok(args) => args,
        Err(err) => return report_parse_error(&err),
    };
    let Some((command_name, sub_args)) = args.subcommand() else {
        return INVALID_INPUT_EXIT_CODE;
    };

    let logging = LoggingOptions::from_matches(sub_args);
    logger::configure(
        &logging,
        action_env.debug_enabled,
        action_env.in_github_actions,
    );
    log::debug!("{TOOL_RUNNER_NAME} v{}", env!("CARGO_PKG_VERSION"));

    let Some(request) = ToolRequest::from_tool_matches(command_name, sub_args) else {
        return INVALID_INPUT_EXIT_CODE;
    };
    let discovery = DiscoveryOptions::from_matches(sub_args, &request.path);
    let options = ToolOptions {
        tool_dir: sub_args
            .get_one::<PathBuf>("tool-dir")
            .cloned()
            .or_else(|| action_env.tool_dir.clone()),
        version_req: sub_args.get_one::<VersionReq>("tool-version").cloned(),
    };

    let (exit_code, files_found) = match execute(&request, &discovery, &options) {
        Ok(outcome) => (outcome.exit_code, outcome.files_found),
        Err(err) => {
            log::error!("{err}");
            (err.exit_code(), 0)
        }
    };
    if let Err(err) = action_env.write_outputs(exit_code, files_found) {
        log::warn!("Could not write to GITHUB_OUTPUT file: {err}");
    }
    exit_code
}

/// Converts the GitHub Action's inputs into the tool runner's arguments.
///
/// The returned list starts with the tool runner's name, so it can be passed
/// directly to [`run_main()`].
pub fn convert_args_to_run_cmake_tool(
    request: &ToolRequest,
    logging: &LoggingOptions,
) -> Vec<String> {
    let mut args = vec![TOOL_RUNNER_NAME.to_string()];
    args.extend(logging.to_args());
    args.extend(request.to_tool_args());
    args
}

/// This is the backend entry point for the GitHub Action.
///
/// The action's inputs are validated here. Invalid inputs are rejected with
/// [`INVALID_INPUT_EXIT_CODE`] before any file or process is touched. Valid inputs are
/// converted and handed to [`run_main()`].
pub fn action_main(args: Vec<String>) -> i32 {
    action_main_in(args, &ActionEnvironment::new())
}

/// Same as [`action_main()`], but with the given `action_env` in place of the process
/// environment. The converted arguments go to [`run_main_in()`] with the same
/// `action_env`.
pub fn action_main_in(args: Vec<String>, action_env: &ActionEnvironment) -> i32 {
    let arg_parser = get_entrypoint_parser();
    let args = match arg_parser.try_get_matches_from(args) {
        Ok(args) => args,
        Err(err) => return report_parse_error(&err),
    };
    let Some(request) = ToolRequest::from_entrypoint_matches(&args) else {
        return INVALID_INPUT_EXIT_CODE;
    };

    let logging = LoggingOptions::from_matches(&args);
    logger::configure(
        &logging,
        action_env.debug_enabled,
        action_env.in_github_actions,
    );
    log::debug!(
        "Running entrypoint script for {TOOL_RUNNER_NAME} v{}",
        env!("CARGO_PKG_VERSION")
    );
    match request.command {
        ToolCommand::Format => log::debug!(
            "Running format on path: {} with apply: {}",
            request.path.display(),
            request.apply
        ),
        ToolCommand::Lint => log::debug!(
            "Running lint on path: {} with log level: {}",
            request.path.display(),
            request.log_level
        ),
    }

    let tool_args = convert_args_to_run_cmake_tool(&request, &logging);
    log::info!("Running command: {}", tool_args.join(" "));
    run_main_in(tool_args, action_env)
}
