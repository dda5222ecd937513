//! This module holds the Command Line Interface design.

use std::fs;
use std::path::{Path, PathBuf};

// non-std crates
use clap::builder::EnumValueParser;
use clap::{value_parser, Arg, ArgAction, Command};
use semver::VersionReq;

// project specific modules/crates
use crate::request::{LintLogLevel, ToolCommand};

/// The name of the tool runner's executable.
pub const TOOL_RUNNER_NAME: &str = "run-cmake-tool";

fn verbose_arg() -> Arg {
    Arg::new("verbose")
        .long("verbose")
        .short('v')
        .action(ArgAction::SetTrue)
        .help("Enable additional logging output.")
}

fn quiet_arg() -> Arg {
    Arg::new("quiet")
        .long("quiet")
        .short('q')
        .action(ArgAction::SetTrue)
        .help("Disable all logging output. This option takes precedence over '--verbose'.")
}

fn path_arg() -> Arg {
    Arg::new("path")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Starting directory path. CMake files are searched recursively in it.")
}

/// Converts a boolean action input into a [`bool`].
///
/// `true`, `yes` and `1` are true; `false`, `no` and `0` are false. Case is ignored.
pub fn parse_bool_input(arg: &str) -> Result<bool, String> {
    match arg.to_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        _ => Err(format!("'{arg}' is not a valid boolean. Use 'true' or 'false'.")),
    }
}

/// Builds and returns the action entrypoint's argument parsing object.
///
/// The positional arguments mirror the action's inputs, in the order they are
/// declared in the action metadata.
pub fn get_entrypoint_parser() -> Command {
    Command::new("github-action-entrypoint")
        .about(format!(
            "Converts GitHub Actions job arguments into a {TOOL_RUNNER_NAME} invocation."
        ))
        .arg(
            Arg::new("command")
                .required(true)
                .value_parser(EnumValueParser::<ToolCommand>::new())
                .help("The command to run."),
        )
        .arg(
            Arg::new("path")
                .required(true)
                .value_parser(value_parser!(PathBuf))
                .help(
                    "The path to the project directory to format or lint. CMake files will be searched recursively in this directory.",
                ),
        )
        .arg(
            Arg::new("apply")
                .required(true)
                .value_parser(parse_bool_input)
                .help(
                    "Whether to apply formatting changes. Values: 'true', 'false'. Only relevant for the 'format' command.",
                ),
        )
        .arg(
            Arg::new("log-level")
                .required(true)
                .value_parser(EnumValueParser::<LintLogLevel>::new())
                .help("The log level for cmake-lint. Only relevant for the 'lint' command."),
        )
        .arg(verbose_arg())
        .arg(quiet_arg())
}

/// Builds and returns the tool runner's argument parsing object.
pub fn get_arg_parser() -> Command {
    Command::new(TOOL_RUNNER_NAME)
        .about("Runs cmake tools like cmake-format and cmake-lint.")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(verbose_arg().global(true))
        .arg(quiet_arg().global(true))
        .arg(
            Arg::new("tool-dir")
                .long("tool-dir")
                .short('d')
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .long_help(
                    "A directory containing the cmake-format and cmake-lint executables.

When not given, the RUN_CMAKE_TOOL_DIR environment variable is used (if set and
not empty). Otherwise the executables are sought in the PATH.
",
                ),
        )
        .arg(
            Arg::new("tool-version")
                .long("tool-version")
                .short('V')
                .global(true)
                .value_parser(VersionReq::parse)
                .long_help(
                    "A semantic version requirement that the tool's reported version must
satisfy, for example '=0.6.13' or '>=0.6'. The run fails before any file is
processed if it does not.
",
                ),
        )
        .arg(
            Arg::new("extensions")
                .long("extensions")
                .short('e')
                .global(true)
                .value_delimiter(',')
                .long_help(
                    "A comma-separated list of file extensions to process in addition to
files named CMakeLists.txt. For example, use 'cmake' to include *.cmake modules.
",
                ),
        )
        .arg(
            Arg::new("ignore")
                .long("ignore")
                .short('i')
                .global(true)
                .value_delimiter('|')
                .long_help(
                    "Set this option with path(s) to ignore (or not ignore).

- Paths are relative to the searched directory.
- In the case of multiple paths, you can use `|` to separate each path.
- Prefix a path with `!` to explicitly not ignore it.

Nothing is ignored by default.
",
                ),
        )
        .arg(
            Arg::new("skip-hidden")
                .long("skip-hidden")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Do not search hidden directories (names beginning with a '.')."),
        )
        .arg(
            Arg::new("skip-submodules")
                .long("skip-submodules")
                .global(true)
                .action(ArgAction::SetTrue)
                .long_help(
                    "Ignore the submodules listed in a .gitmodules file of the searched
directory, unless a submodule's path is explicitly not ignored with `--ignore`.
",
                ),
        )
        .subcommand(
            Command::new("format")
                .about("Format CMakeLists.txt files or check if they are formatted")
                .arg(
                    Arg::new("apply")
                        .long("apply")
                        .short('a')
                        .action(ArgAction::SetTrue)
                        .help("Write changes to files"),
                )
                .arg(path_arg()),
        )
        .subcommand(
            Command::new("lint")
                .about("Lint CMakeLists.txt files")
                .arg(
                    Arg::new("log-level")
                        .long("log-level")
                        .short('l')
                        .value_parser(EnumValueParser::<LintLogLevel>::new())
                        .default_value("warning")
                        .help("Set the log level for cmake-lint"),
                )
                .arg(path_arg()),
        )
}

/// This will parse the list of paths specified from the CLI using the `--ignore`
/// argument.
///
/// It returns 2 lists (in order):
///
/// - `ignored` paths
/// - `not_ignored` paths
///
/// Each path is joined onto `root`. With `skip_submodules`, this function will also
/// read a .gitmodules file located in `root`. The named submodules' paths will be
/// added to the ignored list, unless the submodule's path is already specified in the
/// not_ignored list.
pub fn parse_ignore(
    ignore: &[&str],
    root: &Path,
    skip_submodules: bool,
) -> (Vec<PathBuf>, Vec<PathBuf>) {
    let mut ignored = vec![];
    let mut not_ignored = vec![];
    for pattern in ignore {
        let as_posix = pattern.replace('\\', "/");
        let mut pat = as_posix.as_str();
        let is_ignored = !pat.starts_with('!');
        if !is_ignored {
            pat = &pat[1..];
        }
        if let Some(stripped) = pat.strip_prefix("./") {
            pat = stripped;
        }
        if is_ignored {
            ignored.push(root.join(pat));
        } else {
            not_ignored.push(root.join(pat));
        }
    }

    let gitmodules = if skip_submodules {
        fs::read_to_string(root.join(".gitmodules")).ok()
    } else {
        None
    };
    if let Some(read_buf) = gitmodules {
        for line in read_buf.lines() {
            let line = line.trim_start();
            if !line.starts_with("path") {
                continue;
            }
            if let Some((_, value)) = line.split_once('=') {
                let submodule = root.join(value.trim());
                log::debug!("Found submodule: {}", submodule.display());
                if !not_ignored.contains(&submodule) && !ignored.contains(&submodule) {
                    ignored.push(submodule);
                }
            }
        }
    }

    if !ignored.is_empty() {
        log::debug!("Ignored:");
        for pattern in &ignored {
            log::debug!("  {}", pattern.display());
        }
    }
    if !not_ignored.is_empty() {
        log::debug!("Not Ignored:");
        for pattern in &not_ignored {
            log::debug!("  {}", pattern.display());
        }
    }
    (ignored, not_ignored)
}
