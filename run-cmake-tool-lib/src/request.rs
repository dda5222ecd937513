//! The parameters of a single run: which tool, over which directory, and how.

use std::fmt;
use std::path::PathBuf;

// non-std crates
use clap::builder::PossibleValue;
use clap::{ArgMatches, ValueEnum};

/// The commands understood by both the action entrypoint and the tool runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolCommand {
    /// Check (or apply) formatting with `cmake-format`.
    Format,
    /// Report diagnostics with `cmake-lint`.
    Lint,
}

impl ToolCommand {
    /// The command's name as typed on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolCommand::Format => "format",
            ToolCommand::Lint => "lint",
        }
    }

    /// The name of the external executable that implements this command.
    pub fn tool_name(&self) -> &'static str {
        match self {
            ToolCommand::Format => "cmake-format",
            ToolCommand::Lint => "cmake-lint",
        }
    }
}

impl ValueEnum for ToolCommand {
    fn value_variants<'a>() -> &'a [Self] {
        &[ToolCommand::Format, ToolCommand::Lint]
    }

    fn to_possible_value(&self) -> Option<PossibleValue> {
        Some(match self {
            ToolCommand::Format => PossibleValue::new("format")
                .help("Check that CMake files are formatted, or format them"),
            ToolCommand::Lint => PossibleValue::new("lint").help("Lint CMake files"),
        })
    }
}

impl fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The log levels accepted by `cmake-lint --log-level`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LintLogLevel {
    /// Report everything, including the tool's own debug messages.
    Debug,
    /// Report informational messages and above.
    Info,
    /// Report warnings and errors.
    #[default]
    Warning,
    /// Report errors only.
    Error,
}

impl LintLogLevel {
    /// The level's name as `cmake-lint --log-level` expects it.
    pub fn as_str(&self) -> &'static str {
        match self {
            LintLogLevel::Debug => "debug",
            LintLogLevel::Info => "info",
            LintLogLevel::Warning => "warning",
            LintLogLevel::Error => "error",
        }
    }
}

impl ValueEnum for LintLogLevel {
    fn value_variants<'a>() -> &'a [Self] {
        &[
            LintLogLevel::Debug,
            LintLogLevel::Info,
            LintLogLevel::Warning,
            LintLogLevel::Error,
        ]
    }

    fn to_possible_value(&self) -> Option<PossibleValue> {
        Some(PossibleValue::new(self.as_str()))
    }
}

impl fmt::Display for LintLogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated request to run one of the CMake tools.
///
/// `apply` only matters to [`ToolCommand::Format`] and `log_level` only matters to
/// [`ToolCommand::Lint`]; both are always present so that the action's fixed set of
/// inputs maps onto this struct one to one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolRequest {
    pub command: ToolCommand,
    pub path: PathBuf,
    pub apply: bool,
    pub log_level: LintLogLevel,
}

impl ToolRequest {
    /// Build a request from the action entrypoint's positional arguments.
    ///
    /// Returns [`None`] only if `args` was not produced by
    /// [`crate::cli::get_entrypoint_parser()`].
    pub fn from_entrypoint_matches(args: &ArgMatches) -> Option<Self> {
        Some(ToolRequest {
            command: args.get_one::<ToolCommand>("command").copied()?,
            path: args.get_one::<PathBuf>("path").cloned()?,
            apply: args.get_one::<bool>("apply").copied()?,
            log_level: args.get_one::<LintLogLevel>("log-level").copied()?,
        })
    }

    /// Build a request from one of the tool runner's subcommands.
    ///
    /// The `name` and `args` are expected from [`ArgMatches::subcommand()`] of the
    /// matches produced by [`crate::cli::get_arg_parser()`].
    pub fn from_tool_matches(name: &str, args: &ArgMatches) -> Option<Self> {
        let command = ToolCommand::from_str(name, false).ok()?;
        let path = args.get_one::<PathBuf>("path").cloned()?;
        Some(match command {
            ToolCommand::Format => ToolRequest {
                command,
                path,
                apply: args.get_flag("apply"),
                log_level: LintLogLevel::default(),
            },
            ToolCommand::Lint => ToolRequest {
                command,
                path,
                apply: false,
                log_level: args
                    .get_one::<LintLogLevel>("log-level")
                    .copied()
                    .unwrap_or_default(),
            },
        })
    }

    /// Converts this request into the subcommand arguments of the tool runner.
    ///
    /// Options that the command does not use are left out.
    pub fn to_tool_args(&self) -> Vec<String> {
        let path = self.path.to_string_lossy().to_string();
        match self.command {
            ToolCommand::Format => {
                let mut args = vec![self.command.to_string()];
                if self.apply {
                    args.push("--apply".to_string());
                }
                args.push(path);
                args
            }
            ToolCommand::Lint => vec![
                self.command.to_string(),
                "--log-level".to_string(),
                self.log_level.to_string(),
                path,
            ],
        }
    }
}

#[cfg(test)]
mod test {
    use std::path::PathBuf;

    use super::{LintLogLevel, ToolCommand, ToolRequest};

    const PATH: &str = "some/directory/path";

    fn request(command: ToolCommand, apply: bool, log_level: LintLogLevel) -> ToolRequest {
        ToolRequest {
            command,
            path: PathBuf::from(PATH),
            apply,
            log_level,
        }
    }

    #[test]
    fn format_ignores_log_level() {
        for level in [
            LintLogLevel::Debug,
            LintLogLevel::Info,
            LintLogLevel::Warning,
            LintLogLevel::Error,
        ] {
            assert_eq!(
                request(ToolCommand::Format, true, level).to_tool_args(),
                ["format", "--apply", PATH]
            );
        }
        assert_eq!(
            request(ToolCommand::Format, false, LintLogLevel::Info).to_tool_args(),
            ["format", PATH]
        );
    }

    #[test]
    fn lint_ignores_apply() {
        assert_eq!(
            request(ToolCommand::Lint, true, LintLogLevel::Info).to_tool_args(),
            ["lint", "--log-level", "info", PATH]
        );
        assert_eq!(
            request(ToolCommand::Lint, false, LintLogLevel::Error).to_tool_args(),
            ["lint", "--log-level", "error", PATH]
        );
    }

    #[test]
    fn tool_names() {
        assert_eq!(ToolCommand::Format.tool_name(), "cmake-format");
        assert_eq!(ToolCommand::Lint.tool_name(), "cmake-lint");
        assert_eq!(LintLogLevel::default(), LintLogLevel::Warning);
    }
}
