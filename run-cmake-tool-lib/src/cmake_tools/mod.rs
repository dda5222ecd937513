//! This crate holds the functionality related to running cmake-format and/or
//! cmake-lint.

use std::{
    env::current_dir,
    path::{Path, PathBuf},
    process::{Command, ExitStatus},
};

// non-std crates
use regex::Regex;
use semver::{Version, VersionReq};
use which::{which, which_in};

// project-specific modules/crates
use crate::error::RunError;
use crate::request::{ToolCommand, ToolRequest};
pub mod cmake_format;
use cmake_format::build_cmake_format_command;
pub mod cmake_lint;
use cmake_lint::build_cmake_lint_command;

/// Where to find the tools and which versions of them are acceptable.
#[derive(Debug, Default, Clone)]
pub struct ToolOptions {
    /// A directory that holds the tool executables. [`None`] means the `PATH`.
    pub tool_dir: Option<PathBuf>,

    /// The requirement that the tool's reported version must satisfy.
    pub version_req: Option<VersionReq>,
}

/// Fetch the path to a cmake tool by `name` (ie `"cmake-format"` or `"cmake-lint"`).
///
/// If a `tool_dir` is given, the executable is sought only in that directory.
/// Otherwise, it is sought in the `PATH` environment variable.
pub fn get_cmake_tool_exe(
    name: &'static str,
    tool_dir: Option<&Path>,
) -> Result<PathBuf, RunError> {
    match tool_dir {
        Some(dir) => {
            let cwd = current_dir().unwrap_or_else(|_| PathBuf::from("."));
            which_in(name, Some(dir), cwd).map_err(|_| RunError::ToolNotFound {
                name,
                location: dir.to_string_lossy().to_string(),
            })
        }
        None => which(name).map_err(|_| RunError::ToolNotFound {
            name,
            location: String::from("PATH"),
        }),
    }
}

/// Extracts a version number from the output of `<tool> --version`.
///
/// The output of cmakelang's tools is just the version (ie `0.6.13`), but some
/// wrappers prefix it with the program's name.
pub fn parse_version_output(output: &str) -> Option<Version> {
    let version_pattern = Regex::new(r"\d+(?:\.\d+){0,2}(?:[-+][0-9A-Za-z.-]+)?").ok()?;
    let token = version_pattern.find(output)?;
    lenient_semver::parse_into::<Version>(token.as_str()).ok()
}

/// Runs `<exe> --version` and parses the reported version.
pub fn get_tool_version(exe: &Path, name: &'static str) -> Result<Version, RunError> {
    let output = Command::new(exe)
        .arg("--version")
        .output()
        .map_err(|source| RunError::ToolFailedToStart {
            program: exe.to_string_lossy().to_string(),
            source,
        })?;
    let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if !output.status.success() {
        return Err(RunError::UnknownToolVersion {
            name,
            output: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    parse_version_output(&stdout).ok_or(RunError::UnknownToolVersion {
        name,
        output: stdout,
    })
}

/// Translates a child's [`ExitStatus`] into this process' exit status.
///
/// On Unix, a child terminated by a signal is reported like a shell does (`128 + signal`).
pub fn exit_status_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    1
}

/// Runs the given `cmd` to completion and returns its exit status.
///
/// The child inherits this process' stdout and stderr, so its output is streamed as
/// it is produced.
pub fn run_tool_process(cmd: &mut Command) -> Result<i32, RunError> {
    log::info!(
        "Running \"{} {}\"",
        cmd.get_program().to_string_lossy(),
        cmd.get_args()
            .map(|x| x.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ")
    );
    let status = cmd.status().map_err(|source| RunError::ToolFailedToStart {
        program: cmd.get_program().to_string_lossy().to_string(),
        source,
    })?;
    let code = exit_status_code(status);
    log::debug!("{} exited with {code}", cmd.get_program().to_string_lossy());
    Ok(code)
}

/// Runs cmake-format or cmake-lint (as per `request`) over all the given `files`.
///
/// The tool is run once, with every file on its command line, and the returned value
/// is the tool's own exit status.
///
/// The files are not split into batches. A file list that exceeds the OS limit on the
/// size of a command line (`ARG_MAX` on Unix, about 32K characters on Windows) makes
/// the spawn fail (`E2BIG` on Unix), which is reported as
/// [`RunError::ToolFailedToStart`].
pub fn run_cmake_tool(
    request: &ToolRequest,
    files: &[PathBuf],
    options: &ToolOptions,
) -> Result<i32, RunError> {
    let name = request.command.tool_name();
    let exe = get_cmake_tool_exe(name, options.tool_dir.as_deref())?;

    if let Some(required) = &options.version_req {
        let found = get_tool_version(&exe, name)?;
        if !required.matches(&found) {
            return Err(RunError::ToolVersionMismatch {
                name,
                found,
                required: required.clone(),
            });
        }
        log::info!("{name} version: {found}");
    } else if log::log_enabled!(log::Level::Debug) {
        match get_tool_version(&exe, name) {
            Ok(version) => log::debug!("{name} version: {version}"),
            Err(e) => log::debug!("{e}"),
        }
    }

    let mut cmd = match request.command {
        ToolCommand::Format => build_cmake_format_command(&exe, files, request.apply),
        ToolCommand::Lint => build_cmake_lint_command(&exe, files, request.log_level),
    };
    run_tool_process(&mut cmd)
}

#[cfg(test)]
pub(crate) mod tests {
    use std::fs;
    use std::path::{Path, PathBuf};

    use semver::{Version, VersionReq};

    use super::{get_cmake_tool_exe, parse_version_output, run_cmake_tool, ToolOptions};
    use crate::error::RunError;
    use crate::request::{LintLogLevel, ToolCommand, ToolRequest};

    /// Writes an executable stand-in for `name` into `dir`.
    ///
    /// The stub prints `version` for `--version`. Otherwise it records its arguments
    /// (one per line) into `<dir>/<name>.args` and exits with `exit_code`.
    #[cfg(unix)]
    pub(crate) fn write_tool_stub(
        dir: &Path,
        name: &str,
        version: &str,
        exit_code: i32,
    ) -> PathBuf {
        let record = dir.join(format!("{name}.args"));
        let script = format!(
            "#!/bin/sh\nif [ \"$1\" = \"--version\" ]; then\n  echo {version}\n  exit 0\nfi\nprintf '%s\\n' \"$@\" > '{}'\nexit {exit_code}\n",
            record.display()
        );
        write_script(dir, name, &script);
        record
    }

    /// Writes an executable script named `name` into `dir` with the given contents.
    #[cfg(unix)]
    fn write_script(dir: &Path, name: &str, script: &str) {
        use std::os::unix::fs::PermissionsExt;

        let exe = dir.join(name);
        fs::write(&exe, script).unwrap();
        fs::set_permissions(&exe, fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[cfg(unix)]
    pub(crate) fn read_recorded_args(record: &Path) -> Vec<String> {
        fs::read_to_string(record)
            .unwrap()
            .lines()
            .map(|line| line.to_string())
            .collect()
    }

    fn request(command: ToolCommand, apply: bool) -> ToolRequest {
        ToolRequest {
            command,
            path: PathBuf::from("."),
            apply,
            log_level: LintLogLevel::Error,
        }
    }

    #[test]
    fn parse_plain_version() {
        assert_eq!(parse_version_output("0.6.13\n"), Some(Version::new(0, 6, 13)));
    }

    #[test]
    fn parse_prefixed_version() {
        assert_eq!(
            parse_version_output("cmake-format 0.6"),
            Some(Version::new(0, 6, 0))
        );
        assert_eq!(parse_version_output("no digits here"), None);
    }

    #[test]
    fn tool_not_in_dir() {
        let dir = tempfile::tempdir().unwrap();
        let result = get_cmake_tool_exe("cmake-format", Some(dir.path()));
        assert!(matches!(result, Err(RunError::ToolNotFound { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn format_check_passes_exit_code_through() {
        let dir = tempfile::tempdir().unwrap();
        let record = write_tool_stub(dir.path(), "cmake-format", "0.6.13", 1);
        let files = vec![PathBuf::from("a/CMakeLists.txt"), PathBuf::from("CMakeLists.txt")];
        let options = ToolOptions {
            tool_dir: Some(dir.path().to_path_buf()),
            version_req: None,
        };
        let code =
            run_cmake_tool(&request(ToolCommand::Format, false), &files, &options).unwrap();
        assert_eq!(code, 1);
        assert_eq!(
            read_recorded_args(&record),
            ["--check", "a/CMakeLists.txt", "CMakeLists.txt"]
        );
    }

    #[cfg(unix)]
    #[test]
    fn lint_with_matching_version() {
        let dir = tempfile::tempdir().unwrap();
        let record = write_tool_stub(dir.path(), "cmake-lint", "0.6.13", 0);
        let options = ToolOptions {
            tool_dir: Some(dir.path().to_path_buf()),
            version_req: Some(VersionReq::parse("=0.6.13").unwrap()),
        };
        let files = vec![PathBuf::from("CMakeLists.txt")];
        let code = run_cmake_tool(&request(ToolCommand::Lint, true), &files, &options).unwrap();
        assert_eq!(code, 0);
        assert_eq!(
            read_recorded_args(&record),
            ["--log-level", "error", "CMakeLists.txt"]
        );
    }

    #[cfg(unix)]
    #[test]
    fn version_mismatch_stops_before_running() {
        let dir = tempfile::tempdir().unwrap();
        let record = write_tool_stub(dir.path(), "cmake-format", "0.6.10", 0);
        let options = ToolOptions {
            tool_dir: Some(dir.path().to_path_buf()),
            version_req: Some(VersionReq::parse("=0.6.13").unwrap()),
        };
        let files = vec![PathBuf::from("CMakeLists.txt")];
        let result = run_cmake_tool(&request(ToolCommand::Format, true), &files, &options);
        assert!(matches!(result, Err(RunError::ToolVersionMismatch { .. })));
        assert!(!record.exists());
    }

    #[cfg(unix)]
    #[test]
    fn unstartable_tool_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        write_script(dir.path(), "cmake-lint", "#!/nonexistent/sh\nexit 0\n");
        let options = ToolOptions {
            tool_dir: Some(dir.path().to_path_buf()),
            version_req: None,
        };
        let files = vec![PathBuf::from("CMakeLists.txt")];
        let result = run_cmake_tool(&request(ToolCommand::Lint, false), &files, &options);
        let err = result.unwrap_err();
        assert!(matches!(err, RunError::ToolFailedToStart { .. }));
        assert_eq!(err.exit_code(), 102);
    }

    #[cfg(unix)]
    #[test]
    fn killed_tool_reports_the_signal() {
        let dir = tempfile::tempdir().unwrap();
        write_script(dir.path(), "cmake-format", "#!/bin/sh\nkill -TERM $$\n");
        let options = ToolOptions {
            tool_dir: Some(dir.path().to_path_buf()),
            version_req: None,
        };
        let files = vec![PathBuf::from("CMakeLists.txt")];
        let code =
            run_cmake_tool(&request(ToolCommand::Format, false), &files, &options).unwrap();
        assert_eq!(code, 128 + 15);
    }
}
