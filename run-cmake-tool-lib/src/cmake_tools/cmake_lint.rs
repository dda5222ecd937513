//! This module holds functionality specific to running cmake-lint.

use std::path::{Path, PathBuf};
use std::process::Command;

// project-specific modules/crates
use crate::request::LintLogLevel;

/// Builds the cmake-lint command line for the given `files`.
///
/// cmake-lint only fails for diagnostics at or above `log_level`.
pub fn build_cmake_lint_command(exe: &Path, files: &[PathBuf], log_level: LintLogLevel) -> Command {
    let mut cmd = Command::new(exe);
    cmd.args(["--log-level", log_level.as_str()]);
    cmd.args(files);
    cmd
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use super::build_cmake_lint_command;
    use crate::request::LintLogLevel;

    #[test]
    fn log_level_precedes_files() {
        let files = [PathBuf::from("CMakeLists.txt")];
        let cmd = build_cmake_lint_command(Path::new("cmake-lint"), &files, LintLogLevel::Info);
        assert_eq!(cmd.get_program(), "cmake-lint");
        let args = cmd
            .get_args()
            .map(|arg| arg.to_string_lossy().to_string())
            .collect::<Vec<_>>();
        assert_eq!(args, ["--log-level", "info", "CMakeLists.txt"]);
    }
}
