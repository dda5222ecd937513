//! This module holds functionality specific to running cmake-format.

use std::path::{Path, PathBuf};
use std::process::Command;

/// Builds the cmake-format command line for the given `files`.
///
/// With `apply`, the files are rewritten in place. Otherwise cmake-format only checks
/// them, exiting with a non-zero status if any file would change.
pub fn build_cmake_format_command(exe: &Path, files: &[PathBuf], apply: bool) -> Command {
    let mut cmd = Command::new(exe);
    cmd.arg(if apply { "--in-place" } else { "--check" });
    cmd.args(files);
    cmd
}
