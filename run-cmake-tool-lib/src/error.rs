//! The errors that stop a run before (or instead of) the external tool's own verdict.
//!
//! Each variant maps to a documented process exit status, see [`RunError::exit_code()`].
//! Failures reported by `cmake-format` or `cmake-lint` themselves are not errors here;
//! their exit status is passed through unchanged.

use std::{io, path::PathBuf};

// non-std crates
use semver::VersionReq;
use thiserror::Error;

/// The exit status used when the given arguments were rejected by the parser.
///
/// This matches the status [`clap`] uses for usage errors.
pub const INVALID_INPUT_EXIT_CODE: i32 = 2;

/// The exit status used when the CMake files could not be discovered.
pub const DISCOVERY_FAILED_EXIT_CODE: i32 = 1;

/// The exit status used when the external tool's executable was not found.
pub const TOOL_NOT_FOUND_EXIT_CODE: i32 = 101;

/// The exit status used when the external tool's process could not be started.
pub const TOOL_FAILED_TO_START_EXIT_CODE: i32 = 102;

/// The exit status used when the external tool's version is not acceptable.
pub const TOOL_VERSION_EXIT_CODE: i32 = 103;

#[derive(Debug, Error)]
pub enum RunError {
    #[error("could not search {} for CMake files: {source}", .path.display())]
    Discovery {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{name} is not installed or not found in {location}")]
    ToolNotFound { name: &'static str, location: String },

    #[error("failed to start {program}: {source}")]
    ToolFailedToStart {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("could not determine the version of {name} from its output {output:?}")]
    UnknownToolVersion { name: &'static str, output: String },

    #[error("{name} version {found} does not satisfy the required version {required}")]
    ToolVersionMismatch {
        name: &'static str,
        found: semver::Version,
        required: VersionReq,
    },
}

impl RunError {
    /// The process exit status that represents this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            RunError::Discovery { .. } => DISCOVERY_FAILED_EXIT_CODE,
            RunError::ToolNotFound { .. } => TOOL_NOT_FOUND_EXIT_CODE,
            RunError::ToolFailedToStart { .. } => TOOL_FAILED_TO_START_EXIT_CODE,
            RunError::UnknownToolVersion { .. } | RunError::ToolVersionMismatch { .. } => {
                TOOL_VERSION_EXIT_CODE
            }
        }
    }
}

#[cfg(test)]
mod test {
    use std::{io, path::PathBuf};

    use super::{RunError, TOOL_NOT_FOUND_EXIT_CODE, TOOL_VERSION_EXIT_CODE};

    #[test]
    fn exit_codes_are_distinct_from_usage_errors() {
        let not_found = RunError::ToolNotFound {
            name: "cmake-format",
            location: "PATH".to_string(),
        };
        assert_eq!(not_found.exit_code(), TOOL_NOT_FOUND_EXIT_CODE);
        assert_eq!(
            not_found.to_string(),
            "cmake-format is not installed or not found in PATH"
        );

        let unknown = RunError::UnknownToolVersion {
            name: "cmake-lint",
            output: "garbage".to_string(),
        };
        assert_eq!(unknown.exit_code(), TOOL_VERSION_EXIT_CODE);
    }

    #[test]
    fn discovery_error_names_the_path() {
        let err = RunError::Discovery {
            path: PathBuf::from("some/dir"),
            source: io::Error::new(io::ErrorKind::NotFound, "missing"),
        };
        assert_eq!(err.exit_code(), 1);
        assert!(err.to_string().starts_with("could not search some/dir"));
    }
}
