//! The root module for the run-cmake-tool package when compiled as a library.
//! This module mainly holds the declarations of this package's other modules.
//!
//! Both executables of the `run-cmake-tool-cli` package are thin wrappers around
//! the functions in [`run`].

// project specific modules/crates
pub mod action_env;
pub mod cli;
pub mod cmake_tools;
pub mod common_fs;
pub mod error;
pub mod logger;
pub mod request;
pub mod run;
