//! This is the GitHub Action's entrypoint executable: `github-action-entrypoint`.
//!
//! The action passes its inputs as positional arguments, in the order
//! `command path apply-formatting lint-log-level`.

use std::{env, process};

use run_cmake_tool_lib::run::action_main;

/// This takes the CLI arguments and passes them to [`action_main()`], exiting with the
/// status it returns.
pub fn main() {
    process::exit(action_main(env::args().collect::<Vec<String>>()));
}
