//! This is the tool runner's executable: `run-cmake-tool`.

use std::{env, process};

use run_cmake_tool_lib::run::run_main;

/// This takes the CLI arguments and passes them to [`run_main()`], exiting with the
/// status it returns.
pub fn main() {
    process::exit(run_main(env::args().collect::<Vec<String>>()));
}
