//! # lexara CLI
//!
//! Command-line interface and HTTP server for the Lexara search engine.
//! Run `lexara --help` for usage information.

mod cli;
mod config;
mod http;

use std::process::ExitCode;

fn main() -> ExitCode {
    cli::run()
}
