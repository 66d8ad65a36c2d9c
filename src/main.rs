//! Command-line entry point for datalyst.
//!
//! Parses arguments, initializes logging, and hands off to the matching
//! subcommand. Engine failures surface as plain messages on stderr with a
//! non-zero exit code — there are no retries and no partial results.

use clap::Parser as _;

mod cli;

fn main() {
    if let Err(e) = datalyst::logging::init() {
        eprintln!("warning: logging disabled: {e}");
    }

    let args = cli::Cli::parse();
    if let Err(e) = cli::run(args) {
        tracing::error!(error = %e, "command failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
